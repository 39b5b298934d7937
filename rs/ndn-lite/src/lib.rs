//! # ndn-lite: a minimal Named Data Networking wire subset
//!
//! `ndn-lite` implements just enough of the NDN packet format for a live media
//! producer: hierarchical [Name]s with the marker-based naming conventions,
//! signed [Data] packets with freshness metadata, and [DelegationSet] pointers.
//!
//! **NOTE**: This is not a general NDN stack. Interests are represented only as
//! far as a producer needs to inspect them; forwarding, selectors and interest
//! wire encoding are out of scope. The transport ([Face]) and the in-memory
//! packet store ([ContentCache]) are traits implemented elsewhere.
//!
//! ## API
//!
//! - [Name]: an ordered list of [Component]s, built with the segment, sequence
//!   and timestamp conventions understood by deployed consumers.
//! - [Data]: a named, signed payload with [MetaInfo] (freshness, final block).
//!   [Data::wire_encode] produces the canonical TLV bytes and finalizes digest
//!   signatures; [Data::full_name] appends the implicit SHA-256 digest.
//! - [DelegationSet]: a signed list of name references, used as typed pointers.
//! - [Signer], [Face], [ContentCache]: seams to the keychain, the transport and
//!   the packet-level cache.

mod cache;
mod data;
mod delegation;
mod face;
mod interest;
mod name;
mod sign;

pub mod coding;

pub use cache::*;
pub use data::*;
pub use delegation::*;
pub use face::*;
pub use interest::*;
pub use name::*;
pub use sign::*;
