//! TLV coding for the NDN packet format.
//!
//! Everything on the wire is a TLV triple: a [VarNum] type, a [VarNum] length
//! and a value. Nested structures encode their value into a scratch buffer
//! first so the length prefix can be written; see [put_tlv].

mod decode;
mod encode;
mod tlv;
mod varnum;

pub use decode::*;
pub use encode::*;
pub use tlv::*;
pub use varnum::*;
