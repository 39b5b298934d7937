//! # ndn-rtc: real-time video publishing over Named Data Networking
//!
//! `ndn-rtc` is the producer side of a live video conferencing stack built on
//! [`ndn_lite`]. A raw image goes in; a batch of named, signed, erasure-coded
//! Data packets comes out, together with the layered metadata consumers use to
//! discover, synchronize with and recover from loss in the live stream.
//!
//! ## Overview
//!
//! While [`ndn_lite`] provides the packet format, `ndn-rtc` adds:
//! - **[VideoStreamProducer]**: the per-frame publish cycle: slicing, FEC,
//!   naming, signing, GoP pointers and reactive `_latest` / `_live` replies.
//! - **Codec seam**: the synchronous encoder contract ([VideoEncoder]).
//! - **FEC**: systematic Reed-Solomon parity over GF(2^8).
//! - **Metadata**: stream, frame and live records with their envelopes.
//! - **Estimators**: the windowed statistics behind the live profile.
//!
//! To publish, construct a [VideoStreamProducer] and call
//! [VideoStreamProducer::process_image] once per captured frame; send every
//! packet of the returned batch over the face.

mod error;
mod manifest;
mod producer;

pub mod clock;
pub mod codec;
pub mod estimators;
pub mod fec;
pub mod live;
pub mod meta;
pub mod names;
pub mod stats;

// export the ndn-lite version in use
pub use ndn_lite;

pub use codec::{CodecSettings, CodecStats, EncodedFrame, FrameSink, FrameType, Image, ImageFormat, VideoEncoder};
pub use error::*;
pub use manifest::*;
pub use producer::*;
pub use stats::{ProducerStats, StatsSnapshot};
