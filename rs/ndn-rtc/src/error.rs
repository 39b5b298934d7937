use thiserror::Error;

use crate::codec::CodecError;
use crate::fec::FecError;

/// A producer error.
///
/// Only structural and caller-contract errors surface out of the publish
/// cycle; runtime media errors (dropped frames, failed FEC) are absorbed and
/// reported through statistics and logs.
#[derive(Error, Debug)]
pub enum Error {
	#[error("image buffer is {actual} bytes, expected {expected} for {width}x{height}")]
	InvalidImage {
		width: u32,
		height: u32,
		expected: usize,
		actual: usize,
	},

	#[error("codec error: {0}")]
	Codec(#[from] CodecError),

	#[error("fec error: {0}")]
	Fec(#[from] FecError),

	#[error("signing error: {0}")]
	Sign(#[from] ndn_lite::SignError),

	#[error("invalid name: {0}")]
	Name(#[from] ndn_lite::coding::DecodeError),

	#[error("metadata encoding error: {0}")]
	Meta(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
