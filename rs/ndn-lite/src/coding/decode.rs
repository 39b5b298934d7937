use std::string::FromUtf8Error;
use thiserror::Error;

/// Read the value from the buffer.
///
/// If [DecodeError::Short] is returned, the input was truncated.
pub trait Decode: Sized {
	/// Decode the value from the given buffer.
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError>;

	/// Decode the value, requiring that the buffer is fully consumed.
	fn decode_exact<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let v = Self::decode(buf)?;
		if buf.has_remaining() {
			return Err(DecodeError::Trailing);
		}
		Ok(v)
	}
}

/// A decode error.
#[derive(Error, Debug, Clone)]
pub enum DecodeError {
	#[error("short buffer")]
	Short,

	#[error("trailing bytes")]
	Trailing,

	#[error("unexpected tlv type: {0}")]
	UnexpectedType(u64),

	#[error("invalid string")]
	InvalidString(#[from] FromUtf8Error),

	#[error("invalid value")]
	InvalidValue,

	#[error("missing field")]
	Missing,
}

impl Decode for bool {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		match u8::decode(buf)? {
			0 => Ok(false),
			1 => Ok(true),
			_ => Err(DecodeError::InvalidValue),
		}
	}
}

impl Decode for u8 {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		match buf.has_remaining() {
			true => Ok(buf.get_u8()),
			false => Err(DecodeError::Short),
		}
	}
}

impl Decode for u64 {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		match buf.remaining() >= 8 {
			true => Ok(buf.get_u64()),
			false => Err(DecodeError::Short),
		}
	}
}

impl Decode for f64 {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		match buf.remaining() >= 8 {
			true => Ok(buf.get_f64()),
			false => Err(DecodeError::Short),
		}
	}
}
