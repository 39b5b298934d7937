use crate::coding::{Decode, DecodeError, Encode};

/// A TLV variable-size number, used for TLV types and lengths.
///
/// Values below 253 take one byte; larger values are prefixed with 253, 254 or
/// 255 and encoded as 2, 4 or 8 big-endian bytes respectively.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VarNum(pub u64);

impl From<u64> for VarNum {
	fn from(v: u64) -> Self {
		Self(v)
	}
}

impl From<VarNum> for u64 {
	fn from(v: VarNum) -> Self {
		v.0
	}
}

impl From<usize> for VarNum {
	fn from(v: usize) -> Self {
		Self(v as u64)
	}
}

impl Encode for VarNum {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		match self.0 {
			v if v < 253 => w.put_u8(v as u8),
			v if v <= u16::MAX as u64 => {
				w.put_u8(253);
				w.put_u16(v as u16);
			}
			v if v <= u32::MAX as u64 => {
				w.put_u8(254);
				w.put_u32(v as u32);
			}
			v => {
				w.put_u8(255);
				w.put_u64(v);
			}
		}
	}
}

impl Decode for VarNum {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		if !buf.has_remaining() {
			return Err(DecodeError::Short);
		}

		let v = match buf.get_u8() {
			v if v < 253 => v as u64,
			253 => {
				if buf.remaining() < 2 {
					return Err(DecodeError::Short);
				}
				buf.get_u16() as u64
			}
			254 => {
				if buf.remaining() < 4 {
					return Err(DecodeError::Short);
				}
				buf.get_u32() as u64
			}
			_ => {
				if buf.remaining() < 8 {
					return Err(DecodeError::Short);
				}
				buf.get_u64()
			}
		};

		Ok(Self(v))
	}
}

/// Encode a nonNegativeInteger: 1, 2, 4 or 8 big-endian bytes by magnitude.
///
/// This is the encoding used *inside* TLV values (freshness periods,
/// preferences, convention markers), distinct from [VarNum].
pub fn put_nonneg<W: bytes::BufMut>(w: &mut W, v: u64) {
	if v <= u8::MAX as u64 {
		w.put_u8(v as u8);
	} else if v <= u16::MAX as u64 {
		w.put_u16(v as u16);
	} else if v <= u32::MAX as u64 {
		w.put_u32(v as u32);
	} else {
		w.put_u64(v);
	}
}

/// Decode a nonNegativeInteger occupying the entire remaining buffer.
pub fn get_nonneg<B: bytes::Buf>(buf: &mut B) -> Result<u64, DecodeError> {
	let v = match buf.remaining() {
		1 => buf.get_u8() as u64,
		2 => buf.get_u16() as u64,
		4 => buf.get_u32() as u64,
		8 => buf.get_u64(),
		_ => return Err(DecodeError::InvalidValue),
	};

	Ok(v)
}
