use bytes::{Buf, Bytes};

use crate::coding::{get_nonneg, put_nonneg, Decode, DecodeError, Encode, VarNum};

/// Write a TLV triple: type, length, then the value bytes.
pub fn put_tlv<W: bytes::BufMut>(w: &mut W, typ: u64, value: &[u8]) {
	VarNum(typ).encode(w);
	VarNum(value.len() as u64).encode(w);
	w.put_slice(value);
}

/// Write a TLV triple whose value is a nonNegativeInteger.
pub fn put_tlv_nonneg<W: bytes::BufMut>(w: &mut W, typ: u64, value: u64) {
	let mut scratch = [0u8; 8];
	let mut cursor = &mut scratch[..];
	put_nonneg(&mut cursor, value);
	let len = 8 - cursor.len();
	put_tlv(w, typ, &scratch[..len]);
}

/// Read the next TLV header, returning its type and value length.
pub fn read_header<B: Buf>(buf: &mut B) -> Result<(u64, usize), DecodeError> {
	let typ = VarNum::decode(buf)?.0;
	let length = VarNum::decode(buf)?.0 as usize;
	Ok((typ, length))
}

/// Read the next TLV triple, returning its type and value.
pub fn read_tlv<B: Buf>(buf: &mut B) -> Result<(u64, Bytes), DecodeError> {
	let (typ, length) = read_header(buf)?;
	if buf.remaining() < length {
		return Err(DecodeError::Short);
	}
	Ok((typ, buf.copy_to_bytes(length)))
}

/// Read the next TLV triple, requiring the given type.
pub fn expect_tlv<B: Buf>(buf: &mut B, typ: u64) -> Result<Bytes, DecodeError> {
	let (found, value) = read_tlv(buf)?;
	if found != typ {
		return Err(DecodeError::UnexpectedType(found));
	}
	Ok(value)
}

/// Read the next TLV triple if it has the given type, leaving the buffer
/// untouched otherwise.
///
/// The buffer must be a [Bytes] so the peeked header can be rewound cheaply.
pub fn maybe_tlv(buf: &mut Bytes, typ: u64) -> Result<Option<Bytes>, DecodeError> {
	if !buf.has_remaining() {
		return Ok(None);
	}

	let mut peek = buf.clone();
	let (found, value) = read_tlv(&mut peek)?;
	if found != typ {
		return Ok(None);
	}

	*buf = peek;
	Ok(Some(value))
}

/// Read a TLV triple with a nonNegativeInteger value, requiring the given type.
pub fn expect_tlv_nonneg<B: Buf>(buf: &mut B, typ: u64) -> Result<u64, DecodeError> {
	let mut value = expect_tlv(buf, typ)?;
	get_nonneg(&mut value)
}

#[cfg(test)]
mod test {
	use super::*;
	use bytes::BytesMut;

	#[test]
	fn tlv_roundtrip() {
		let mut buf = BytesMut::new();
		put_tlv(&mut buf, 0x15, b"payload");
		put_tlv_nonneg(&mut buf, 0x19, 4000);

		let mut buf = buf.freeze();
		let value = expect_tlv(&mut buf, 0x15).unwrap();
		assert_eq!(&value[..], b"payload");
		assert_eq!(expect_tlv_nonneg(&mut buf, 0x19).unwrap(), 4000);
		assert!(!buf.has_remaining());
	}

	#[test]
	fn tlv_wrong_type() {
		let mut buf = BytesMut::new();
		put_tlv(&mut buf, 0x15, b"x");

		let mut buf = buf.freeze();
		assert!(matches!(
			expect_tlv(&mut buf, 0x16),
			Err(DecodeError::UnexpectedType(0x15))
		));
	}

	#[test]
	fn tlv_maybe() {
		let mut buf = BytesMut::new();
		put_tlv(&mut buf, 0x14, b"");
		put_tlv(&mut buf, 0x15, b"x");

		let mut buf = buf.freeze();
		assert!(maybe_tlv(&mut buf, 0x15).unwrap().is_none());
		assert!(maybe_tlv(&mut buf, 0x14).unwrap().is_some());
		assert_eq!(&maybe_tlv(&mut buf, 0x15).unwrap().unwrap()[..], b"x");
		assert!(maybe_tlv(&mut buf, 0x15).unwrap().is_none());
	}

	#[test]
	fn tlv_truncated_value() {
		let mut buf = BytesMut::new();
		VarNum(0x15).encode(&mut buf);
		VarNum(10).encode(&mut buf);
		buf.extend_from_slice(b"abc");

		let mut buf = buf.freeze();
		assert!(matches!(read_tlv(&mut buf), Err(DecodeError::Short)));
	}
}
