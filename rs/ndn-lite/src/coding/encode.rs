use bytes::{Bytes, BytesMut};

/// Write the value to the buffer.
pub trait Encode: Sized {
	/// Encode the value to the given writer.
	///
	/// This will panic if the [bytes::BufMut] does not have enough capacity.
	fn encode<W: bytes::BufMut>(&self, w: &mut W);

	/// Encode the value into a [Bytes] buffer.
	///
	/// NOTE: This will allocate.
	fn encode_bytes(&self) -> Bytes {
		let mut buf = BytesMut::new();
		self.encode(&mut buf);
		buf.freeze()
	}
}

impl Encode for bool {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_u8(*self as u8);
	}
}

impl Encode for u8 {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_u8(*self);
	}
}

impl Encode for u64 {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_u64(*self);
	}
}

impl Encode for f64 {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_f64(*self);
	}
}

impl Encode for &[u8] {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_slice(self);
	}
}

impl Encode for Vec<u8> {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_slice(self);
	}
}

impl Encode for Bytes {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_slice(self);
	}
}

impl Encode for &str {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_slice(self.as_bytes());
	}
}

impl Encode for String {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		self.as_str().encode(w)
	}
}
