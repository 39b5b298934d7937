use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::coding::{self, Decode, DecodeError, Encode};

/// TLV type of a generic name component.
pub const TLV_GENERIC_COMPONENT: u64 = 0x08;

/// TLV type of an implicit SHA-256 digest component.
pub const TLV_DIGEST_COMPONENT: u64 = 0x01;

/// Size of an implicit digest component value.
pub const DIGEST_SIZE: usize = 32;

// Naming convention markers, prefixed to the nonNegativeInteger value of a
// generic component. These match what deployed consumers parse.
const MARKER_SEGMENT: u8 = 0x00;
const MARKER_TIMESTAMP: u8 = 0xFC;
const MARKER_SEQUENCE: u8 = 0xFE;

/// A single component of a [Name].
///
/// Most components are generic (UTF-8 literals or marker-prefixed numbers);
/// the last component of a full name is an implicit SHA-256 digest.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Component {
	pub typ: u64,
	pub value: Bytes,
}

impl Component {
	/// A generic component holding the given bytes.
	pub fn new(value: impl Into<Bytes>) -> Self {
		Self {
			typ: TLV_GENERIC_COMPONENT,
			value: value.into(),
		}
	}

	/// A segment-number component (marker `0x00`).
	pub fn segment(seg: u64) -> Self {
		Self::marked(MARKER_SEGMENT, seg)
	}

	/// A sequence-number component (marker `0xFE`).
	pub fn sequence(seq: u64) -> Self {
		Self::marked(MARKER_SEQUENCE, seq)
	}

	/// A timestamp component (marker `0xFC`).
	///
	/// By convention the value is in microseconds; the number is encoded as
	/// given.
	pub fn timestamp(ts: u64) -> Self {
		Self::marked(MARKER_TIMESTAMP, ts)
	}

	/// An implicit SHA-256 digest component.
	pub fn digest(digest: [u8; DIGEST_SIZE]) -> Self {
		Self {
			typ: TLV_DIGEST_COMPONENT,
			value: Bytes::copy_from_slice(&digest),
		}
	}

	fn marked(marker: u8, v: u64) -> Self {
		let mut value = BytesMut::with_capacity(9);
		value.put_u8(marker);
		coding::put_nonneg(&mut value, v);
		Self {
			typ: TLV_GENERIC_COMPONENT,
			value: value.freeze(),
		}
	}

	fn unmarked(&self, marker: u8) -> Option<u64> {
		if self.typ != TLV_GENERIC_COMPONENT || self.value.first() != Some(&marker) {
			return None;
		}
		coding::get_nonneg(&mut self.value.slice(1..)).ok()
	}

	/// The segment number, if this is a segment component.
	pub fn as_segment(&self) -> Option<u64> {
		self.unmarked(MARKER_SEGMENT)
	}

	/// The sequence number, if this is a sequence-number component.
	pub fn as_sequence(&self) -> Option<u64> {
		self.unmarked(MARKER_SEQUENCE)
	}

	/// The timestamp, if this is a timestamp component.
	pub fn as_timestamp(&self) -> Option<u64> {
		self.unmarked(MARKER_TIMESTAMP)
	}

	/// The digest bytes, if this is an implicit digest component.
	pub fn as_digest(&self) -> Option<&[u8]> {
		match self.typ {
			TLV_DIGEST_COMPONENT => Some(&self.value),
			_ => None,
		}
	}

	// URI form, shared by Display and Debug.
	fn fmt_uri(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if let Some(digest) = self.as_digest() {
			return write!(f, "sha256digest={}", hex::encode(digest));
		}

		if self.value.is_empty() {
			return write!(f, "...");
		}

		for &b in self.value.iter() {
			match b {
				b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => write!(f, "{}", b as char)?,
				_ => write!(f, "%{:02X}", b)?,
			}
		}
		Ok(())
	}
}

impl From<&str> for Component {
	fn from(s: &str) -> Self {
		Self::new(Bytes::copy_from_slice(s.as_bytes()))
	}
}

impl Encode for Component {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		coding::put_tlv(w, self.typ, &self.value);
	}
}

impl Decode for Component {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let (typ, value) = coding::read_tlv(buf)?;
		match typ {
			TLV_GENERIC_COMPONENT => {}
			TLV_DIGEST_COMPONENT if value.len() == DIGEST_SIZE => {}
			TLV_DIGEST_COMPONENT => return Err(DecodeError::InvalidValue),
			other => return Err(DecodeError::UnexpectedType(other)),
		}
		Ok(Self { typ, value })
	}
}

impl fmt::Display for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.fmt_uri(f)
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.fmt_uri(f)
	}
}

/// A hierarchical NDN name: an ordered list of [Component]s.
///
/// Names display as slash-separated URIs with percent-escaping, and parse back
/// from the same form.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name {
	components: Vec<Component>,
}

/// TLV type of a name.
pub const TLV_NAME: u64 = 0x07;

impl Name {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.components.len()
	}

	pub fn is_empty(&self) -> bool {
		self.components.is_empty()
	}

	/// The component at `i`. Negative indices count from the back, so `-1`
	/// is the last component.
	pub fn get(&self, i: i32) -> Option<&Component> {
		let len = self.components.len() as i32;
		let i = if i < 0 { i + len } else { i };
		if i < 0 {
			return None;
		}
		self.components.get(i as usize)
	}

	pub fn last(&self) -> Option<&Component> {
		self.components.last()
	}

	pub fn components(&self) -> &[Component] {
		&self.components
	}

	/// The first `n` components as a new name.
	pub fn prefix(&self, n: usize) -> Name {
		Self {
			components: self.components.iter().take(n).cloned().collect(),
		}
	}

	/// Whether `prefix` is a prefix of this name.
	pub fn starts_with(&self, prefix: &Name) -> bool {
		self.components.len() >= prefix.components.len()
			&& self.components[..prefix.components.len()] == prefix.components[..]
	}

	pub fn push(&mut self, component: Component) {
		self.components.push(component);
	}

	/// Append a component, consuming and returning the name for chaining.
	pub fn append(mut self, component: impl Into<Component>) -> Self {
		self.components.push(component.into());
		self
	}

	/// Append a generic UTF-8 component.
	pub fn append_str(self, s: &str) -> Self {
		self.append(Component::from(s))
	}

	/// Append a segment-number component.
	pub fn append_segment(self, seg: u64) -> Self {
		self.append(Component::segment(seg))
	}

	/// Append a sequence-number component.
	pub fn append_sequence(self, seq: u64) -> Self {
		self.append(Component::sequence(seq))
	}

	/// Append a timestamp component.
	pub fn append_timestamp(self, ts: u64) -> Self {
		self.append(Component::timestamp(ts))
	}
}

impl From<Vec<Component>> for Name {
	fn from(components: Vec<Component>) -> Self {
		Self { components }
	}
}

impl Encode for Name {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		let mut body = BytesMut::new();
		for c in &self.components {
			c.encode(&mut body);
		}
		coding::put_tlv(w, TLV_NAME, &body);
	}
}

impl Decode for Name {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let mut body = coding::expect_tlv(buf, TLV_NAME)?;
		let mut components = Vec::new();
		while body.has_remaining() {
			components.push(Component::decode(&mut body)?);
		}
		Ok(Self { components })
	}
}

impl fmt::Display for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.components.is_empty() {
			return write!(f, "/");
		}
		for c in &self.components {
			write!(f, "/{}", c)?;
		}
		Ok(())
	}
}

impl fmt::Debug for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(self, f)
	}
}

impl FromStr for Name {
	type Err = DecodeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut name = Name::new();
		for part in s.split('/') {
			if part.is_empty() {
				continue;
			}

			if let Some(hex_digest) = part.strip_prefix("sha256digest=") {
				let bytes = hex::decode(hex_digest).map_err(|_| DecodeError::InvalidValue)?;
				let digest: [u8; DIGEST_SIZE] = bytes.try_into().map_err(|_| DecodeError::InvalidValue)?;
				name.push(Component::digest(digest));
				continue;
			}

			if part == "..." {
				name.push(Component::new(Bytes::new()));
				continue;
			}

			name.push(Component::new(percent_decode(part)?));
		}
		Ok(name)
	}
}

fn percent_decode(s: &str) -> Result<Bytes, DecodeError> {
	let raw = s.as_bytes();
	let mut out = BytesMut::with_capacity(raw.len());
	let mut i = 0;

	while i < raw.len() {
		if raw[i] == b'%' {
			if i + 2 >= raw.len() {
				return Err(DecodeError::InvalidValue);
			}
			let hi = (raw[i + 1] as char).to_digit(16).ok_or(DecodeError::InvalidValue)?;
			let lo = (raw[i + 2] as char).to_digit(16).ok_or(DecodeError::InvalidValue)?;
			out.put_u8((hi * 16 + lo) as u8);
			i += 3;
		} else {
			out.put_u8(raw[i]);
			i += 1;
		}
	}

	Ok(out.freeze())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn conventions_roundtrip() {
		let name = Name::new()
			.append_str("producer")
			.append_sequence(42)
			.append_segment(7)
			.append_timestamp(1234567);

		assert_eq!(name.get(1).unwrap().as_sequence(), Some(42));
		assert_eq!(name.get(2).unwrap().as_segment(), Some(7));
		assert_eq!(name.get(3).unwrap().as_timestamp(), Some(1234567));

		// markers don't cross-parse
		assert_eq!(name.get(1).unwrap().as_segment(), None);
		assert_eq!(name.get(2).unwrap().as_timestamp(), None);
	}

	#[test]
	fn uri_roundtrip() {
		let name = Name::new()
			.append_str("ndnrtc")
			.append_str("my stream")
			.append_sequence(3)
			.append(Component::digest([0xAB; DIGEST_SIZE]));

		let uri = name.to_string();
		assert!(uri.starts_with("/ndnrtc/my%20stream/"));
		assert!(uri.ends_with(&format!("sha256digest={}", "ab".repeat(DIGEST_SIZE))));

		let parsed: Name = uri.parse().unwrap();
		assert_eq!(parsed, name);
	}

	#[test]
	fn parse_base_prefix() {
		let name: Name = "/ndn/edu/ucla/producer".parse().unwrap();
		assert_eq!(name.len(), 4);
		assert_eq!(name.to_string(), "/ndn/edu/ucla/producer");
	}

	#[test]
	fn wire_roundtrip() {
		let name = Name::new().append_str("a").append_sequence(9).append_segment(0);
		let mut wire = name.encode_bytes();
		let decoded = Name::decode(&mut wire).unwrap();
		assert_eq!(decoded, name);
	}

	#[test]
	fn prefix_and_starts_with() {
		let name = Name::new().append_str("a").append_str("b").append_str("c");
		let prefix = name.prefix(2);
		assert_eq!(prefix.to_string(), "/a/b");
		assert!(name.starts_with(&prefix));
		assert!(!prefix.starts_with(&name));
	}

	#[test]
	fn negative_indexing() {
		let name = Name::new().append_str("a").append_str("b").append_str("c");

		assert_eq!(name.get(-1), name.get(2));
		assert_eq!(name.get(-3).unwrap().value.as_ref(), b"a");
		assert!(name.get(-4).is_none());
		assert!(name.get(3).is_none());
	}

	#[test]
	fn sentinel_sequence() {
		let name = Name::new().append_sequence(u64::MAX);
		assert_eq!(name.last().unwrap().as_sequence(), Some(u64::MAX));
	}
}
