use bytes::BytesMut;

use crate::coding::{self, Decode, DecodeError, Encode};
use crate::name::Name;

/// TLV types for delegations (from the link object format).
pub const TLV_DELEGATION: u64 = 0x1F;
pub const TLV_PREFERENCE: u64 = 0x1E;

/// A single name reference with a preference.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Delegation {
	pub preference: u64,
	pub name: Name,
}

impl Encode for Delegation {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		let mut body = BytesMut::new();
		coding::put_tlv_nonneg(&mut body, TLV_PREFERENCE, self.preference);
		self.name.encode(&mut body);
		coding::put_tlv(w, TLV_DELEGATION, &body);
	}
}

impl Decode for Delegation {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let mut body = coding::expect_tlv(buf, TLV_DELEGATION)?;
		let preference = coding::expect_tlv_nonneg(&mut body, TLV_PREFERENCE)?;
		let name = Name::decode(&mut body)?;
		Ok(Self { preference, name })
	}
}

/// An ordered list of [Delegation]s, used as a typed pointer to other names.
///
/// Entries are kept sorted by preference, lowest first.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct DelegationSet {
	entries: Vec<Delegation>,
}

impl DelegationSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a delegation, keeping the set ordered by preference.
	pub fn add(&mut self, preference: u64, name: Name) {
		let at = self
			.entries
			.iter()
			.position(|d| d.preference > preference)
			.unwrap_or(self.entries.len());
		self.entries.insert(at, Delegation { preference, name });
	}

	pub fn get(&self, i: usize) -> Option<&Delegation> {
		self.entries.get(i)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Encode for DelegationSet {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		for d in &self.entries {
			d.encode(w);
		}
	}
}

impl Decode for DelegationSet {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let mut entries = Vec::new();
		while buf.has_remaining() {
			entries.push(Delegation::decode(buf)?);
		}
		Ok(Self { entries })
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn ordered_by_preference() {
		let mut set = DelegationSet::new();
		set.add(1, Name::new().append_str("gop"));
		set.add(0, Name::new().append_str("frame"));

		assert_eq!(set.get(0).unwrap().preference, 0);
		assert_eq!(set.get(0).unwrap().name.to_string(), "/frame");
		assert_eq!(set.get(1).unwrap().preference, 1);
	}

	#[test]
	fn wire_roundtrip() {
		let mut set = DelegationSet::new();
		set.add(0, Name::new().append_str("a").append_sequence(41));
		set.add(1, Name::new().append_str("b"));

		let mut wire = set.encode_bytes();
		let decoded = DelegationSet::decode(&mut wire).unwrap();
		assert_eq!(decoded, set);
	}
}
