use bytes::{Buf, Bytes, BytesMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use sha2::{Digest, Sha256};

use crate::coding::{self, Decode, DecodeError, Encode};
use crate::name::{Component, Name, DIGEST_SIZE};

/// TLV types of a Data packet and its nested fields.
pub const TLV_DATA: u64 = 0x06;
pub const TLV_META_INFO: u64 = 0x14;
pub const TLV_CONTENT: u64 = 0x15;
pub const TLV_SIGNATURE_INFO: u64 = 0x16;
pub const TLV_SIGNATURE_VALUE: u64 = 0x17;
pub const TLV_CONTENT_TYPE: u64 = 0x18;
pub const TLV_FRESHNESS_PERIOD: u64 = 0x19;
pub const TLV_FINAL_BLOCK_ID: u64 = 0x1A;
pub const TLV_SIGNATURE_TYPE: u64 = 0x1B;
pub const TLV_KEY_LOCATOR: u64 = 0x1C;

/// Wire codes for the supported signature schemes.
#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum SignatureType {
	DigestSha256 = 0,
	Sha256WithEcdsa = 3,
}

/// Producer-declared packet metadata.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct MetaInfo {
	pub content_type: Option<u64>,
	pub freshness_ms: Option<u64>,
	pub final_block_id: Option<Component>,
}

impl MetaInfo {
	fn is_empty(&self) -> bool {
		self.content_type.is_none() && self.freshness_ms.is_none() && self.final_block_id.is_none()
	}
}

impl Encode for MetaInfo {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		let mut body = BytesMut::new();
		if let Some(ct) = self.content_type {
			coding::put_tlv_nonneg(&mut body, TLV_CONTENT_TYPE, ct);
		}
		if let Some(freshness) = self.freshness_ms {
			coding::put_tlv_nonneg(&mut body, TLV_FRESHNESS_PERIOD, freshness);
		}
		if let Some(fbi) = &self.final_block_id {
			coding::put_tlv(&mut body, TLV_FINAL_BLOCK_ID, &fbi.encode_bytes());
		}
		coding::put_tlv(w, TLV_META_INFO, &body);
	}
}

impl Decode for MetaInfo {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let mut body = coding::expect_tlv(buf, TLV_META_INFO)?;

		let content_type = match coding::maybe_tlv(&mut body, TLV_CONTENT_TYPE)? {
			Some(mut v) => Some(coding::get_nonneg(&mut v)?),
			None => None,
		};
		let freshness_ms = match coding::maybe_tlv(&mut body, TLV_FRESHNESS_PERIOD)? {
			Some(mut v) => Some(coding::get_nonneg(&mut v)?),
			None => None,
		};
		let final_block_id = match coding::maybe_tlv(&mut body, TLV_FINAL_BLOCK_ID)? {
			Some(mut v) => Some(Component::decode(&mut v)?),
			None => None,
		};

		Ok(Self {
			content_type,
			freshness_ms,
			final_block_id,
		})
	}
}

/// The signature carried by a [Data] packet.
///
/// Data and parity segments use [Signature::DigestSha256]: the producer assigns
/// a zero-filled digest and [Data::wire_encode] computes the real one, since
/// the implicit digest in the name is what consumers verify. Everything else is
/// signed by the external keychain, which fills in [Signature::KeyChain].
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Signature {
	DigestSha256 { digest: [u8; DIGEST_SIZE] },
	KeyChain { key_locator: Name, value: Bytes },
}

impl Signature {
	/// A digest signature with zeroed bits, finalized at wire-encode time.
	pub fn phony() -> Self {
		Self::DigestSha256 {
			digest: [0; DIGEST_SIZE],
		}
	}

	pub fn is_digest(&self) -> bool {
		matches!(self, Self::DigestSha256 { .. })
	}

	fn typ(&self) -> SignatureType {
		match self {
			Self::DigestSha256 { .. } => SignatureType::DigestSha256,
			Self::KeyChain { .. } => SignatureType::Sha256WithEcdsa,
		}
	}

	// SignatureInfo TLV: the type code plus the key locator when present.
	fn encode_info<W: bytes::BufMut>(&self, w: &mut W) {
		let mut body = BytesMut::new();
		coding::put_tlv_nonneg(&mut body, TLV_SIGNATURE_TYPE, self.typ().into());
		if let Self::KeyChain { key_locator, .. } = self {
			coding::put_tlv(&mut body, TLV_KEY_LOCATOR, &key_locator.encode_bytes());
		}
		coding::put_tlv(w, TLV_SIGNATURE_INFO, &body);
	}
}

impl Default for Signature {
	fn default() -> Self {
		Self::phony()
	}
}

/// A named, signed payload.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Data {
	pub name: Name,
	pub meta_info: MetaInfo,
	pub content: Bytes,
	pub signature: Signature,
}

impl Data {
	pub fn new(name: Name) -> Self {
		Self {
			name,
			..Default::default()
		}
	}

	pub fn set_content(&mut self, content: impl Into<Bytes>) {
		self.content = content.into();
	}

	/// The canonical bytes a signature covers: Name through SignatureInfo.
	pub fn signed_portion(&self) -> Bytes {
		let mut buf = BytesMut::new();
		self.name.encode(&mut buf);
		if !self.meta_info.is_empty() {
			self.meta_info.encode(&mut buf);
		}
		coding::put_tlv(&mut buf, TLV_CONTENT, &self.content);
		self.signature.encode_info(&mut buf);
		buf.freeze()
	}

	/// The full TLV encoding of the packet.
	///
	/// A [Signature::DigestSha256] value is computed here, over the signed
	/// portion, regardless of the digest bits currently stored.
	pub fn wire_encode(&self) -> Bytes {
		let signed = self.signed_portion();

		let value: Bytes = match &self.signature {
			Signature::DigestSha256 { .. } => {
				let digest: [u8; DIGEST_SIZE] = Sha256::digest(&signed).into();
				Bytes::copy_from_slice(&digest)
			}
			Signature::KeyChain { value, .. } => value.clone(),
		};

		let mut body = BytesMut::with_capacity(signed.len() + value.len() + 4);
		body.extend_from_slice(&signed);
		coding::put_tlv(&mut body, TLV_SIGNATURE_VALUE, &value);

		let mut wire = BytesMut::with_capacity(body.len() + 8);
		coding::put_tlv(&mut wire, TLV_DATA, &body);
		wire.freeze()
	}

	/// The packet name plus the implicit SHA-256 digest of the wire encoding.
	pub fn full_name(&self) -> Name {
		let digest: [u8; DIGEST_SIZE] = Sha256::digest(self.wire_encode()).into();
		self.name.clone().append(Component::digest(digest))
	}
}

impl Encode for Data {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		w.put_slice(&self.wire_encode());
	}
}

impl Decode for Data {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let mut body = coding::expect_tlv(buf, TLV_DATA)?;

		let name = Name::decode(&mut body)?;
		let meta_info = match coding::maybe_tlv(&mut body, TLV_META_INFO)? {
			Some(v) => {
				let mut wrapped = BytesMut::new();
				coding::put_tlv(&mut wrapped, TLV_META_INFO, &v);
				MetaInfo::decode(&mut wrapped.freeze())?
			}
			None => MetaInfo::default(),
		};
		let content = coding::maybe_tlv(&mut body, TLV_CONTENT)?.unwrap_or_default();

		let mut info = coding::expect_tlv(&mut body, TLV_SIGNATURE_INFO)?;
		let typ = coding::expect_tlv_nonneg(&mut info, TLV_SIGNATURE_TYPE)?;
		let typ = SignatureType::try_from(typ).map_err(|_| DecodeError::InvalidValue)?;
		let key_locator = match coding::maybe_tlv(&mut info, TLV_KEY_LOCATOR)? {
			Some(mut v) => Some(Name::decode(&mut v)?),
			None => None,
		};

		let value = coding::expect_tlv(&mut body, TLV_SIGNATURE_VALUE)?;
		if body.has_remaining() {
			return Err(DecodeError::Trailing);
		}

		let signature = match typ {
			SignatureType::DigestSha256 => {
				let digest: [u8; DIGEST_SIZE] = value.as_ref().try_into().map_err(|_| DecodeError::InvalidValue)?;
				Signature::DigestSha256 { digest }
			}
			SignatureType::Sha256WithEcdsa => Signature::KeyChain {
				key_locator: key_locator.ok_or(DecodeError::Missing)?,
				value,
			},
		};

		Ok(Self {
			name,
			meta_info,
			content,
			signature,
		})
	}
}
