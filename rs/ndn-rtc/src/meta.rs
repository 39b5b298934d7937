//! Metadata records published alongside the media.
//!
//! The stream-level record is JSON, updated once per stream. The per-frame and
//! live records are hand-coded binary: they ride the hot path and consumers
//! parse them on every fetch.

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use ndn_lite::coding::{self, Decode, DecodeError, Encode};

use crate::codec::FrameType;

/// Content-type tag carried by every frame meta envelope.
pub const FRAME_CONTENT_TYPE: &str = "ndnrtcv4";

/// Stream-level metadata, published once per stream under `_meta`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct StreamMeta {
	pub width: u32,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub height: Option<u32>,

	pub description: String,
}

impl StreamMeta {
	pub fn from_slice(v: &[u8]) -> Result<Self, serde_json::Error> {
		serde_json::from_slice(v)
	}

	pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
		serde_json::to_vec(self)
	}
}

/// Per-frame metadata, published under `<frame>/_meta` inside a
/// [ContentMetaInfo] envelope.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FrameMeta {
	/// Monotonic capture timestamp in nanoseconds.
	pub capture_ns: u64,
	/// Number of parity segments published for the frame.
	pub parity_size: u64,
	pub gop_number: u64,
	pub gop_position: u64,
	pub frame_type: FrameType,
	/// Milliseconds the earliest pending interest waited for this packet.
	pub generation_delay_ms: u64,
}

impl Encode for FrameMeta {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		self.capture_ns.encode(w);
		self.parity_size.encode(w);
		self.gop_number.encode(w);
		self.gop_position.encode(w);
		u8::from(self.frame_type).encode(w);
		self.generation_delay_ms.encode(w);
	}
}

impl Decode for FrameMeta {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let capture_ns = u64::decode(buf)?;
		let parity_size = u64::decode(buf)?;
		let gop_number = u64::decode(buf)?;
		let gop_position = u64::decode(buf)?;
		let frame_type = FrameType::try_from(u8::decode(buf)?).map_err(|_| DecodeError::InvalidValue)?;
		let generation_delay_ms = u64::decode(buf)?;

		Ok(Self {
			capture_ns,
			parity_size,
			gop_number,
			gop_position,
			frame_type,
			generation_delay_ms,
		})
	}
}

/// Live stream profile, computed on demand for `_live` requests.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LiveMeta {
	/// Monotonic timestamp of the last encode cycle, in nanoseconds.
	pub timestamp_ns: u64,
	/// Current producer framerate, frames per second.
	pub framerate: f64,
	/// Estimated data segments per delta frame.
	pub segnum_delta: f64,
	/// Estimated parity segments per delta frame.
	pub segnum_delta_parity: f64,
	/// Estimated data segments per key frame.
	pub segnum_key: f64,
	/// Estimated parity segments per key frame.
	pub segnum_key_parity: f64,
}

impl Encode for LiveMeta {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		self.timestamp_ns.encode(w);
		self.framerate.encode(w);
		self.segnum_delta.encode(w);
		self.segnum_delta_parity.encode(w);
		self.segnum_key.encode(w);
		self.segnum_key_parity.encode(w);
	}
}

impl Decode for LiveMeta {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		Ok(Self {
			timestamp_ns: u64::decode(buf)?,
			framerate: f64::decode(buf)?,
			segnum_delta: f64::decode(buf)?,
			segnum_delta_parity: f64::decode(buf)?,
			segnum_key: f64::decode(buf)?,
			segnum_key_parity: f64::decode(buf)?,
		})
	}
}

// ContentMetaInfo envelope TLV types.
const TLV_CONTENT_META_INFO: u64 = 128;
const TLV_CONTENT_META_TYPE: u64 = 129;
const TLV_CONTENT_META_TIMESTAMP: u64 = 130;
const TLV_CONTENT_META_HAS_SEGMENTS: u64 = 131;
const TLV_CONTENT_META_OTHER: u64 = 132;

/// A generic content envelope: a type tag, a wall-clock timestamp, a
/// has-segments flag and an opaque payload.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ContentMetaInfo {
	pub content_type: String,
	pub timestamp_ms: u64,
	pub has_segments: bool,
	pub other: Bytes,
}

impl Encode for ContentMetaInfo {
	fn encode<W: bytes::BufMut>(&self, w: &mut W) {
		let mut body = BytesMut::new();
		coding::put_tlv(&mut body, TLV_CONTENT_META_TYPE, self.content_type.as_bytes());
		coding::put_tlv_nonneg(&mut body, TLV_CONTENT_META_TIMESTAMP, self.timestamp_ms);
		coding::put_tlv(&mut body, TLV_CONTENT_META_HAS_SEGMENTS, &[self.has_segments as u8]);
		coding::put_tlv(&mut body, TLV_CONTENT_META_OTHER, &self.other);
		coding::put_tlv(w, TLV_CONTENT_META_INFO, &body);
	}
}

impl Decode for ContentMetaInfo {
	fn decode<B: bytes::Buf>(buf: &mut B) -> Result<Self, DecodeError> {
		let mut body = coding::expect_tlv(buf, TLV_CONTENT_META_INFO)?;

		let content_type = String::from_utf8(coding::expect_tlv(&mut body, TLV_CONTENT_META_TYPE)?.to_vec())?;
		let timestamp_ms = coding::expect_tlv_nonneg(&mut body, TLV_CONTENT_META_TIMESTAMP)?;
		let mut flag = coding::expect_tlv(&mut body, TLV_CONTENT_META_HAS_SEGMENTS)?;
		let has_segments = bool::decode(&mut flag)?;
		let other = coding::expect_tlv(&mut body, TLV_CONTENT_META_OTHER)?;

		Ok(Self {
			content_type,
			timestamp_ms,
			has_segments,
			other,
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn frame_meta_roundtrip() {
		let meta = FrameMeta {
			capture_ns: 123_456_789_000,
			parity_size: 2,
			gop_number: 4,
			gop_position: 97,
			frame_type: FrameType::Key,
			generation_delay_ms: 12,
		};

		let mut wire = meta.encode_bytes();
		assert_eq!(FrameMeta::decode_exact(&mut wire).unwrap(), meta);
	}

	#[test]
	fn live_meta_roundtrip() {
		let meta = LiveMeta {
			timestamp_ns: 1,
			framerate: 29.97,
			segnum_delta: 2.5,
			segnum_delta_parity: 1.0,
			segnum_key: 8.0,
			segnum_key_parity: 2.0,
		};

		let mut wire = meta.encode_bytes();
		assert_eq!(LiveMeta::decode_exact(&mut wire).unwrap(), meta);
	}

	#[test]
	fn envelope_roundtrip() {
		let envelope = ContentMetaInfo {
			content_type: FRAME_CONTENT_TYPE.to_string(),
			timestamp_ms: 1_700_000_000_123,
			has_segments: true,
			other: Bytes::from_static(b"frame meta bytes"),
		};

		let mut wire = envelope.encode_bytes();
		let decoded = ContentMetaInfo::decode_exact(&mut wire).unwrap();
		assert_eq!(decoded, envelope);
		assert_eq!(decoded.content_type, "ndnrtcv4");
	}

	#[test]
	fn stream_meta_json() {
		let meta = StreamMeta {
			width: 720,
			height: None,
			description: "conference camera".to_string(),
		};

		let json = meta.to_vec().unwrap();
		let text = String::from_utf8(json.clone()).unwrap();
		assert!(text.contains("\"width\":720"));
		assert!(!text.contains("height"));
		assert_eq!(StreamMeta::from_slice(&json).unwrap(), meta);
	}
}
