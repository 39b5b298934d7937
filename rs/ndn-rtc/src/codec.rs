//! The seam to the low-level video codec.
//!
//! The encoder is contractually synchronous: every [VideoEncoder::encode] call
//! invokes exactly one of the sink callbacks before returning.

use bytes::Bytes;
use derive_more::Debug;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CodecError {
	#[error("unsupported settings: {0}")]
	UnsupportedSettings(String),

	#[error("encoder failure: {0}")]
	Encoder(String),
}

/// Raw pixel layouts accepted from the capture source.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ImageFormat {
	I420,
	Nv12,
	Bgra,
}

impl ImageFormat {
	/// Buffer size in bytes for a `width` x `height` image.
	pub fn buffer_size(&self, width: u32, height: u32) -> usize {
		let pixels = width as usize * height as usize;
		match self {
			Self::I420 | Self::Nv12 => pixels * 3 / 2,
			Self::Bgra => pixels * 4,
		}
	}
}

/// A raw image borrowed from the capture source for the duration of one
/// encode cycle.
#[derive(Clone, Copy, Debug)]
pub struct Image<'a> {
	pub width: u32,
	pub height: u32,
	pub format: ImageFormat,
	#[debug("{} bytes", data.len())]
	pub data: &'a [u8],
}

/// Whether a frame can be decoded independently.
#[derive(Clone, Copy, PartialEq, Eq, Debug, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum FrameType {
	Delta = 0,
	Key = 1,
}

/// One compressed frame out of the encoder.
#[derive(Clone, Debug)]
pub struct EncodedFrame {
	pub frame_type: FrameType,

	/// The compressed bitstream. The debug implementation shows only the
	/// length for brevity.
	#[debug("{} bytes", payload.len())]
	pub payload: Bytes,
}

impl EncodedFrame {
	pub fn is_key(&self) -> bool {
		self.frame_type == FrameType::Key
	}
}

/// Encoder configuration, also the source of the freshness plan.
#[derive(Clone, Copy, Debug)]
pub struct CodecSettings {
	pub width: u32,
	pub height: u32,
	pub fps: u32,
	/// Group-of-pictures length in frames.
	pub gop_length: u32,
	pub bitrate_kbps: u32,
}

impl Default for CodecSettings {
	fn default() -> Self {
		Self {
			width: 1280,
			height: 720,
			fps: 30,
			gop_length: 30,
			bitrate_kbps: 3000,
		}
	}
}

/// Counters maintained by the codec itself.
#[derive(Clone, Copy, Default, Debug)]
pub struct CodecStats {
	/// Frames fed to the encoder.
	pub n_frames: u64,
	/// Frames that produced output.
	pub n_processed: u64,
	/// Frames the encoder chose to drop.
	pub n_dropped: u64,
}

/// Receives the synchronous outcome of one encode call.
pub trait FrameSink {
	fn on_encoded(&mut self, frame: &EncodedFrame);
	fn on_dropped(&mut self, image: &Image<'_>);
}

/// The opaque video encoder seam.
pub trait VideoEncoder: Send {
	fn configure(&mut self, settings: &CodecSettings) -> Result<(), CodecError>;

	/// Encode one image, invoking exactly one sink callback before returning.
	fn encode(&mut self, image: &Image<'_>, force_keyframe: bool, sink: &mut dyn FrameSink)
		-> Result<(), CodecError>;

	fn stats(&self) -> CodecStats;
}
