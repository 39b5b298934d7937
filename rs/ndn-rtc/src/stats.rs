//! Producer-side counters.
//!
//! Counters are atomics so the encode cycle and the face-thread callbacks can
//! bump them without blocking each other.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::codec::CodecStats;

/// Live counters, shared between the encode cycle and reactive callbacks.
#[derive(Default, Debug)]
pub struct ProducerStats {
	/// Every signed packet, data and parity segments included.
	pub published_segments: AtomicU64,
	/// Content payload bytes across all published packets.
	pub bytes_published: AtomicU64,
	/// Wire-encoded bytes across all published packets.
	pub raw_bytes_published: AtomicU64,
	/// Keychain signature operations.
	pub signatures: AtomicU64,
	/// Published key frames.
	pub published_key_frames: AtomicU64,
	/// `_latest` pointer replies served.
	pub rdr_pointers: AtomicU64,
}

/// A point-in-time view over [ProducerStats], codec counters and the current
/// framerate.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct StatsSnapshot {
	/// Images accepted from the capture source. Capture and processing are the
	/// same event in this single-threaded arrangement.
	pub captured: u64,
	pub processed: u64,
	pub encoded: u64,
	pub dropped: u64,

	pub published_segments: u64,
	pub bytes_published: u64,
	pub raw_bytes_published: u64,
	pub signatures: u64,
	pub published_key_frames: u64,
	pub rdr_pointers: u64,

	/// Current producer framerate, frames per second.
	pub framerate: f64,
}

impl StatsSnapshot {
	pub fn new(stats: &ProducerStats, codec: CodecStats, framerate: f64) -> Self {
		Self {
			captured: codec.n_frames,
			processed: codec.n_frames,
			encoded: codec.n_processed,
			dropped: codec.n_dropped,

			published_segments: stats.published_segments.load(Ordering::Relaxed),
			bytes_published: stats.bytes_published.load(Ordering::Relaxed),
			raw_bytes_published: stats.raw_bytes_published.load(Ordering::Relaxed),
			signatures: stats.signatures.load(Ordering::Relaxed),
			published_key_frames: stats.published_key_frames.load(Ordering::Relaxed),
			rdr_pointers: stats.rdr_pointers.load(Ordering::Relaxed),

			framerate,
		}
	}
}
