//! The producer-side streaming core.
//!
//! [VideoStreamProducer] turns raw images into batches of signed Data packets:
//! sliced payload segments, Reed-Solomon parity, a per-frame manifest and
//! metadata, GoP pointers on key frames, and the reactive `_latest` / `_live`
//! pointers served from pending interests.
//!
//! The producer is single-writer: [VideoStreamProducer::process_image] runs on
//! the capture thread and must finish within one frame interval. Reactive
//! callbacks run on the face thread and only touch the shared state behind
//! short-lived locks.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tracing::{debug, error, warn};

use ndn_lite::coding::Encode;
use ndn_lite::{Component, ContentCache, Data, DelegationSet, Face, Interest, Name, Signature, Signer};

use crate::clock;
use crate::codec::{CodecSettings, EncodedFrame, FrameSink, FrameType, Image, ImageFormat, VideoEncoder};
use crate::error::{Error, Result};
use crate::fec::Rs28Encoder;
use crate::live::{LiveMetadata, SegmentClass};
use crate::manifest::SegmentsManifest;
use crate::meta::{ContentMetaInfo, FrameMeta, LiveMeta, StreamMeta, FRAME_CONTENT_TYPE};
use crate::names;
use crate::stats::{ProducerStats, StatsSnapshot};

/// Parity segments per data segment, rounded up.
pub const PARITY_RATIO: f64 = 0.2;

/// Default payload bytes per data or parity segment.
pub const DEFAULT_SEGMENT_SIZE: usize = 8000;

/// Producer configuration.
#[derive(Clone)]
pub struct Settings {
	pub codec: CodecSettings,
	/// Payload bytes per data/parity segment.
	pub segment_size: usize,
	/// When false, no parity segments are emitted.
	pub use_fec: bool,
	/// Mirror every emitted packet into the cache.
	pub store_in_mem_cache: bool,
	/// The packet-level memory content cache, if any. Required for reactive
	/// `_latest` / `_live` replies and generation-delay measurement.
	pub cache: Option<Arc<dyn ContentCache>>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			codec: CodecSettings::default(),
			segment_size: DEFAULT_SEGMENT_SIZE,
			use_fec: true,
			store_in_mem_cache: false,
			cache: None,
		}
	}
}

/// Freshness periods in milliseconds, derived once at construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Freshness {
	sample: u64,
	key_sample: u64,
	gop: u64,
	latest: u64,
	live: u64,
	meta: u64,
}

impl Freshness {
	fn plan(codec: &CodecSettings) -> Self {
		let sample = 1000 / codec.fps as u64;
		let gop = codec.gop_length as u64 * sample;

		Self {
			sample,
			key_sample: gop,
			gop,
			latest: sample,
			live: gop,
			meta: 4000,
		}
	}
}

/// Pointer state read by the reactive callbacks and advanced by the encode
/// cycle.
struct Pointers {
	last_frame_prefix: Name,
	last_gop_prefix: Name,
	last_publish_epoch_ms: u64,
	last_cycle_monotonic_ns: u64,
}

/// State shared between the capture thread and the face thread.
///
/// Locks are held only around field access, never across signing, encoding or
/// face calls.
struct Shared {
	stream_prefix: Name,
	freshness: Freshness,
	signer: Arc<dyn Signer>,
	stats: ProducerStats,

	pointers: Mutex<Pointers>,
	live: Mutex<LiveMetadata>,
	/// Packets generated outside the encode cycle, appended to the next batch.
	queued: Mutex<Vec<Data>>,
}

impl Shared {
	/// Digest signature: zeroed bits, finalized at wire-encode time. The
	/// implicit digest in the name is what consumers verify.
	fn sign_digest(&self, data: &mut Data) {
		data.signature = Signature::phony();
	}

	/// Full keychain signature, for everything that is not a payload segment.
	fn sign_keychain(&self, data: &mut Data) -> Result<()> {
		self.signer.sign(data)?;
		Ok(())
	}

	/// Record a signed packet in the statistics. Frame packets are recorded
	/// in one step once the whole frame has published.
	fn account(&self, data: &Data) {
		use std::sync::atomic::Ordering::Relaxed;

		if !data.signature.is_digest() {
			self.stats.signatures.fetch_add(1, Relaxed);
		}
		self.stats.bytes_published.fetch_add(data.content.len() as u64, Relaxed);
		self.stats
			.raw_bytes_published
			.fetch_add(data.wire_encode().len() as u64, Relaxed);
		self.stats.published_segments.fetch_add(1, Relaxed);
	}

	fn enqueue(&self, data: Data) {
		self.queued.lock().unwrap().push(data);
	}

	/// Build and sign a `_latest` pointer from the current pointer state.
	fn make_latest(&self) -> Result<Data> {
		let (publish_ms, set) = {
			let pointers = self.pointers.lock().unwrap();
			let mut set = DelegationSet::new();
			set.add(0, pointers.last_frame_prefix.clone());
			set.add(1, pointers.last_gop_prefix.clone());
			(pointers.last_publish_epoch_ms, set)
		};

		let name = self
			.stream_prefix
			.clone()
			.append_str(names::LATEST)
			.append_timestamp(publish_ms);

		let mut data = Data::new(name);
		data.meta_info.freshness_ms = Some(self.freshness.latest);
		data.set_content(set.encode_bytes());
		self.sign_keychain(&mut data)?;
		self.account(&data);
		Ok(data)
	}

	/// Build and sign a `_live` profile from the current estimators.
	fn make_live(&self) -> Result<Data> {
		let (publish_ms, timestamp_ns) = {
			let pointers = self.pointers.lock().unwrap();
			(pointers.last_publish_epoch_ms, pointers.last_cycle_monotonic_ns)
		};

		let meta = {
			let live = self.live.lock().unwrap();
			LiveMeta {
				timestamp_ns,
				framerate: live.rate(),
				segnum_delta: live.segments_estimate(FrameType::Delta, SegmentClass::Data),
				segnum_delta_parity: live.segments_estimate(FrameType::Delta, SegmentClass::Parity),
				segnum_key: live.segments_estimate(FrameType::Key, SegmentClass::Data),
				segnum_key_parity: live.segments_estimate(FrameType::Key, SegmentClass::Parity),
			}
		};

		let name = self
			.stream_prefix
			.clone()
			.append_str(names::LIVE)
			.append_timestamp(publish_ms);

		let mut data = Data::new(name);
		data.meta_info.freshness_ms = Some(self.freshness.live);
		data.set_content(meta.encode_bytes());
		self.sign_keychain(&mut data)?;
		self.account(&data);
		Ok(data)
	}

	/// Reactive `_latest` handler, on the face thread.
	fn on_latest_request(&self, _interest: &Interest, face: &dyn Face) {
		match self.make_latest() {
			Ok(data) => {
				face.put_data(&data);
				debug!(name = %data.name, "_latest request satisfied");
				self.enqueue(data);
				self.stats.rdr_pointers.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
			}
			Err(err) => warn!(%err, "failed to answer _latest request"),
		}
	}

	/// Reactive `_live` handler, on the face thread.
	fn on_live_request(&self, _interest: &Interest, face: &dyn Face) {
		match self.make_live() {
			Ok(data) => {
				face.put_data(&data);
				debug!(name = %data.name, "_live request satisfied");
				self.enqueue(data);
			}
			Err(err) => warn!(%err, "failed to answer _live request"),
		}
	}
}

/// The publishing half of the producer, borrowed by the encode-cycle sink
/// while the encoder itself is borrowed separately.
struct Publisher {
	settings: Settings,
	shared: Arc<Shared>,

	frame_seq: u64,
	gop_seq: u64,
	/// Position within the GoP. Grows monotonically across GoPs; consumers
	/// rely on the published values staying that way.
	gop_pos: u64,
	this_cycle_ns: u64,
}

/// One frame's worth of packets, built and signed but not yet counted.
struct PublishedFrame {
	name: Name,
	publish_ms: u64,
	n_data: usize,
	n_parity: usize,
}

impl Publisher {
	/// Handle one encoded frame: segments, parity, manifest, meta, pointers.
	fn on_encoded(&mut self, frame: &EncodedFrame, batch: &mut Vec<Data>) -> Result<()> {
		let frame_start = batch.len();
		let published = self.publish_frame_gobj(frame, batch)?;

		let gop_prefix = match frame.is_key() {
			true => Some(self.publish_gop(&published.name, batch)?),
			false => None,
		};

		// every fallible sign is behind us; only now do the counters and
		// estimators move
		self.commit_frame(frame, &published, &batch[frame_start..]);

		if let Some(gop_prefix) = gop_prefix {
			self.shared.pointers.lock().unwrap().last_gop_prefix = gop_prefix;
			self.gop_seq += 1;
		}

		self.gop_pos += 1;
		self.frame_seq += 1;
		self.shared.pointers.lock().unwrap().last_frame_prefix = published.name;

		Ok(())
	}

	/// Record a fully published frame: packet counters, the publish timestamp
	/// and the live estimators.
	fn commit_frame(&self, frame: &EncodedFrame, published: &PublishedFrame, packets: &[Data]) {
		for data in packets {
			self.shared.account(data);
		}

		self.shared.pointers.lock().unwrap().last_publish_epoch_ms = published.publish_ms;

		self.shared.live.lock().unwrap().update(
			published.publish_ms,
			frame.is_key(),
			published.n_data,
			published.n_parity,
		);

		if frame.is_key() {
			self.shared
				.stats
				.published_key_frames
				.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
		}
	}

	/// Build and sign one frame as a generalized object: data segments, parity
	/// segments, the segments manifest and the frame meta. Nothing is counted
	/// here; the caller commits once the whole frame is known to have
	/// published.
	fn publish_frame_gobj(&mut self, frame: &EncodedFrame, batch: &mut Vec<Data>) -> Result<PublishedFrame> {
		let now_ms = clock::wall_ms();

		let frame_name = self.shared.stream_prefix.clone().append_sequence(self.frame_seq);
		let segment_size = self.settings.segment_size;
		let length = frame.payload.len();

		let n_data = std::cmp::max(1, length.div_ceil(segment_size));
		let mut n_parity = match self.settings.use_fec {
			true => std::cmp::max(1, (PARITY_RATIO * n_data as f64).ceil() as usize),
			false => 0,
		};

		let freshness = match frame.is_key() {
			true => self.shared.freshness.key_sample,
			false => self.shared.freshness.sample,
		};

		// parity over the zero-padded payload
		let mut parity = Vec::new();
		if n_parity > 0 {
			let mut padded = vec![0u8; n_data * segment_size];
			padded[..length].copy_from_slice(&frame.payload);

			match Rs28Encoder::new(n_data, n_parity, segment_size).and_then(|enc| enc.encode(&padded)) {
				Ok(bytes) => parity = bytes,
				Err(err) => {
					warn!(%err, "error generating parity data");
					n_parity = 0;
				}
			}
		}

		let frame_start = batch.len();
		let last_segment_size = length - segment_size * (n_data - 1);
		let data_final_block = Component::segment(n_data as u64 - 1);

		for seg in 0..n_data {
			let start = seg * segment_size;
			let size = match seg == n_data - 1 {
				true => last_segment_size,
				false => segment_size,
			};

			let mut data = Data::new(frame_name.clone().append_segment(seg as u64));
			data.meta_info.freshness_ms = Some(freshness);
			data.meta_info.final_block_id = Some(data_final_block.clone());
			data.set_content(frame.payload.slice(start..start + size));
			self.shared.sign_digest(&mut data);
			batch.push(data);
		}

		if n_parity > 0 {
			let parity_final_block = Component::segment(n_parity as u64 - 1);

			for seg in 0..n_parity {
				let start = seg * segment_size;

				let mut data = Data::new(frame_name.clone().append_str(names::PARITY).append_segment(seg as u64));
				data.meta_info.freshness_ms = Some(freshness);
				data.meta_info.final_block_id = Some(parity_final_block.clone());
				data.set_content(Bytes::copy_from_slice(&parity[start..start + segment_size]));
				self.shared.sign_digest(&mut data);
				batch.push(data);
			}
		}

		debug!(n_data, n_parity, "generated segments");

		let mut manifest = SegmentsManifest::new(frame_name.clone(), &batch[frame_start..]).into_data();
		self.shared.sign_keychain(&mut manifest)?;
		batch.push(manifest);

		batch.push(self.generate_frame_meta(now_ms, &frame_name, frame.frame_type, n_parity)?);

		debug!(name = %frame_name, "published frame gobj");

		Ok(PublishedFrame {
			name: frame_name,
			publish_ms: now_ms,
			n_data,
			n_parity,
		})
	}

	fn generate_frame_meta(
		&self,
		now_ms: u64,
		frame_name: &Name,
		frame_type: FrameType,
		n_parity: usize,
	) -> Result<Data> {
		let name = frame_name.clone().append_str(names::META);

		// measured only when a consumer is already waiting for this packet
		let mut generation_delay_ms = 0;
		if let Some(cache) = &self.settings.cache {
			if let Some(pending) = cache.pending_interests_for(&name).first() {
				generation_delay_ms = now_ms.saturating_sub(pending.received_ms);
				debug!(interest = %pending.interest, "pending interest hit");
			}
		}

		let meta = FrameMeta {
			capture_ns: self.this_cycle_ns,
			parity_size: n_parity as u64,
			gop_number: self.gop_seq,
			gop_position: self.gop_pos,
			frame_type,
			generation_delay_ms,
		};

		let envelope = ContentMetaInfo {
			content_type: FRAME_CONTENT_TYPE.to_string(),
			timestamp_ms: now_ms,
			has_segments: true,
			other: meta.encode_bytes(),
		};

		let mut data = Data::new(name);
		data.meta_info.freshness_ms = Some(match frame_type {
			FrameType::Key => self.shared.freshness.key_sample,
			FrameType::Delta => self.shared.freshness.sample,
		});
		data.set_content(envelope.encode_bytes());
		self.shared.sign_keychain(&mut data)?;
		Ok(data)
	}

	/// Publish the GoP pointers for a key frame and return the canonical
	/// prefix of the GoP it opens.
	fn publish_gop(&self, frame_prefix: &Name, batch: &mut Vec<Data>) -> Result<Name> {
		let gop_prefix = self.shared.stream_prefix.clone().append_str(names::GOP);
		let prev_frame_prefix = self.shared.pointers.lock().unwrap().last_frame_prefix.clone();

		if self.gop_seq > 0 {
			let name = gop_prefix
				.clone()
				.append_sequence(self.gop_seq)
				.append_str(names::GOP_END);

			let mut set = DelegationSet::new();
			set.add(0, prev_frame_prefix);

			let mut data = Data::new(name);
			data.meta_info.freshness_ms = Some(self.shared.freshness.gop);
			data.set_content(set.encode_bytes());
			self.shared.sign_keychain(&mut data)?;

			debug!(name = %data.name, target = %set.get(0).unwrap().name, "end gop");
			batch.push(data);
		}

		let name = gop_prefix
			.clone()
			.append_sequence(self.gop_seq + 1)
			.append_str(names::GOP_START);

		let mut set = DelegationSet::new();
		set.add(0, frame_prefix.clone());

		let mut data = Data::new(name);
		data.meta_info.freshness_ms = Some(self.shared.freshness.gop);
		data.set_content(set.encode_bytes());
		self.shared.sign_keychain(&mut data)?;

		debug!(name = %data.name, target = %set.get(0).unwrap().name, "start gop");
		batch.push(data);

		Ok(gop_prefix.append_sequence(self.gop_seq))
	}
}

/// Receives the synchronous encode outcome for one cycle.
struct CycleSink<'a> {
	publisher: &'a mut Publisher,
	batch: &'a mut Vec<Data>,
	failed: Option<Error>,
}

impl FrameSink for CycleSink<'_> {
	fn on_encoded(&mut self, frame: &EncodedFrame) {
		debug!(
			frame = self.publisher.frame_seq,
			ty = ?frame.frame_type,
			bytes = frame.payload.len(),
			"encoded"
		);

		if let Err(err) = self.publisher.on_encoded(frame, self.batch) {
			self.failed = Some(err);
		}
	}

	fn on_dropped(&mut self, _image: &Image<'_>) {
		warn!(frame = self.publisher.frame_seq, "frame dropped by encoder");
	}
}

/// The video stream publisher.
///
/// Owns the codec and the sequence counters; everything the face thread needs
/// lives in the internal shared state.
pub struct VideoStreamProducer {
	base_prefix: String,
	stream_name: String,
	timestamp_ms: u64,

	encoder: Box<dyn VideoEncoder>,
	publisher: Publisher,
}

impl VideoStreamProducer {
	/// Create a producer and enqueue its stream meta packet.
	///
	/// Installs the `_latest` and `_live` interest filters when a cache is
	/// attached.
	pub fn new(
		base_prefix: &str,
		stream_name: &str,
		settings: Settings,
		mut encoder: Box<dyn VideoEncoder>,
		signer: Arc<dyn Signer>,
	) -> Result<Self> {
		let timestamp_ms = clock::wall_ms();
		let base: Name = base_prefix.parse()?;
		let stream_prefix = base.append_timestamp(timestamp_ms).append_str(stream_name);

		encoder.configure(&settings.codec)?;

		let shared = Arc::new(Shared {
			stream_prefix: stream_prefix.clone(),
			freshness: Freshness::plan(&settings.codec),
			signer,
			stats: ProducerStats::default(),
			pointers: Mutex::new(Pointers {
				// sentinel: never a valid frame index
				last_frame_prefix: stream_prefix.clone().append_sequence(u64::MAX),
				last_gop_prefix: Name::new(),
				last_publish_epoch_ms: 0,
				last_cycle_monotonic_ns: 0,
			}),
			live: Mutex::new(LiveMetadata::new()),
			queued: Mutex::new(Vec::new()),
		});

		if let Some(cache) = &settings.cache {
			let this = shared.clone();
			cache.set_interest_filter(
				stream_prefix.clone().append_str(names::LIVE),
				Box::new(move |_prefix, interest, face| this.on_live_request(interest, face)),
			);

			let this = shared.clone();
			cache.set_interest_filter(
				stream_prefix.clone().append_str(names::LATEST),
				Box::new(move |_prefix, interest, face| this.on_latest_request(interest, face)),
			);
		}

		let producer = Self {
			base_prefix: base_prefix.to_string(),
			stream_name: stream_name.to_string(),
			timestamp_ms,
			encoder,
			publisher: Publisher {
				settings,
				shared,
				frame_seq: 0,
				gop_seq: 0,
				gop_pos: 0,
				this_cycle_ns: 0,
			},
		};

		producer.add_meta()?;
		Ok(producer)
	}

	// Build and enqueue the stream meta packet. Exactly once, at construction.
	fn add_meta(&self) -> Result<()> {
		let codec = &self.publisher.settings.codec;

		let mut meta = StreamMeta {
			width: codec.width,
			height: None,
			description: "description is not supported yet".to_string(),
		};
		// The deployed consumer schema reads the height out of the width
		// field, and no consumer reads `height`.
		// TODO: fix the field assignment together with the consumer schema.
		meta.width = codec.height;

		let shared = &self.publisher.shared;
		let mut data = Data::new(shared.stream_prefix.clone().append_str(names::META));
		data.meta_info.freshness_ms = Some(shared.freshness.meta);
		data.set_content(Bytes::from(meta.to_vec()?));
		shared.sign_keychain(&mut data)?;
		shared.account(&data);

		debug!(name = %data.name, "stream meta");
		shared.enqueue(data);
		Ok(())
	}

	/// Encode and publish one raw image.
	///
	/// Returns every packet produced this cycle: the frame's segments, parity,
	/// manifest and meta, any GoP pointers, then packets queued since the last
	/// cycle. The caller owns the batch and is responsible for sending it.
	pub fn process_image(&mut self, format: ImageFormat, pixels: &[u8]) -> Result<Vec<Data>> {
		debug!(frame = self.publisher.frame_seq, "incoming frame");

		let codec = self.publisher.settings.codec;
		let expected = format.buffer_size(codec.width, codec.height);
		if pixels.len() != expected {
			return Err(Error::InvalidImage {
				width: codec.width,
				height: codec.height,
				expected,
				actual: pixels.len(),
			});
		}

		self.publisher.this_cycle_ns = clock::monotonic_ns();

		let image = Image {
			width: codec.width,
			height: codec.height,
			format,
			data: pixels,
		};

		let mut batch = Vec::new();
		let mut sink = CycleSink {
			publisher: &mut self.publisher,
			batch: &mut batch,
			failed: None,
		};

		debug!("feeding frame into encoder");
		self.encoder.encode(&image, false, &mut sink)?;

		if let Some(err) = sink.failed.take() {
			// the frame's packets are withheld; queued packets still flush
			error!(%err, "failed to publish frame");
			batch.clear();
		}

		{
			let mut queued = self.publisher.shared.queued.lock().unwrap();
			batch.append(&mut queued);
		}

		if self.publisher.settings.store_in_mem_cache {
			if let Some(cache) = &self.publisher.settings.cache {
				for data in &batch {
					cache.add(data.clone());
				}
			}
		}

		self.publisher.shared.pointers.lock().unwrap().last_cycle_monotonic_ns = self.publisher.this_cycle_ns;

		Ok(batch)
	}

	/// The immutable stream prefix: `<base>/<timestamp>/<stream>`.
	pub fn prefix(&self) -> &Name {
		&self.publisher.shared.stream_prefix
	}

	pub fn base_prefix(&self) -> &str {
		&self.base_prefix
	}

	pub fn stream_name(&self) -> &str {
		&self.stream_name
	}

	/// Wall-clock milliseconds at construction; the second component of the
	/// stream prefix.
	pub fn timestamp_ms(&self) -> u64 {
		self.timestamp_ms
	}

	pub fn statistics(&self) -> StatsSnapshot {
		let shared = &self.publisher.shared;
		let framerate = shared.live.lock().unwrap().rate();
		StatsSnapshot::new(&shared.stats, self.encoder.stats(), framerate)
	}
}
