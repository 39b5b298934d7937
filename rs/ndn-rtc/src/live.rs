use crate::codec::FrameType;
use crate::estimators::{Average, FreqMeter};

/// Which half of a frame's segments an estimate refers to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SegmentClass {
	Data,
	Parity,
}

/// Rolling profile of the published stream, served on `_live` requests.
///
/// Delta-frame counts use short time windows; key frames are rare, so their
/// counts use a last-two-samples window instead and are not averaged away by
/// time.
pub struct LiveMetadata {
	rate_meter: FreqMeter,
	delta_data: Average,
	delta_parity: Average,
	key_data: Average,
	key_parity: Average,
}

impl Default for LiveMetadata {
	fn default() -> Self {
		Self {
			rate_meter: FreqMeter::new(1000),
			delta_data: Average::time_window(100),
			delta_parity: Average::time_window(100),
			key_data: Average::sample_window(2),
			key_parity: Average::sample_window(2),
		}
	}
}

impl LiveMetadata {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record one published frame and its segment counts.
	pub fn update(&mut self, now_ms: u64, is_key: bool, n_data: usize, n_parity: usize) {
		let (data_avg, parity_avg) = match is_key {
			true => (&mut self.key_data, &mut self.key_parity),
			false => (&mut self.delta_data, &mut self.delta_parity),
		};

		self.rate_meter.tick(now_ms);
		data_avg.push(now_ms, n_data as f64);
		parity_avg.push(now_ms, n_parity as f64);
	}

	/// Current publish rate in frames per second.
	pub fn rate(&self) -> f64 {
		self.rate_meter.rate()
	}

	/// Current segment-count estimate for the given frame type and class.
	pub fn segments_estimate(&self, frame_type: FrameType, class: SegmentClass) -> f64 {
		match (frame_type, class) {
			(FrameType::Key, SegmentClass::Data) => self.key_data.value(),
			(FrameType::Key, SegmentClass::Parity) => self.key_parity.value(),
			(FrameType::Delta, SegmentClass::Data) => self.delta_data.value(),
			(FrameType::Delta, SegmentClass::Parity) => self.delta_parity.value(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn routes_counts_by_frame_type() {
		let mut live = LiveMetadata::new();
		live.update(0, false, 2, 1);
		live.update(33, false, 4, 1);
		live.update(66, true, 8, 2);

		assert_eq!(live.segments_estimate(FrameType::Delta, SegmentClass::Data), 3.0);
		assert_eq!(live.segments_estimate(FrameType::Delta, SegmentClass::Parity), 1.0);
		assert_eq!(live.segments_estimate(FrameType::Key, SegmentClass::Data), 8.0);
		assert_eq!(live.segments_estimate(FrameType::Key, SegmentClass::Parity), 2.0);
	}

	#[test]
	fn key_estimates_survive_delta_bursts() {
		let mut live = LiveMetadata::new();
		live.update(0, true, 8, 2);

		// a long run of deltas must not dilute the key estimate
		for i in 1..100 {
			live.update(i * 33, false, 2, 1);
		}
		assert_eq!(live.segments_estimate(FrameType::Key, SegmentClass::Data), 8.0);
	}

	#[test]
	fn rate_counts_published_frames() {
		let mut live = LiveMetadata::new();
		for i in 0..30 {
			live.update(i * 33, false, 2, 1);
		}
		assert_eq!(live.rate(), 30.0);
	}
}
