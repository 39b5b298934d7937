//! Sliding-window statistics for the publish hot path.
//!
//! All estimators take the current wall-clock milliseconds as an argument
//! instead of reading a clock, so callers control time and tests are
//! deterministic.

use std::collections::VecDeque;

/// The retention policy of an [Average].
#[derive(Clone, Copy, Debug)]
pub enum Window {
	/// Keep samples newer than `span_ms`.
	Time { span_ms: u64 },
	/// Keep the last `count` samples.
	Samples { count: usize },
}

/// A windowed arithmetic mean.
#[derive(Clone, Debug)]
pub struct Average {
	window: Window,
	samples: VecDeque<(u64, f64)>,
}

impl Average {
	pub fn time_window(span_ms: u64) -> Self {
		Self {
			window: Window::Time { span_ms },
			samples: VecDeque::new(),
		}
	}

	pub fn sample_window(count: usize) -> Self {
		Self {
			window: Window::Samples { count },
			samples: VecDeque::new(),
		}
	}

	/// Record a sample observed at `now_ms`.
	pub fn push(&mut self, now_ms: u64, value: f64) {
		self.samples.push_back((now_ms, value));
		self.evict(now_ms);
	}

	/// The mean of the retained samples, or zero when empty.
	pub fn value(&self) -> f64 {
		if self.samples.is_empty() {
			return 0.0;
		}
		self.samples.iter().map(|(_, v)| v).sum::<f64>() / self.samples.len() as f64
	}

	fn evict(&mut self, now_ms: u64) {
		match self.window {
			Window::Time { span_ms } => {
				while let Some(&(t, _)) = self.samples.front() {
					if now_ms.saturating_sub(t) <= span_ms {
						break;
					}
					self.samples.pop_front();
				}
			}
			Window::Samples { count } => {
				while self.samples.len() > count {
					self.samples.pop_front();
				}
			}
		}
	}
}

/// An event-rate meter over a sliding time window.
///
/// The meter counts ticks; there is no sample value. [FreqMeter::rate] is the
/// number of ticks observed within the window, scaled to events per second.
#[derive(Clone, Debug)]
pub struct FreqMeter {
	span_ms: u64,
	ticks: VecDeque<u64>,
}

impl FreqMeter {
	pub fn new(span_ms: u64) -> Self {
		Self {
			span_ms,
			ticks: VecDeque::new(),
		}
	}

	/// Record an event at `now_ms`.
	pub fn tick(&mut self, now_ms: u64) {
		self.ticks.push_back(now_ms);
		while let Some(&t) = self.ticks.front() {
			if now_ms.saturating_sub(t) <= self.span_ms {
				break;
			}
			self.ticks.pop_front();
		}
	}

	/// Events per second over the window.
	pub fn rate(&self) -> f64 {
		self.ticks.len() as f64 * 1000.0 / self.span_ms as f64
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn time_window_evicts_old_samples() {
		let mut avg = Average::time_window(100);
		avg.push(0, 10.0);
		avg.push(50, 20.0);
		assert_eq!(avg.value(), 15.0);

		// the first sample ages out
		avg.push(151, 30.0);
		assert_eq!(avg.value(), 25.0);
	}

	#[test]
	fn sample_window_keeps_last_n() {
		let mut avg = Average::sample_window(2);
		avg.push(0, 1.0);
		avg.push(1, 2.0);
		avg.push(2, 9.0);
		assert_eq!(avg.value(), 5.5);
	}

	#[test]
	fn empty_average_is_zero() {
		assert_eq!(Average::time_window(100).value(), 0.0);
		assert_eq!(Average::sample_window(2).value(), 0.0);
	}

	#[test]
	fn freq_meter_counts_events() {
		let mut meter = FreqMeter::new(1000);
		for t in (0..30).map(|i| i * 33) {
			meter.tick(t);
		}
		assert_eq!(meter.rate(), 30.0);
	}

	#[test]
	fn freq_meter_forgets_stale_ticks() {
		let mut meter = FreqMeter::new(1000);
		meter.tick(0);
		meter.tick(2000);
		assert_eq!(meter.rate(), 1.0);
	}
}
