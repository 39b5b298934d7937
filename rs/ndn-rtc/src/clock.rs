use std::sync::LazyLock;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// There's no zero Instant, so monotonic timestamps are measured from the first
// use within the process.
static MONOTONIC_ANCHOR: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Monotonic timestamp in nanoseconds.
///
/// Only differences are meaningful; the epoch is process-local.
pub fn monotonic_ns() -> u64 {
	MONOTONIC_ANCHOR.elapsed().as_nanos() as u64
}

/// Wall-clock timestamp in milliseconds since the Unix epoch.
pub fn wall_ms() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("system clock is earlier than 1970")
		.as_millis() as u64
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn monotonic_is_monotonic() {
		let a = monotonic_ns();
		let b = monotonic_ns();
		assert!(b >= a);
	}

	#[test]
	fn wall_is_plausible() {
		// 2020-01-01 in milliseconds
		assert!(wall_ms() > 1_577_836_800_000);
	}
}
