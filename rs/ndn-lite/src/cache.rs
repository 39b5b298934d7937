use crate::data::Data;
use crate::face::Face;
use crate::interest::Interest;
use crate::name::Name;

/// An interest that arrived before matching data was available.
#[derive(Clone, Debug)]
pub struct PendingInterest {
	pub interest: Interest,
	/// Wall-clock receipt timestamp, in milliseconds.
	pub received_ms: u64,
}

/// Callback invoked by the cache when an interest matches a registered filter
/// and no stored packet satisfies it. Runs on the face thread.
pub type InterestCallback = Box<dyn Fn(&Name, &Interest, &dyn Face) + Send + Sync>;

/// The packet-level memory content cache seam.
///
/// The cache owns packet storage and pending-interest bookkeeping; producers
/// only insert packets, register filters and query the pending-interest table.
pub trait ContentCache: Send + Sync {
	/// Store a packet, satisfying any pending interests for its name.
	fn add(&self, data: Data);

	/// Register a callback for unsatisfied interests under `prefix`.
	fn set_interest_filter(&self, prefix: Name, callback: InterestCallback);

	/// Pending interests whose name equals `name`, oldest first.
	fn pending_interests_for(&self, name: &Name) -> Vec<PendingInterest>;
}
