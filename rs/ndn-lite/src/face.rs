use crate::data::Data;

/// The transport seam.
///
/// `put_data` is non-blocking; it hands the packet to the forwarder and
/// returns. Reactive producers call it from the face thread.
pub trait Face {
	fn put_data(&self, data: &Data);
}
