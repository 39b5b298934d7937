use bytes::BytesMut;

use ndn_lite::{Data, Name, DIGEST_SIZE};

use crate::names;

/// The authoritative segment inventory of one frame.
///
/// A manifest is a Data packet named `<frame>/_manifest` whose content is the
/// concatenation of the 32-byte implicit digests of every data and parity
/// segment of the frame, in publish order.
pub struct SegmentsManifest {
	data: Data,
}

impl SegmentsManifest {
	/// Build the manifest over the given segments. Unsigned; the caller signs.
	pub fn new(frame_name: Name, segments: &[Data]) -> Self {
		let mut payload = BytesMut::with_capacity(DIGEST_SIZE * segments.len());

		for segment in segments {
			let full = segment.full_name();
			let digest = full.last().and_then(|c| c.as_digest()).unwrap_or(&[0; DIGEST_SIZE]);
			payload.extend_from_slice(digest);
		}

		let mut data = Data::new(frame_name.append_str(names::MANIFEST));
		data.set_content(payload.freeze());
		Self { data }
	}

	/// Whether the packet's implicit digest appears in the manifest.
	pub fn has_segment(&self, segment: &Data) -> bool {
		let full = segment.full_name();
		let digest = match full.last().and_then(|c| c.as_digest()) {
			Some(d) => d,
			None => return false,
		};

		self.data.content.chunks_exact(DIGEST_SIZE).any(|entry| entry == digest)
	}

	pub fn data(&self) -> &Data {
		&self.data
	}

	pub fn data_mut(&mut self) -> &mut Data {
		&mut self.data
	}

	pub fn into_data(self) -> Data {
		self.data
	}
}

impl From<Data> for SegmentsManifest {
	fn from(data: Data) -> Self {
		Self { data }
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use bytes::Bytes;

	fn segment(name: Name, payload: &'static [u8]) -> Data {
		let mut d = Data::new(name);
		d.set_content(Bytes::from_static(payload));
		d
	}

	#[test]
	fn content_is_concatenated_digests() {
		let frame = Name::new().append_str("s").append_sequence(0);
		let segments = vec![
			segment(frame.clone().append_segment(0), b"one"),
			segment(frame.clone().append_segment(1), b"two"),
			segment(frame.clone().append_str("parity").append_segment(0), b"p"),
		];

		let manifest = SegmentsManifest::new(frame.clone(), &segments);
		assert_eq!(manifest.data().content.len(), DIGEST_SIZE * 3);
		assert_eq!(manifest.data().name, frame.append_str("_manifest"));
	}

	#[test]
	fn membership() {
		let frame = Name::new().append_str("s").append_sequence(3);
		let inside = segment(frame.clone().append_segment(0), b"in");
		let outside = segment(frame.clone().append_segment(1), b"out");

		let manifest = SegmentsManifest::new(frame, std::slice::from_ref(&inside));
		assert!(manifest.has_segment(&inside));
		assert!(!manifest.has_segment(&outside));
	}

	#[test]
	fn every_digest_appears_once() {
		let frame = Name::new().append_str("s").append_sequence(9);
		let segments: Vec<Data> = (0..4)
			.map(|i| {
				let mut d = Data::new(frame.clone().append_segment(i));
				d.set_content(Bytes::from(vec![i as u8; 10]));
				d
			})
			.collect();

		let manifest = SegmentsManifest::new(frame, &segments);
		for s in &segments {
			let full = s.full_name();
			let digest = full.last().unwrap().as_digest().unwrap();
			let count = manifest
				.data()
				.content
				.chunks_exact(DIGEST_SIZE)
				.filter(|entry| *entry == digest)
				.count();
			assert_eq!(count, 1);
		}
	}
}
