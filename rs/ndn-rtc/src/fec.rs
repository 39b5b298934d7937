//! Systematic Reed-Solomon erasure coding over GF(2^8).
//!
//! A frame's encoded payload is zero-padded to `n_data` symbols of
//! `symbol_size` bytes; the encoder produces `n_parity` parity symbols of the
//! same size. Consumers can recover the frame from any `n_data` of the
//! `n_data + n_parity` published segments.

use reed_solomon_erasure::galois_8::ReedSolomon;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FecError {
	#[error("invalid shard geometry: {n_data} data + {n_parity} parity")]
	InvalidGeometry { n_data: usize, n_parity: usize },

	#[error("input is {actual} bytes, expected {expected}")]
	InvalidInput { expected: usize, actual: usize },

	#[error("reed-solomon: {0:?}")]
	Codec(reed_solomon_erasure::Error),
}

impl From<reed_solomon_erasure::Error> for FecError {
	fn from(err: reed_solomon_erasure::Error) -> Self {
		Self::Codec(err)
	}
}

/// Reed-Solomon parity generator for one shard geometry.
pub struct Rs28Encoder {
	rs: ReedSolomon,
	n_data: usize,
	n_parity: usize,
	symbol_size: usize,
}

impl Rs28Encoder {
	pub fn new(n_data: usize, n_parity: usize, symbol_size: usize) -> Result<Self, FecError> {
		if n_data == 0 || n_parity == 0 || symbol_size == 0 {
			return Err(FecError::InvalidGeometry { n_data, n_parity });
		}

		Ok(Self {
			rs: ReedSolomon::new(n_data, n_parity)?,
			n_data,
			n_parity,
			symbol_size,
		})
	}

	/// Compute parity over a zero-padded input of exactly
	/// `n_data * symbol_size` bytes, returning `n_parity * symbol_size` parity
	/// bytes.
	pub fn encode(&self, padded: &[u8]) -> Result<Vec<u8>, FecError> {
		let expected = self.n_data * self.symbol_size;
		if padded.len() != expected {
			return Err(FecError::InvalidInput {
				expected,
				actual: padded.len(),
			});
		}

		let mut shards: Vec<Vec<u8>> = padded.chunks(self.symbol_size).map(<[u8]>::to_vec).collect();
		shards.resize(self.n_data + self.n_parity, vec![0u8; self.symbol_size]);

		self.rs.encode(&mut shards)?;

		let mut parity = Vec::with_capacity(self.n_parity * self.symbol_size);
		for shard in &shards[self.n_data..] {
			parity.extend_from_slice(shard);
		}
		Ok(parity)
	}
}

/// Reed-Solomon shard recovery, the counterpart of [Rs28Encoder].
pub struct Rs28Decoder {
	rs: ReedSolomon,
	n_data: usize,
	symbol_size: usize,
}

impl Rs28Decoder {
	pub fn new(n_data: usize, n_parity: usize, symbol_size: usize) -> Result<Self, FecError> {
		if n_data == 0 || n_parity == 0 || symbol_size == 0 {
			return Err(FecError::InvalidGeometry { n_data, n_parity });
		}

		Ok(Self {
			rs: ReedSolomon::new(n_data, n_parity)?,
			n_data,
			symbol_size,
		})
	}

	/// Reconstruct the data symbols from any `n_data` surviving shards.
	///
	/// `shards` holds `n_data + n_parity` entries in shard order, `None` for
	/// the erased ones. Returns the recovered `n_data * symbol_size` data
	/// bytes.
	pub fn recover(&self, mut shards: Vec<Option<Vec<u8>>>) -> Result<Vec<u8>, FecError> {
		for shard in shards.iter().flatten() {
			if shard.len() != self.symbol_size {
				return Err(FecError::InvalidInput {
					expected: self.symbol_size,
					actual: shard.len(),
				});
			}
		}

		self.rs.reconstruct_data(&mut shards)?;

		let mut data = Vec::with_capacity(self.n_data * self.symbol_size);
		for shard in shards.iter().take(self.n_data) {
			match shard {
				Some(s) => data.extend_from_slice(s),
				None => return Err(FecError::Codec(reed_solomon_erasure::Error::TooFewShards)),
			}
		}
		Ok(data)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn padded_frame(len: usize, n_data: usize, symbol_size: usize) -> Vec<u8> {
		let mut padded: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
		padded.resize(n_data * symbol_size, 0);
		padded
	}

	#[test]
	fn parity_size() {
		let enc = Rs28Encoder::new(8, 2, 100).unwrap();
		let padded = padded_frame(756, 8, 100);
		let parity = enc.encode(&padded).unwrap();
		assert_eq!(parity.len(), 200);
	}

	#[test]
	fn rejects_bad_input_length() {
		let enc = Rs28Encoder::new(4, 1, 10).unwrap();
		assert!(matches!(
			enc.encode(&[0u8; 39]),
			Err(FecError::InvalidInput { expected: 40, actual: 39 })
		));
	}

	#[test]
	fn rejects_zero_geometry() {
		assert!(Rs28Encoder::new(0, 1, 10).is_err());
		assert!(Rs28Encoder::new(4, 0, 10).is_err());
		assert!(Rs28Encoder::new(4, 1, 0).is_err());
	}

	#[test]
	fn roundtrip_with_erasures() {
		let (n_data, n_parity, symbol_size) = (8, 2, 50);
		let enc = Rs28Encoder::new(n_data, n_parity, symbol_size).unwrap();
		let padded = padded_frame(389, n_data, symbol_size);
		let parity = enc.encode(&padded).unwrap();

		let mut shards: Vec<Option<Vec<u8>>> = padded
			.chunks(symbol_size)
			.chain(parity.chunks(symbol_size))
			.map(|s| Some(s.to_vec()))
			.collect();

		// erase as many shards as we have parity
		shards[0] = None;
		shards[5] = None;

		let dec = Rs28Decoder::new(n_data, n_parity, symbol_size).unwrap();
		let recovered = dec.recover(shards).unwrap();
		assert_eq!(recovered, padded);
	}

	#[test]
	fn roundtrip_with_parity_erasure() {
		let (n_data, n_parity, symbol_size) = (4, 1, 25);
		let enc = Rs28Encoder::new(n_data, n_parity, symbol_size).unwrap();
		let padded = padded_frame(100, n_data, symbol_size);
		let parity = enc.encode(&padded).unwrap();

		let mut shards: Vec<Option<Vec<u8>>> = padded
			.chunks(symbol_size)
			.chain(parity.chunks(symbol_size))
			.map(|s| Some(s.to_vec()))
			.collect();
		shards[2] = None;

		let dec = Rs28Decoder::new(n_data, n_parity, symbol_size).unwrap();
		assert_eq!(dec.recover(shards).unwrap(), padded);
	}

	#[test]
	fn too_many_erasures_fails() {
		let (n_data, n_parity, symbol_size) = (4, 1, 25);
		let enc = Rs28Encoder::new(n_data, n_parity, symbol_size).unwrap();
		let padded = padded_frame(100, n_data, symbol_size);
		let parity = enc.encode(&padded).unwrap();

		let mut shards: Vec<Option<Vec<u8>>> = padded
			.chunks(symbol_size)
			.chain(parity.chunks(symbol_size))
			.map(|s| Some(s.to_vec()))
			.collect();
		shards[0] = None;
		shards[1] = None;

		let dec = Rs28Decoder::new(n_data, n_parity, symbol_size).unwrap();
		assert!(dec.recover(shards).is_err());
	}
}
