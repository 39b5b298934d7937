use thiserror::Error;

use crate::data::Data;

/// A signing error, surfaced from the keychain.
#[derive(Error, Debug, Clone)]
pub enum SignError {
	#[error("no signing key available")]
	NoKey,

	#[error("keychain error: {0}")]
	KeyChain(String),
}

/// The opaque keychain seam.
///
/// Implementations set [Data::signature] to a [crate::Signature::KeyChain]
/// computed over [Data::signed_portion].
pub trait Signer: Send + Sync {
	fn sign(&self, data: &mut Data) -> Result<(), SignError>;
}
