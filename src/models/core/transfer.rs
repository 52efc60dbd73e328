use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::Asset;

/// The distributed signer group's public key for a transfer.
///
/// Stored as raw serialized bytes; chain adapters parse it into their native
/// key type during address derivation.
#[derive(Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ShardPublicKey(Vec<u8>);

impl ShardPublicKey {
	pub fn new(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Debug for ShardPublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ShardPublicKey({})", hex::encode(&self.0))
	}
}

/// The immutable parameters of one logical transfer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransferParams {
	pub asset: Asset,
	pub to_chain: String,
	pub to_address: String,
	pub nonce: u64,
}

/// Collision-resistant hash binding a transfer's immutable parameters.
///
/// Two transfers with any differing parameter (including the nonce) hash to
/// different values, which in turn derive different gateway addresses.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferHash([u8; 32]);

impl TransferHash {
	/// Computes the hash of the given transfer parameters.
	///
	/// Fields are length-prefixed before hashing so that no two distinct
	/// parameter tuples produce the same pre-image.
	pub fn of(params: &TransferParams) -> Self {
		let mut hasher = Sha256::new();
		hasher.update(b"crossgate/transfer/v1");
		for field in [
			params.asset.symbol.as_bytes(),
			params.to_chain.as_bytes(),
			params.to_address.as_bytes(),
		] {
			hasher.update((field.len() as u64).to_be_bytes());
			hasher.update(field);
		}
		hasher.update(params.nonce.to_be_bytes());
		Self(hasher.finalize().into())
	}

	pub fn from_bytes(bytes: [u8; 32]) -> Self {
		Self(bytes)
	}

	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}
}

impl fmt::Debug for TransferHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TransferHash({})", hex::encode(self.0))
	}
}

impl fmt::Display for TransferHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", hex::encode(self.0))
	}
}
