use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::models::{ShardPublicKey, TransferHash};

/// A reference to an on-chain event.
///
/// `txid` is kept in the chain's native byte order. Identity is the
/// `(txid, index)` pair; the amount is not part of equality.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainTransaction {
	pub txid: Vec<u8>,
	pub index: u32,
	pub amount: u128,
}

impl ChainTransaction {
	/// Display-order hex of the transaction id (reversed byte order, as
	/// UTXO-family explorers and RPC interfaces render it).
	pub fn txid_hex(&self) -> String {
		let mut bytes = self.txid.clone();
		bytes.reverse();
		hex::encode(bytes)
	}
}

impl PartialEq for ChainTransaction {
	fn eq(&self, other: &Self) -> bool {
		self.txid == other.txid && self.index == other.index
	}
}

impl Eq for ChainTransaction {}

impl Hash for ChainTransaction {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.txid.hash(state);
		self.index.hash(state);
	}
}

/// A `ChainTransaction` plus the chain-specific fields needed to later spend
/// or reference it. Produced by the deposit watcher, consumed by the
/// signing/broadcast pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InputChainTransaction {
	pub tx: ChainTransaction,
	pub script_pubkey: Vec<u8>,
	pub block_height: Option<u64>,
}

/// A derived, chain-encoded gateway address plus the data used to derive it.
///
/// One gateway address is valid for exactly one logical transfer; the locking
/// script bytes are retained so the deposit can be referenced when spending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayAddress {
	pub address: String,
	pub script: Vec<u8>,
	pub shard_public_key: ShardPublicKey,
	pub transfer_hash: TransferHash,
}
