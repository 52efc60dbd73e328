use serde::{Deserialize, Serialize};

/// An unspent transaction output as reported by a data provider.
///
/// `txid` is in the chain's native byte order. `block_height` is `None` while
/// the output sits in the mempool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Utxo {
	pub txid: Vec<u8>,
	pub index: u32,
	pub amount: u128,
	pub script_pubkey: Vec<u8>,
	pub block_height: Option<u64>,
}

/// One output of an indexed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TxOutput {
	pub index: u32,
	pub amount: u128,
	pub script_pubkey: Vec<u8>,
	pub address: Option<String>,
}

/// A transaction returned by an indexed address lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddressTx {
	pub txid: Vec<u8>,
	pub block_height: Option<u64>,
	pub outputs: Vec<TxOutput>,
}
