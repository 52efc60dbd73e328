//! Chain-family tags and raw ledger records.
//!
//! The raw records mirror what data providers return for the reference UTXO
//! chain family; chain adapters convert them into core domain types.

mod utxo;

use serde::{Deserialize, Serialize};

pub use utxo::{AddressTx, TxOutput, Utxo};

/// The ledger family a network belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
	/// UTXO-based ledgers (outputs referenced by transaction id + index)
	Utxo,
	/// Account-based ledgers
	Account,
}
