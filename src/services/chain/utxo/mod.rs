//! Reference adapter for UTXO-family ledgers.

mod adapter;
mod derivation;

pub use adapter::UtxoAdapter;
pub use derivation::{gateway_address, gateway_script};
