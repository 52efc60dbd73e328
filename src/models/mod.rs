//! Domain models and data structures for cross-chain transfers.
//!
//! This module contains all the core data structures used throughout the crate:
//!
//! - `blockchain`: Chain-family tags and raw ledger records returned by providers
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Network, Asset, Transfer, ChainTransaction)

mod blockchain;
mod config;
mod core;

// Re-export blockchain types
pub use blockchain::{AddressTx, ChainKind, TxOutput, Utxo};

// Re-export core types
pub use core::{
	builtin_networks, Asset, ChainTransaction, GatewayAddress, InputChainTransaction, Network,
	ProviderEndpoint, ShardPublicKey, TransferHash, TransferParams,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader};
