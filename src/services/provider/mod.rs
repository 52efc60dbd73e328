//! Data-provider backends and the priority-fallback pool.
//!
//! Provides abstractions and concrete implementations for fetching chain data
//! from third-party backends. Includes:
//!
//! - Generic data-provider trait
//! - Priority-ordered provider pool with fallback
//! - HTTP indexer backend
//! - Error handling for provider operations

mod error;
mod http;
mod pool;

use async_trait::async_trait;

pub use error::{ProviderError, ProviderFailure};
pub use http::HttpIndexerProvider;
pub use pool::ProviderPool;

use crate::models::{AddressTx, Utxo};

/// Query contract every data-source backend must satisfy.
///
/// All amounts are integers in the asset's smallest unit; all transaction ids
/// are fixed-length binary in the chain's native byte order. Implementations
/// must be safe to call concurrently.
#[async_trait]
pub trait DataProvider: Send + Sync {
	/// Human-readable backend label, used in logs and aggregate errors
	fn name(&self) -> String;

	/// Indexed lookup of transactions involving an address
	async fn fetch_txs(&self, address: &str) -> Result<Vec<AddressTx>, ProviderError>;

	/// Unspent outputs currently held by an address
	async fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, ProviderError>;

	/// A single output by `(txid, index)`; fails `NotFound` if absent
	async fn fetch_utxo(&self, txid: &[u8], index: u32) -> Result<Utxo, ProviderError>;

	/// Current best block height
	async fn fetch_height(&self) -> Result<u64, ProviderError>;
}
