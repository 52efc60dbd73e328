//! Priority-ordered provider pool.
//!
//! This module provides a thread-safe pool of data-provider backends that:
//! - Tries backends in ascending priority order for every query
//! - Falls back to the next backend on failure
//! - Aggregates per-backend failures when all of them fail
//! - Allows registering additional backends after construction
//!
//! No results are cached between calls; each query is a fresh fan-out.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::warn;

use crate::{
	models::{AddressTx, Network, Utxo},
	services::provider::{DataProvider, HttpIndexerProvider, ProviderError, ProviderFailure},
};

/// A backend handle plus its fallback priority.
struct ProviderRecord {
	provider: Arc<dyn DataProvider>,
	priority: u32,
	order: usize,
}

#[derive(Default)]
struct ProviderSet {
	records: Vec<ProviderRecord>,
	next_order: usize,
}

impl ProviderSet {
	fn push(&mut self, provider: Arc<dyn DataProvider>, priority: u32) {
		self.records.push(ProviderRecord {
			provider,
			priority,
			order: self.next_order,
		});
		self.next_order += 1;
	}

	/// Snapshot of the providers in try-order: ascending priority, ties broken
	/// by registration order.
	fn ordered(&self) -> Vec<Arc<dyn DataProvider>> {
		let mut records: Vec<_> = self
			.records
			.iter()
			.map(|r| (r.priority, r.order, r.provider.clone()))
			.collect();
		records.sort_by_key(|(priority, order, _)| (*priority, *order));
		records.into_iter().map(|(_, _, p)| p).collect()
	}
}

/// Ordered set of data-source backends for one chain.
///
/// The pool is shared per chain adapter and tolerates concurrent queries from
/// multiple transfers; queries take a read lock, registration a write lock.
pub struct ProviderPool {
	providers: RwLock<ProviderSet>,
}

impl ProviderPool {
	/// Creates a new empty pool.
	pub fn new() -> Self {
		Self {
			providers: RwLock::new(ProviderSet::default()),
		}
	}

	/// Builds a pool with one HTTP indexer backend per configured endpoint,
	/// priorities taken from the endpoint records.
	pub fn from_network(network: &Network) -> Result<Self, anyhow::Error> {
		let mut providers = ProviderSet::default();
		for endpoint in network.endpoints.iter().filter(|e| e.type_ == "indexer") {
			let provider = HttpIndexerProvider::new(&endpoint.url)?;
			providers.push(Arc::new(provider), endpoint.priority);
		}
		Ok(Self {
			providers: RwLock::new(providers),
		})
	}

	/// Registers a backend with an explicit priority (lower is tried first).
	pub async fn add_provider(&self, provider: Arc<dyn DataProvider>, priority: u32) {
		self.providers.write().await.push(provider, priority);
	}

	/// Registers a backend at the lowest priority (tried last).
	pub fn with_provider(mut self, provider: Arc<dyn DataProvider>) -> Self {
		self.providers.get_mut().push(provider, u32::MAX);
		self
	}

	/// Registers a backend with an explicit priority, builder-style.
	pub fn with_provider_at(mut self, provider: Arc<dyn DataProvider>, priority: u32) -> Self {
		self.providers.get_mut().push(provider, priority);
		self
	}

	pub async fn provider_count(&self) -> usize {
		self.providers.read().await.records.len()
	}

	/// Issues `op` to each backend in try-order until one succeeds.
	///
	/// A `NotFound` answer is authoritative and ends the fan-out immediately;
	/// any other failure falls through to the next backend. If every backend
	/// fails the aggregate call fails with `ProviderError::Exhausted` carrying
	/// the per-provider failures.
	async fn try_each<T, F>(&self, operation: &str, op: F) -> Result<T, ProviderError>
	where
		F: Fn(Arc<dyn DataProvider>) -> BoxFuture<'static, Result<T, ProviderError>>,
	{
		let providers = self.providers.read().await.ordered();

		let mut failures = Vec::new();
		for provider in providers {
			let name = provider.name();
			match op(provider).await {
				Ok(value) => return Ok(value),
				Err(e @ ProviderError::NotFound(_)) => return Err(e),
				Err(e) => {
					warn!(
						"Provider {} failed during {}: {}; trying next provider",
						name, operation, e
					);
					failures.push(ProviderFailure {
						provider: name,
						error: e.to_string(),
					});
				}
			}
		}

		Err(ProviderError::Exhausted(failures))
	}

	/// Indexed lookup of transactions involving an address.
	pub async fn fetch_txs(&self, address: &str) -> Result<Vec<AddressTx>, ProviderError> {
		let address = address.to_string();
		self.try_each("fetch_txs", move |provider| {
			let address = address.clone();
			Box::pin(async move { provider.fetch_txs(&address).await })
		})
		.await
	}

	/// Unspent outputs currently held by an address.
	pub async fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, ProviderError> {
		let address = address.to_string();
		self.try_each("fetch_utxos", move |provider| {
			let address = address.clone();
			Box::pin(async move { provider.fetch_utxos(&address).await })
		})
		.await
	}

	/// A single output by `(txid, index)`.
	pub async fn fetch_utxo(&self, txid: &[u8], index: u32) -> Result<Utxo, ProviderError> {
		let txid = txid.to_vec();
		self.try_each("fetch_utxo", move |provider| {
			let txid = txid.clone();
			Box::pin(async move { provider.fetch_utxo(&txid, index).await })
		})
		.await
	}

	/// Current best block height.
	pub async fn fetch_height(&self) -> Result<u64, ProviderError> {
		self.try_each("fetch_height", |provider| {
			Box::pin(async move { provider.fetch_height().await })
		})
		.await
	}
}

impl Default for ProviderPool {
	fn default() -> Self {
		Self::new()
	}
}
