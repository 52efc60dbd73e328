//! Deposit-watching polling loop.
//!
//! Discovers new inbound outputs at a gateway address, deduplicates against
//! already-seen deposits, and reports each exactly once to a caller-supplied
//! handler. The loop runs until the caller's cancellation predicate returns
//! true; transient provider failures are logged and retried on the next
//! iteration, never fatal.

mod error;

use std::{collections::HashSet, sync::Arc, time::Duration};

use tracing::{debug, info, warn};

pub use error::WatcherError;

use crate::{
	models::{ChainTransaction, GatewayAddress, InputChainTransaction},
	services::{
		chain::{CancelPredicate, DepositHandler},
		provider::{ProviderError, ProviderPool},
	},
	utils::{RetryConfig, WithRetry},
};

/// Bounded retry attempts for one poll iteration before logging and moving on
const POLL_RETRY_ATTEMPTS: u32 = 2;

#[derive(Debug)]
enum WatchState {
	Starting,
	Polling,
	Cancelled,
}

/// Polls the provider pool for deposits to one gateway address.
///
/// Each watch session owns its set of already-reported `(txid, index)` pairs;
/// the set is discarded when the session ends. Callers that need persistence
/// keep their own record via the deposit handler.
pub struct DepositWatcher {
	pool: Arc<ProviderPool>,
	poll_interval: Duration,
	retry_config: RetryConfig,
}

impl DepositWatcher {
	pub fn new(pool: Arc<ProviderPool>, poll_interval: Duration) -> Self {
		Self {
			pool,
			poll_interval,
			retry_config: RetryConfig {
				max_attempts: POLL_RETRY_ATTEMPTS,
				..RetryConfig::default()
			},
		}
	}

	pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
		self.retry_config = retry_config;
		self
	}

	/// Runs one watch session; returns only once `is_cancelled` yields true.
	pub async fn watch(
		&self,
		gateway: &GatewayAddress,
		on_deposit: DepositHandler,
		is_cancelled: CancelPredicate,
	) -> Result<(), WatcherError> {
		let mut seen: HashSet<(Vec<u8>, u32)> = HashSet::new();

		debug!(
			"Watch session for {} entering {:?}",
			gateway.address,
			WatchState::Starting
		);

		// Best-effort batch discovery through the indexed lookup; any failure
		// falls through to the polling loop.
		if let Some(err) = self.indexed_backfill(gateway, &on_deposit, &mut seen).await {
			debug!(
				"Indexed backfill unavailable for {}: {}; falling through to polling",
				gateway.address, err
			);
		}

		debug!(
			"Watch session for {} entering {:?}",
			gateway.address,
			WatchState::Polling
		);

		loop {
			if is_cancelled() {
				info!(
					"Watch session for {} {:?} after reporting {} deposits",
					gateway.address,
					WatchState::Cancelled,
					seen.len()
				);
				return Ok(());
			}

			let retry = WithRetry::new(self.retry_config.clone());
			let pool = self.pool.clone();
			let address = gateway.address.clone();
			let poll_result = retry
				.attempt(|| {
					let pool = pool.clone();
					let address = address.clone();
					async move { pool.fetch_utxos(&address).await }
				})
				.await;

			match poll_result {
				Ok(utxos) => {
					for utxo in utxos {
						let key = (utxo.txid.clone(), utxo.index);
						if !seen.insert(key) {
							continue;
						}
						let deposit = InputChainTransaction {
							tx: ChainTransaction {
								txid: utxo.txid,
								index: utxo.index,
								amount: utxo.amount,
							},
							script_pubkey: utxo.script_pubkey,
							block_height: utxo.block_height,
						};
						debug!(
							"New deposit {}:{} ({} units) at {}",
							deposit.tx.txid_hex(),
							deposit.tx.index,
							deposit.tx.amount,
							gateway.address
						);
						(on_deposit)(deposit);
					}
				}
				Err(e) => {
					warn!(
						"Deposit poll for {} failed after {} attempts: {}; continuing",
						gateway.address, self.retry_config.max_attempts, e
					);
				}
			}

			tokio::time::sleep(self.poll_interval).await;
		}
	}

	/// One-shot indexed discovery of historical deposits.
	///
	/// Returns the provider error instead of failing the session; the caller
	/// logs it and proceeds to the primary loop.
	async fn indexed_backfill(
		&self,
		gateway: &GatewayAddress,
		on_deposit: &DepositHandler,
		seen: &mut HashSet<(Vec<u8>, u32)>,
	) -> Option<ProviderError> {
		let txs = match self.pool.fetch_txs(&gateway.address).await {
			Ok(txs) => txs,
			Err(e) => return Some(e),
		};

		for tx in txs {
			for output in tx.outputs {
				if output.address.as_deref() != Some(gateway.address.as_str()) {
					continue;
				}
				if !seen.insert((tx.txid.clone(), output.index)) {
					continue;
				}
				(on_deposit)(InputChainTransaction {
					tx: ChainTransaction {
						txid: tx.txid.clone(),
						index: output.index,
						amount: output.amount,
					},
					script_pubkey: output.script_pubkey,
					block_height: tx.block_height,
				});
			}
		}
		None
	}
}
