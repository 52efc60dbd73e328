//! UTXO-family chain adapter.
//!
//! The reference implementation of the locking and deposit-observing
//! capability sets, backed by a shared provider pool.

use std::{collections::HashMap, str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use bitcoin::address::{Address, NetworkUnchecked};

use crate::{
	models::{Asset, ChainKind, ChainTransaction, GatewayAddress, Network, ShardPublicKey,
		TransferHash},
	services::{
		chain::{
			utxo::derivation, CancelPredicate, ChainAdapter, ChainCapability, ChainError,
			DepositHandler, DepositObservingChain, LockingChain,
		},
		provider::{ProviderError, ProviderPool},
		watcher::{DepositWatcher, WatcherError},
	},
};

const CAPABILITIES: &[ChainCapability] =
	&[ChainCapability::Locking, ChainCapability::DepositObserving];

/// Chain adapter for UTXO-family ledgers.
///
/// Locking and deposit observation only; releases on a UTXO chain go through
/// the external broadcast pipeline, not this adapter.
#[derive(Clone)]
pub struct UtxoAdapter {
	network: Network,
	pool: Arc<ProviderPool>,
}

impl UtxoAdapter {
	/// Creates an adapter from an explicit network configuration.
	///
	/// Fails with `InvalidConfig` when the configuration cannot drive a
	/// UTXO adapter (wrong chain kind, unrecognized address prefixes).
	pub fn new(network: &Network, pool: Arc<ProviderPool>) -> Result<Self, ChainError> {
		if network.chain_kind != ChainKind::Utxo {
			return Err(ChainError::invalid_config(format!(
				"{} is not a UTXO network",
				network.slug
			)));
		}
		derivation::network_params(network)?;

		Ok(Self {
			network: network.clone(),
			pool,
		})
	}

	/// Creates an adapter by selector lookup in an explicit configuration map.
	///
	/// Fails with `UnknownNetwork` when the selector is absent.
	pub fn from_selector(
		networks: &HashMap<String, Network>,
		selector: &str,
		pool: Arc<ProviderPool>,
	) -> Result<Self, ChainError> {
		let network = networks.get(selector).ok_or_else(|| {
			ChainError::unknown_network(format!("no configuration for selector {}", selector))
		})?;
		Self::new(network, pool)
	}

	fn parse_address(&self, address: &str) -> Result<Address, ChainError> {
		let params = derivation::network_params(&self.network)?;
		Address::<NetworkUnchecked>::from_str(address)
			.map_err(|e| ChainError::invalid_address(format!("{}: {}", address, e)))?
			.require_network(params)
			.map_err(|_| {
				ChainError::invalid_address(format!(
					"{} does not belong to {}",
					address, self.network.slug
				))
			})
	}
}

impl ChainAdapter for UtxoAdapter {
	fn network(&self) -> &Network {
		&self.network
	}

	fn capabilities(&self) -> &[ChainCapability] {
		CAPABILITIES
	}

	fn asset_is_supported(&self, asset: &Asset) -> bool {
		asset.symbol.eq_ignore_ascii_case(&self.network.asset_symbol)
	}

	/// UTXO explorers render transaction ids in reversed byte order.
	fn explorer_link(&self, tx: &ChainTransaction) -> Option<String> {
		self.network
			.explorer_tx_url
			.as_ref()
			.map(|template| template.replace("{txid}", &tx.txid_hex()))
	}
}

impl LockingChain for UtxoAdapter {
	fn validate_address(&self, address: &str) -> bool {
		self.parse_address(address).is_ok()
	}

	fn derive_gateway_address(
		&self,
		shard_public_key: &ShardPublicKey,
		transfer_hash: &TransferHash,
	) -> Result<GatewayAddress, ChainError> {
		derivation::gateway_address(&self.network, shard_public_key, transfer_hash)
	}

	fn encode_release_payload(&self, destination: &str) -> Result<Vec<u8>, ChainError> {
		Ok(self.parse_address(destination)?.script_pubkey().to_bytes())
	}
}

#[async_trait]
impl DepositObservingChain for UtxoAdapter {
	async fn watch_deposits(
		&self,
		gateway: &GatewayAddress,
		on_deposit: DepositHandler,
		is_cancelled: CancelPredicate,
	) -> Result<(), WatcherError> {
		let watcher = DepositWatcher::new(
			self.pool.clone(),
			Duration::from_millis(self.network.poll_interval_ms),
		);
		watcher.watch(gateway, on_deposit, is_cancelled).await
	}

	async fn confirmation_depth(&self, tx: &ChainTransaction) -> Result<u64, ChainError> {
		let utxo = match self.pool.fetch_utxo(&tx.txid, tx.index).await {
			Ok(utxo) => utxo,
			// Unknown to every backend: observed as unconfirmed, not a failure
			Err(ProviderError::NotFound(_)) => return Ok(0),
			Err(e) => return Err(e.into()),
		};

		let Some(included) = utxo.block_height else {
			return Ok(0);
		};

		let height = self
			.pool
			.fetch_height()
			.await
			.map_err(|e| ChainError::height_unavailable(e.to_string()))?;

		if height < included {
			return Ok(0);
		}
		Ok(height - included + 1)
	}
}
