//! Chain-adapter capability model.
//!
//! Every concrete chain implements whichever capability traits apply: a chain
//! may be lock-only, release-only, or both. Each adapter also exposes its
//! capability tags so callers can check capability presence at runtime before
//! invoking an operation, instead of relying on method presence.

mod error;
pub mod utxo;

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::{prelude::ToPrimitive, Decimal};

pub use error::ChainError;

use crate::{
	models::{Asset, ChainTransaction, GatewayAddress, InputChainTransaction, Network,
		ShardPublicKey, TransferHash},
	services::watcher::WatcherError,
};

/// Capability tags a chain descriptor may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainCapability {
	/// Can validate addresses, derive gateway addresses and encode recipients
	Locking,
	/// Can observe deposits and report confirmation depth
	DepositObserving,
	/// Can submit signed release payloads
	Releasing,
}

/// Handler invoked exactly once per newly observed deposit.
pub type DepositHandler = Arc<dyn Fn(InputChainTransaction) + Send + Sync>;

/// Cooperative cancellation predicate, checked once per poll iteration.
pub type CancelPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Shared interface for all chain adapters.
///
/// The unit conversions and explorer link have default implementations driven
/// by the adapter's network configuration; chain families with unusual
/// rendering conventions override them.
pub trait ChainAdapter: Send + Sync {
	/// The immutable network configuration this adapter was constructed with
	fn network(&self) -> &Network;

	/// The capability tags this chain supports
	fn capabilities(&self) -> &[ChainCapability];

	fn supports(&self, capability: ChainCapability) -> bool {
		self.capabilities().contains(&capability)
	}

	fn asset_is_supported(&self, asset: &Asset) -> bool;

	/// Guard used by every asset-taking method; on violation the call fails
	/// with `UnsupportedAsset` and must not proceed.
	fn assert_asset_supported(&self, asset: &Asset) -> Result<(), ChainError> {
		if self.asset_is_supported(asset) {
			Ok(())
		} else {
			Err(ChainError::unsupported_asset(format!(
				"{} is not supported on {}",
				asset,
				self.network().slug
			)))
		}
	}

	/// Converts a human-unit amount to the asset's smallest unit.
	fn to_smallest_unit(&self, amount: Decimal) -> Result<u128, ChainError> {
		let decimals = self.network().decimals;
		let factor = 10u64.checked_pow(decimals).ok_or_else(|| {
			ChainError::invalid_amount(format!("unsupported precision {}", decimals))
		})?;
		let factor = Decimal::from(factor);
		let scaled = amount.checked_mul(factor).ok_or_else(|| {
			ChainError::invalid_amount(format!("{} overflows at {} decimals", amount, decimals))
		})?;
		if scaled.is_sign_negative() {
			return Err(ChainError::invalid_amount(format!(
				"{} is negative",
				amount
			)));
		}
		if !scaled.fract().is_zero() {
			return Err(ChainError::invalid_amount(format!(
				"{} has more than {} decimal places",
				amount, decimals
			)));
		}
		scaled.trunc().to_u128().ok_or_else(|| {
			ChainError::invalid_amount(format!("{} does not fit the amount range", amount))
		})
	}

	/// Converts a smallest-unit amount back to human units.
	fn from_smallest_unit(&self, amount: u128) -> Result<Decimal, ChainError> {
		let decimals = self.network().decimals;
		let value = i128::try_from(amount).map_err(|_| {
			ChainError::invalid_amount(format!("{} does not fit the amount range", amount))
		})?;
		Decimal::try_from_i128_with_scale(value, decimals)
			.map_err(|e| ChainError::invalid_amount(e.to_string()))
	}

	/// Block-explorer URL for a transaction, when the network configures one.
	fn explorer_link(&self, tx: &ChainTransaction) -> Option<String> {
		self.network()
			.explorer_tx_url
			.as_ref()
			.map(|template| template.replace("{txid}", &hex::encode(&tx.txid)))
	}
}

/// Capability set for chains that lock funds at derived gateway addresses.
pub trait LockingChain: ChainAdapter {
	/// Whether `address` is valid for exactly this network variant.
	fn validate_address(&self, address: &str) -> bool;

	/// Derives the one-time gateway address for a transfer.
	///
	/// Pure function of its inputs and the network parameters: any party can
	/// recompute the expected address from public data and verify it.
	fn derive_gateway_address(
		&self,
		shard_public_key: &ShardPublicKey,
		transfer_hash: &TransferHash,
	) -> Result<GatewayAddress, ChainError>;

	/// Encodes how a release instruction names its recipient.
	fn encode_release_payload(&self, destination: &str) -> Result<Vec<u8>, ChainError>;
}

/// Capability set for chains whose inbound deposits can be observed.
#[async_trait]
pub trait DepositObservingChain: ChainAdapter {
	/// Watches for deposits to a gateway address, dispatching each newly
	/// observed deposit to `on_deposit` exactly once per watch session.
	///
	/// Does not return until `is_cancelled` yields true; termination is
	/// cooperative, checked once per poll iteration.
	async fn watch_deposits(
		&self,
		gateway: &GatewayAddress,
		on_deposit: DepositHandler,
		is_cancelled: CancelPredicate,
	) -> Result<(), WatcherError>;

	/// Confirmation depth of a transaction: the number of blocks including and
	/// after the one containing it, or 0 when unconfirmed or unknown.
	///
	/// A failed height lookup is `HeightUnavailable`, never 0.
	async fn confirmation_depth(&self, tx: &ChainTransaction) -> Result<u64, ChainError>;
}

/// Capability set for chains that can execute a signed release.
#[async_trait]
pub trait ReleasingChain: ChainAdapter {
	/// Submits a signed release payload, returning the resulting transaction.
	async fn submit_release(&self, signed_payload: &[u8]) -> Result<ChainTransaction, ChainError>;
}

/// A transfer's source: locks funds and exposes deposit observation.
pub trait SourceChain: LockingChain + DepositObservingChain {}
impl<T: LockingChain + DepositObservingChain + ?Sized> SourceChain for T {}

/// A transfer's destination: names recipients and executes releases.
pub trait DestinationChain: LockingChain + ReleasingChain {}
impl<T: LockingChain + ReleasingChain + ?Sized> DestinationChain for T {}
