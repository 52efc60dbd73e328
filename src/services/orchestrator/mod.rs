//! Transfer lifecycle orchestration.
//!
//! Wires a source adapter, a destination adapter and the external signing
//! service into one transfer lifecycle, surfacing every state transition to
//! the caller through a watch channel.

mod error;

use std::sync::{
	atomic::{AtomicBool, Ordering},
	Arc,
};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

pub use error::TransferError;

use crate::{
	models::{ChainTransaction, GatewayAddress, InputChainTransaction, ShardPublicKey,
		TransferHash, TransferParams},
	services::{
		chain::{CancelPredicate, ChainCapability, DestinationChain, SourceChain},
		signer::{SignatureStatus, SigningRequest, SigningService},
	},
	utils::{RetryConfig, WithRetry},
};

/// Default interval between signature-status polls
const SIGNER_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Latency bound for noticing cancellation while awaiting the first deposit
const DEPOSIT_WAIT_SLICE: Duration = Duration::from_millis(500);

/// Per-transfer lifecycle state.
///
/// `Failed` is terminal: the transfer is never retried automatically, and a
/// caller restarting it must use a fresh nonce so a fresh gateway address is
/// derived.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferState {
	AddressDerived(GatewayAddress),
	AwaitingDeposit,
	DepositConfirming { confirmations: u64, required: u64 },
	SubmittedToSigner,
	SignedAwaitingRelease,
	Released(ChainTransaction),
	Failed(String),
}

impl TransferState {
	pub fn label(&self) -> &'static str {
		match self {
			Self::AddressDerived(_) => "AddressDerived",
			Self::AwaitingDeposit => "AwaitingDeposit",
			Self::DepositConfirming { .. } => "DepositConfirming",
			Self::SubmittedToSigner => "SubmittedToSigner",
			Self::SignedAwaitingRelease => "SignedAwaitingRelease",
			Self::Released(_) => "Released",
			Self::Failed(_) => "Failed",
		}
	}
}

/// Flips the watch task's stop flag when the orchestrator leaves the
/// deposit/confirmation stage on any path.
struct StopOnDrop(Arc<AtomicBool>);

impl Drop for StopOnDrop {
	fn drop(&mut self) {
		self.0.store(true, Ordering::Relaxed);
	}
}

/// Drives one transfer from address derivation through release.
///
/// Constructing the orchestrator initiates the transfer: capability tags and
/// guards are checked, the transfer hash is computed and the gateway address
/// is derived, leaving the state machine in `AddressDerived`. `execute` then
/// drives the remaining transitions.
pub struct GatewayOrchestrator {
	source: Arc<dyn SourceChain>,
	destination: Arc<dyn DestinationChain>,
	signer: Arc<dyn SigningService>,
	shard_public_key: ShardPublicKey,
	params: TransferParams,
	transfer_hash: TransferHash,
	gateway: GatewayAddress,
	state_tx: watch::Sender<TransferState>,
	signer_poll_interval: Duration,
	confirmation_poll_interval: Duration,
	retry_config: RetryConfig,
}

impl GatewayOrchestrator {
	pub fn new(
		source: Arc<dyn SourceChain>,
		destination: Arc<dyn DestinationChain>,
		signer: Arc<dyn SigningService>,
		shard_public_key: ShardPublicKey,
		params: TransferParams,
	) -> Result<Self, TransferError> {
		for capability in [ChainCapability::Locking, ChainCapability::DepositObserving] {
			if !source.supports(capability) {
				return Err(TransferError::capability_missing(format!(
					"source chain {} does not support {:?}",
					source.network().slug,
					capability
				)));
			}
		}
		for capability in [ChainCapability::Locking, ChainCapability::Releasing] {
			if !destination.supports(capability) {
				return Err(TransferError::capability_missing(format!(
					"destination chain {} does not support {:?}",
					destination.network().slug,
					capability
				)));
			}
		}

		source.assert_asset_supported(&params.asset)?;
		destination.assert_asset_supported(&params.asset)?;

		if !destination.validate_address(&params.to_address) {
			return Err(crate::services::chain::ChainError::invalid_address(format!(
				"{} is not valid on {}",
				params.to_address,
				destination.network().slug
			))
			.into());
		}

		let transfer_hash = TransferHash::of(&params);
		let gateway = source.derive_gateway_address(&shard_public_key, &transfer_hash)?;
		let confirmation_poll_interval =
			Duration::from_millis(source.network().poll_interval_ms);
		let (state_tx, _) = watch::channel(TransferState::AddressDerived(gateway.clone()));

		info!(
			"Transfer {} initiated; gateway address {}",
			transfer_hash, gateway.address
		);

		Ok(Self {
			source,
			destination,
			signer,
			shard_public_key,
			params,
			transfer_hash,
			gateway,
			state_tx,
			signer_poll_interval: SIGNER_POLL_INTERVAL,
			confirmation_poll_interval,
			retry_config: RetryConfig::default(),
		})
	}

	pub fn with_signer_poll_interval(mut self, interval: Duration) -> Self {
		self.signer_poll_interval = interval;
		self
	}

	pub fn with_confirmation_poll_interval(mut self, interval: Duration) -> Self {
		self.confirmation_poll_interval = interval;
		self
	}

	pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
		self.retry_config = retry_config;
		self
	}

	/// The one-time gateway address the caller must fund.
	pub fn gateway_address(&self) -> &GatewayAddress {
		&self.gateway
	}

	pub fn transfer_hash(&self) -> &TransferHash {
		&self.transfer_hash
	}

	pub fn shard_public_key(&self) -> &ShardPublicKey {
		&self.shard_public_key
	}

	/// Subscribes to state transitions.
	pub fn state(&self) -> watch::Receiver<TransferState> {
		self.state_tx.subscribe()
	}

	fn transition(&self, state: TransferState) {
		info!("Transfer {} -> {}", self.transfer_hash, state.label());
		self.state_tx.send_replace(state);
	}

	fn fail(&self, err: TransferError) -> TransferError {
		self.transition(TransferState::Failed(err.to_string()));
		err
	}

	/// Drives the transfer to `Released` or `Failed`.
	///
	/// Cancellation is cooperative: the predicate is checked at every polling
	/// step, bounding latency by one polling interval. Expected asynchronous
	/// conditions ("not yet confirmed", "signature pending") never fail the
	/// transfer; only protocol violations and exhausted retries do.
	pub async fn execute(
		&self,
		is_cancelled: CancelPredicate,
	) -> Result<ChainTransaction, TransferError> {
		let deposit = self.await_confirmed_deposit(&is_cancelled).await?;

		// Package the deposit with the transfer parameters for the signer
		let recipient_payload = self
			.destination
			.encode_release_payload(&self.params.to_address)
			.map_err(|e| self.fail(e.into()))?;
		let request = SigningRequest {
			transfer_hash: self.transfer_hash,
			input: deposit,
			params: self.params.clone(),
			recipient_payload,
		};

		let retry = WithRetry::new(self.retry_config.clone());
		let handle = retry
			.attempt(|| self.signer.submit(&request))
			.await
			.map_err(|e| self.fail(e.into()))?;
		self.transition(TransferState::SubmittedToSigner);

		let payload = loop {
			if is_cancelled() {
				return Err(self.fail(TransferError::cancelled(
					"cancelled while awaiting signature",
				)));
			}
			let retry = WithRetry::new(self.retry_config.clone());
			match retry.attempt(|| self.signer.poll_status(&handle)).await {
				Ok(SignatureStatus::Pending) => {
					tokio::time::sleep(self.signer_poll_interval).await
				}
				Ok(SignatureStatus::Signed(payload)) => break payload,
				Ok(SignatureStatus::Rejected(reason)) => {
					return Err(self.fail(TransferError::signer_rejected(reason)))
				}
				Err(e) => return Err(self.fail(e.into())),
			}
		};
		self.transition(TransferState::SignedAwaitingRelease);

		let release_tx = self
			.destination
			.submit_release(&payload)
			.await
			.map_err(|e| self.fail(e.into()))?;
		self.transition(TransferState::Released(release_tx.clone()));

		Ok(release_tx)
	}

	/// Watches the gateway address until the first deposit reaches the
	/// source chain's confirmation threshold.
	async fn await_confirmed_deposit(
		&self,
		is_cancelled: &CancelPredicate,
	) -> Result<InputChainTransaction, TransferError> {
		self.transition(TransferState::AwaitingDeposit);

		let stop = Arc::new(AtomicBool::new(false));
		let _stop_guard = StopOnDrop(stop.clone());
		let watch_cancel: CancelPredicate = {
			let stop = stop.clone();
			let outer = is_cancelled.clone();
			Arc::new(move || stop.load(Ordering::Relaxed) || outer())
		};

		let (deposit_tx, mut deposit_rx) = mpsc::unbounded_channel();
		let on_deposit: crate::services::chain::DepositHandler = Arc::new(move |deposit| {
			let _ = deposit_tx.send(deposit);
		});

		let source = self.source.clone();
		let gateway = self.gateway.clone();
		tokio::spawn(async move {
			if let Err(e) = source.watch_deposits(&gateway, on_deposit, watch_cancel).await {
				warn!("Watch session for {} ended abnormally: {}", gateway.address, e);
			}
		});

		let deposit = loop {
			match tokio::time::timeout(DEPOSIT_WAIT_SLICE, deposit_rx.recv()).await {
				Ok(Some(deposit)) => break deposit,
				Ok(None) => {
					return Err(self.fail(TransferError::cancelled(
						"watch session ended before a deposit was observed",
					)))
				}
				Err(_) => {
					if is_cancelled() {
						return Err(self.fail(TransferError::cancelled(
							"cancelled while awaiting deposit",
						)));
					}
				}
			}
		};

		let required = self.source.network().confirmation_threshold;
		self.transition(TransferState::DepositConfirming {
			confirmations: 0,
			required,
		});

		loop {
			if is_cancelled() {
				return Err(self.fail(TransferError::cancelled(
					"cancelled while awaiting confirmations",
				)));
			}

			let retry = WithRetry::new(self.retry_config.clone());
			let confirmations = retry
				.attempt(|| self.source.confirmation_depth(&deposit.tx))
				.await
				.map_err(|e| self.fail(e.into()))?;

			self.transition(TransferState::DepositConfirming {
				confirmations,
				required,
			});

			if confirmations >= required {
				info!(
					"Transfer {} deposit {}:{} reached {} confirmations",
					self.transfer_hash,
					deposit.tx.txid_hex(),
					deposit.tx.index,
					confirmations
				);
				return Ok(deposit);
			}

			tokio::time::sleep(self.confirmation_poll_interval).await;
		}
	}
}
