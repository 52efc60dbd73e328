//! External threshold-signing service contract.
//!
//! The signing/consensus network that co-signs release transactions is an
//! external collaborator: the crate submits a payload and polls for a
//! signature. Implementations live outside the core; tests use mocks.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{InputChainTransaction, TransferHash, TransferParams};

/// Opaque handle to a pending submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionHandle(pub String);

/// Current status of a submission.
///
/// The contract is "eventually yields a signature or a terminal failure".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
	Pending,
	Signed(Vec<u8>),
	Rejected(String),
}

/// Everything the signing network needs to co-sign one release.
#[derive(Debug, Clone)]
pub struct SigningRequest {
	pub transfer_hash: TransferHash,
	pub input: InputChainTransaction,
	pub params: TransferParams,
	/// Destination-chain encoding of the recipient
	pub recipient_payload: Vec<u8>,
}

/// Errors talking to the signing service
#[derive(Debug, Error)]
pub enum SignerError {
	#[error("Signer transport error: {0}")]
	Transport(String),

	#[error("Signer protocol error: {0}")]
	Protocol(String),
}

/// Submit-and-poll contract for the signing network.
#[async_trait]
pub trait SigningService: Send + Sync {
	async fn submit(&self, request: &SigningRequest) -> Result<SubmissionHandle, SignerError>;

	async fn poll_status(&self, handle: &SubmissionHandle)
		-> Result<SignatureStatus, SignerError>;
}
