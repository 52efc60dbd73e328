use std::{error::Error, fmt};

use tracing::error;

use crate::services::{chain::ChainError, signer::SignerError};

/// Terminal failures of a transfer.
#[derive(Debug)]
pub enum TransferError {
	/// An adapter does not carry a capability the transfer requires
	CapabilityMissing(String),

	/// A chain-adapter operation failed unrecoverably
	ChainError(ChainError),

	/// The signing service could not be reached after retries
	SignerError(SignerError),

	/// The signing service declined the transfer
	SignerRejected(String),

	/// The caller cancelled the transfer
	Cancelled(String),
}

impl TransferError {
	fn format_message(&self) -> String {
		match self {
			Self::CapabilityMissing(msg) => format!("Capability missing: {}", msg),
			Self::ChainError(err) => format!("Chain error: {}", err),
			Self::SignerError(err) => format!("Signer error: {}", err),
			Self::SignerRejected(msg) => format!("Signer rejected: {}", msg),
			Self::Cancelled(msg) => format!("Cancelled: {}", msg),
		}
	}

	pub fn capability_missing(msg: impl Into<String>) -> Self {
		let error = Self::CapabilityMissing(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn signer_rejected(msg: impl Into<String>) -> Self {
		let error = Self::SignerRejected(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn cancelled(msg: impl Into<String>) -> Self {
		let error = Self::Cancelled(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for TransferError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for TransferError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::ChainError(err) => Some(err),
			Self::SignerError(err) => Some(err),
			_ => None,
		}
	}
}

impl From<ChainError> for TransferError {
	fn from(err: ChainError) -> Self {
		Self::ChainError(err)
	}
}

impl From<SignerError> for TransferError {
	fn from(err: SignerError) -> Self {
		Self::SignerError(err)
	}
}
