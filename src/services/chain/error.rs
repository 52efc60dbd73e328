//! Chain-adapter error types and handling.
//!
//! This module provides the error taxonomy for chain-adapter operations,
//! covering construction, validation guards, and data lookups.

use tracing::error;

use crate::services::provider::ProviderError;

/// Represents possible errors that can occur during chain-adapter operations
#[derive(Debug)]
pub enum ChainError {
	/// The supplied network selector is not present in the configuration map
	UnknownNetwork(String),

	/// The supplied network configuration cannot drive this adapter
	InvalidConfig(String),

	/// An asset-taking method was called with an asset the chain does not carry
	UnsupportedAsset(String),

	/// Address failed validation before any network call was made
	InvalidAddress(String),

	/// Amount cannot be represented at the chain's fixed decimal precision
	InvalidAmount(String),

	/// Gateway-address derivation failed
	DerivationError(String),

	/// The chain-height lookup failed; distinct from "zero confirmations"
	HeightUnavailable(String),

	/// A provider query failed
	ProviderError(ProviderError),

	/// Internal errors within the chain adapter
	InternalError(String),
}

impl ChainError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::UnknownNetwork(msg) => format!("Unknown network: {}", msg),
			Self::InvalidConfig(msg) => format!("Invalid network config: {}", msg),
			Self::UnsupportedAsset(msg) => format!("Unsupported asset: {}", msg),
			Self::InvalidAddress(msg) => format!("Invalid address: {}", msg),
			Self::InvalidAmount(msg) => format!("Invalid amount: {}", msg),
			Self::DerivationError(msg) => format!("Derivation error: {}", msg),
			Self::HeightUnavailable(msg) => format!("Height unavailable: {}", msg),
			Self::ProviderError(err) => format!("Provider error: {}", err),
			Self::InternalError(msg) => format!("Internal error: {}", msg),
		}
	}

	/// Creates a new unknown network error with logging
	pub fn unknown_network(msg: impl Into<String>) -> Self {
		let error = Self::UnknownNetwork(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new invalid config error with logging
	pub fn invalid_config(msg: impl Into<String>) -> Self {
		let error = Self::InvalidConfig(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new unsupported asset error with logging
	pub fn unsupported_asset(msg: impl Into<String>) -> Self {
		let error = Self::UnsupportedAsset(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new invalid address error with logging
	pub fn invalid_address(msg: impl Into<String>) -> Self {
		let error = Self::InvalidAddress(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new invalid amount error with logging
	pub fn invalid_amount(msg: impl Into<String>) -> Self {
		let error = Self::InvalidAmount(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new derivation error with logging
	pub fn derivation_error(msg: impl Into<String>) -> Self {
		let error = Self::DerivationError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new height unavailable error with logging
	pub fn height_unavailable(msg: impl Into<String>) -> Self {
		let error = Self::HeightUnavailable(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

// Standard error trait implementations
impl std::fmt::Display for ChainError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl std::error::Error for ChainError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::ProviderError(err) => Some(err),
			_ => None,
		}
	}
}

/// Conversion from provider errors to ChainError
impl From<ProviderError> for ChainError {
	fn from(err: ProviderError) -> Self {
		let error = Self::ProviderError(err);
		error!("{}", error.format_message());
		error
	}
}
