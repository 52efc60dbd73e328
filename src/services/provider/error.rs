//! Provider error types.

use thiserror::Error;

/// One backend's contribution to an exhausted fan-out.
#[derive(Debug, Clone)]
pub struct ProviderFailure {
	pub provider: String,
	pub error: String,
}

fn summarize(failures: &[ProviderFailure]) -> String {
	if failures.is_empty() {
		return "no providers registered".to_string();
	}
	failures
		.iter()
		.map(|f| format!("{}: {}", f.provider, f.error))
		.collect::<Vec<_>>()
		.join("; ")
}

/// Represents possible errors that can occur while querying data providers
#[derive(Debug, Error)]
pub enum ProviderError {
	/// Errors related to network connectivity issues
	#[error("Connection error: {0}")]
	Connection(String),

	/// Errors related to malformed requests or unexpected response status
	#[error("Request error: {0}")]
	Request(String),

	/// Errors related to undecodable response bodies
	#[error("Response parse error: {0}")]
	ResponseParse(String),

	/// The requested item does not exist on this backend
	#[error("Not found: {0}")]
	NotFound(String),

	/// Every registered backend failed for one query
	#[error("All providers exhausted: {}", summarize(.0))]
	Exhausted(Vec<ProviderFailure>),
}
