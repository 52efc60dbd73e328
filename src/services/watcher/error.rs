use std::{error::Error, fmt};

use tracing::error;

/// Errors that can end a watch session abnormally.
///
/// Transient provider failures are not represented here; the polling loop logs
/// them and continues, since the only correct way to stop watching is explicit
/// cancellation.
#[derive(Debug)]
pub enum WatcherError {
	NetworkError(String),
	ProcessingError(String),
}

impl WatcherError {
	fn format_message(&self) -> String {
		match self {
			Self::NetworkError(msg) => format!("Network error: {}", msg),
			Self::ProcessingError(msg) => format!("Processing error: {}", msg),
		}
	}

	pub fn network_error(msg: impl Into<String>) -> Self {
		let error = Self::NetworkError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn processing_error(msg: impl Into<String>) -> Self {
		let error = Self::ProcessingError(msg.into());
		error!("{}", error.format_message());
		error
	}
}

impl fmt::Display for WatcherError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for WatcherError {}
