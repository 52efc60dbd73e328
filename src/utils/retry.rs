//! Bounded retry for transient failures in async operations.
//!
//! Retries an async operation a fixed number of times with exponential
//! backoff between attempts, capped at a maximum delay. Used by the deposit
//! watcher and the orchestrator around provider and signer calls.

use std::time::Duration;

/// Configuration for retry behavior
#[derive(Clone, Debug)]
pub struct RetryConfig {
	/// Total number of attempts, including the first one
	pub max_attempts: u32,

	/// Delay before the second attempt; doubled after each failure
	pub initial_delay: Duration,

	/// Upper bound on the delay between attempts
	pub max_delay: Duration,
}

impl Default for RetryConfig {
	/// 3 attempts, 1 second initial delay, 8 seconds maximum delay
	fn default() -> Self {
		Self {
			max_attempts: 3,
			initial_delay: Duration::from_secs(1),
			max_delay: Duration::from_secs(8),
		}
	}
}

/// Handler for retrying operations with exponential backoff
pub struct WithRetry {
	config: RetryConfig,
}

impl WithRetry {
	pub fn new(config: RetryConfig) -> Self {
		Self { config }
	}

	pub fn with_default_config() -> Self {
		Self {
			config: RetryConfig::default(),
		}
	}

	/// Attempts an async operation with the configured retry behavior.
	///
	/// The operation is re-created for every attempt. The delay between
	/// attempts doubles each time but never exceeds the configured maximum.
	/// Returns the first success, or the last error once attempts run out.
	pub async fn attempt<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
	where
		F: Fn() -> Fut + Send + Sync,
		Fut: std::future::Future<Output = Result<T, E>> + Send,
		T: Send,
		E: std::fmt::Debug + Send,
	{
		let max_attempts = self.config.max_attempts.max(1);
		let mut delay = self.config.initial_delay;

		for attempt in 1..=max_attempts {
			match operation().await {
				Ok(value) => return Ok(value),
				Err(e) if attempt == max_attempts => return Err(e),
				Err(e) => {
					tracing::debug!(
						"Attempt {}/{} failed: {:?}; retrying in {:?}",
						attempt,
						max_attempts,
						e,
						delay
					);
					tokio::time::sleep(delay).await;
					delay = (delay * 2).min(self.config.max_delay);
				}
			}
		}
		unreachable!("retry loop returns on the final attempt")
	}
}
