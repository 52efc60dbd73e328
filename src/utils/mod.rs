//! Utility modules for common functionality.
//!
//! - logging: Logging setup utilities
//! - retry: Bounded retry with exponential backoff

pub mod logging;
mod retry;

pub use retry::{RetryConfig, WithRetry};
