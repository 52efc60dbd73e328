//! Provider pool fallback and exhaustion behavior.

use std::sync::Arc;

use crossgate::services::provider::{ProviderError, ProviderPool};

use super::mocks::MockProvider;

fn named(name: &str) -> MockProvider {
	let mut provider = MockProvider::new();
	provider.expect_name().return_const(name.to_string());
	provider
}

#[tokio::test]
async fn test_query_falls_back_to_lower_priority_provider() {
	let mut primary = named("primary");
	primary
		.expect_fetch_height()
		.times(1)
		.returning(|| Err(ProviderError::Connection("unreachable".to_string())));

	let mut fallback = named("fallback");
	fallback.expect_fetch_height().times(1).returning(|| Ok(101));

	let pool = ProviderPool::new()
		.with_provider_at(Arc::new(primary), 0)
		.with_provider_at(Arc::new(fallback), 1);

	assert_eq!(pool.fetch_height().await.unwrap(), 101);
}

#[tokio::test]
async fn test_exhaustion_lists_every_provider_failure() {
	let mut primary = named("primary");
	primary
		.expect_fetch_height()
		.returning(|| Err(ProviderError::Connection("timeout".to_string())));

	let mut fallback = named("fallback");
	fallback
		.expect_fetch_height()
		.returning(|| Err(ProviderError::Request("http 500".to_string())));

	let pool = ProviderPool::new()
		.with_provider_at(Arc::new(primary), 0)
		.with_provider_at(Arc::new(fallback), 1);

	match pool.fetch_height().await {
		Err(ProviderError::Exhausted(failures)) => {
			assert_eq!(failures.len(), 2);
			assert_eq!(failures[0].provider, "primary");
			assert!(failures[0].error.contains("timeout"));
			assert_eq!(failures[1].provider, "fallback");
			assert!(failures[1].error.contains("http 500"));
		}
		other => panic!("expected Exhausted, got {:?}", other),
	}
}

#[tokio::test]
async fn test_equal_priority_ties_break_by_registration_order() {
	let mut first = named("first");
	first.expect_fetch_height().times(1).returning(|| Ok(7));

	let mut second = named("second");
	second.expect_fetch_height().never();

	let pool = ProviderPool::new()
		.with_provider_at(Arc::new(first), 3)
		.with_provider_at(Arc::new(second), 3);

	assert_eq!(pool.fetch_height().await.unwrap(), 7);
}

#[tokio::test]
async fn test_with_provider_registers_at_lowest_priority() {
	let mut implicit = named("implicit");
	implicit.expect_fetch_height().never();

	let mut explicit = named("explicit");
	explicit.expect_fetch_height().times(1).returning(|| Ok(42));

	// Registered first but without a priority, so it is tried last
	let pool = ProviderPool::new().with_provider(Arc::new(implicit));
	pool.add_provider(Arc::new(explicit), 0).await;

	assert_eq!(pool.fetch_height().await.unwrap(), 42);
	assert_eq!(pool.provider_count().await, 2);
}

#[tokio::test]
async fn test_not_found_is_authoritative_and_stops_the_fan_out() {
	let mut primary = named("primary");
	primary
		.expect_fetch_utxo()
		.times(1)
		.returning(|_, _| Err(ProviderError::NotFound("spent".to_string())));

	let mut fallback = named("fallback");
	fallback.expect_fetch_utxo().never();

	let pool = ProviderPool::new()
		.with_provider_at(Arc::new(primary), 0)
		.with_provider_at(Arc::new(fallback), 1);

	assert!(matches!(
		pool.fetch_utxo(&[0xab; 32], 0).await,
		Err(ProviderError::NotFound(_))
	));
}
