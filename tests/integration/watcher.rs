//! Deposit watcher dedup, backfill, and cancellation semantics.

use std::sync::{
	atomic::{AtomicU32, Ordering},
	Arc, Mutex,
};

use crossgate::models::{AddressTx, InputChainTransaction, TxOutput};
use crossgate::services::chain::{CancelPredicate, DepositHandler, DepositObservingChain,
	LockingChain};
use crossgate::services::chain::utxo::UtxoAdapter;
use crossgate::services::provider::{ProviderError, ProviderPool};

use super::mocks::{shard_public_key, transfer_hash, utxo, utxo_test_network, MockProvider};

fn recording_handler() -> (DepositHandler, Arc<Mutex<Vec<InputChainTransaction>>>) {
	let deposits = Arc::new(Mutex::new(Vec::new()));
	let sink = deposits.clone();
	let handler: DepositHandler = Arc::new(move |deposit| {
		sink.lock().unwrap().push(deposit);
	});
	(handler, deposits)
}

/// Cancels after the predicate has been checked `iterations` times.
fn cancel_after(iterations: u32) -> CancelPredicate {
	let count = Arc::new(AtomicU32::new(0));
	Arc::new(move || count.fetch_add(1, Ordering::SeqCst) + 1 > iterations)
}

fn adapter_with(provider: MockProvider) -> UtxoAdapter {
	let pool = ProviderPool::new().with_provider_at(Arc::new(provider), 0);
	UtxoAdapter::new(&utxo_test_network(), Arc::new(pool)).unwrap()
}

#[tokio::test]
async fn test_each_deposit_is_reported_exactly_once() {
	let mut provider = MockProvider::new();
	provider.expect_name().return_const("mock".to_string());
	provider
		.expect_fetch_txs()
		.returning(|_| Err(ProviderError::Request("no index".to_string())));

	// Poll results repeat entries across iterations
	let polls = Arc::new(AtomicU32::new(0));
	provider.expect_fetch_utxos().returning(move |_| {
		match polls.fetch_add(1, Ordering::SeqCst) {
			0 => Ok(vec![utxo(0xaa, 0, 50_000, Some(100))]),
			_ => Ok(vec![
				utxo(0xaa, 0, 50_000, Some(100)),
				utxo(0xaa, 1, 60_000, Some(100)),
			]),
		}
	});

	let adapter = adapter_with(provider);
	let gateway = adapter
		.derive_gateway_address(&shard_public_key(), &transfer_hash(0x22))
		.unwrap();
	let (handler, deposits) = recording_handler();

	adapter
		.watch_deposits(&gateway, handler, cancel_after(4))
		.await
		.unwrap();

	let deposits = deposits.lock().unwrap();
	assert_eq!(deposits.len(), 2);
	assert_eq!(deposits[0].tx.index, 0);
	assert_eq!(deposits[0].tx.amount, 50_000);
	assert_eq!(deposits[1].tx.index, 1);
	assert_eq!(deposits[1].tx.amount, 60_000);
}

#[tokio::test]
async fn test_backfill_deposits_are_not_reported_again_by_polling() {
	let mut provider = MockProvider::new();
	provider.expect_name().return_const("mock".to_string());

	// Derive the gateway address up front so the mock can reference it
	let gateway_address = {
		let probe = adapter_with(MockProvider::new());
		probe
			.derive_gateway_address(&shard_public_key(), &transfer_hash(0x22))
			.unwrap()
			.address
	};

	let address_for_txs = gateway_address.clone();
	provider.expect_fetch_txs().times(1).returning(move |_| {
		Ok(vec![AddressTx {
			txid: vec![0xbb; 32],
			block_height: Some(90),
			outputs: vec![
				TxOutput {
					index: 0,
					amount: 75_000,
					script_pubkey: vec![0xa9],
					address: Some(address_for_txs.clone()),
				},
				TxOutput {
					index: 1,
					amount: 5_000,
					script_pubkey: vec![0x76],
					address: Some("somewhere-else".to_string()),
				},
			],
		}])
	});
	provider
		.expect_fetch_utxos()
		.returning(|_| Ok(vec![utxo(0xbb, 0, 75_000, Some(90))]));

	let watching = adapter_with(provider);
	let gateway = watching
		.derive_gateway_address(&shard_public_key(), &transfer_hash(0x22))
		.unwrap();
	assert_eq!(gateway.address, gateway_address);

	let (handler, deposits) = recording_handler();
	watching
		.watch_deposits(&gateway, handler, cancel_after(3))
		.await
		.unwrap();

	let deposits = deposits.lock().unwrap();
	// One deposit total: backfill reported it, polling deduplicated it, and
	// the output paying a different address was ignored
	assert_eq!(deposits.len(), 1);
	assert_eq!(deposits[0].tx.txid, vec![0xbb; 32]);
	assert_eq!(deposits[0].tx.index, 0);
	assert_eq!(deposits[0].block_height, Some(90));
}

#[tokio::test]
async fn test_cancellation_stops_the_loop_before_any_poll() {
	let mut provider = MockProvider::new();
	provider.expect_name().return_const("mock".to_string());
	// Batch discovery still runs once before the loop
	provider
		.expect_fetch_txs()
		.times(1)
		.returning(|_| Ok(vec![]));
	provider.expect_fetch_utxos().never();

	let adapter = adapter_with(provider);
	let gateway = adapter
		.derive_gateway_address(&shard_public_key(), &transfer_hash(0x22))
		.unwrap();
	let (handler, deposits) = recording_handler();

	let always_cancelled: CancelPredicate = Arc::new(|| true);
	adapter
		.watch_deposits(&gateway, handler, always_cancelled)
		.await
		.unwrap();

	assert!(deposits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_transient_poll_failures_do_not_end_the_session() {
	let mut provider = MockProvider::new();
	provider.expect_name().return_const("mock".to_string());
	provider
		.expect_fetch_txs()
		.returning(|_| Err(ProviderError::Request("no index".to_string())));
	provider
		.expect_fetch_utxos()
		.returning(|_| Err(ProviderError::Connection("flaky".to_string())));

	let adapter = adapter_with(provider);
	let gateway = adapter
		.derive_gateway_address(&shard_public_key(), &transfer_hash(0x22))
		.unwrap();
	let (handler, deposits) = recording_handler();

	// The loop must survive three failing iterations and exit via cancellation
	adapter
		.watch_deposits(&gateway, handler, cancel_after(3))
		.await
		.unwrap();

	assert!(deposits.lock().unwrap().is_empty());
}
