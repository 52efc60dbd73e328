//! UTXO adapter: construction, validation, conversions, confirmation depth.

use std::sync::{
	atomic::{AtomicUsize, Ordering},
	Arc,
};

use rust_decimal::Decimal;

use crossgate::models::{builtin_networks, Asset, ChainTransaction};
use crossgate::services::chain::utxo::UtxoAdapter;
use crossgate::services::chain::{ChainAdapter, ChainError, DepositObservingChain, LockingChain};
use crossgate::services::provider::{ProviderError, ProviderPool};

use super::mocks::{account_network, utxo, utxo_test_network, MockProvider};

// Well-known syntactically valid addresses for each network variant
const MAINNET_P2PKH: &str = "1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN2";
const MAINNET_P2SH: &str = "3P14159f73E4gFr7JterCCQh9QjiTjiZrG";
const TESTNET_P2PKH: &str = "mipcBbFg9gMiCh81Kj8tqqdgoZub1ZJRfn";
const TESTNET_P2SH: &str = "2MzQwSSnBHWHqSAqtTVQ6v47XtaisrJa1Vc";

fn empty_pool() -> Arc<ProviderPool> {
	Arc::new(ProviderPool::new())
}

fn adapter_with(provider: MockProvider) -> UtxoAdapter {
	let pool = ProviderPool::new().with_provider_at(Arc::new(provider), 0);
	UtxoAdapter::new(&utxo_test_network(), Arc::new(pool)).unwrap()
}

fn named_mock() -> MockProvider {
	let mut provider = MockProvider::new();
	provider.expect_name().return_const("mock".to_string());
	provider
}

#[test]
fn test_from_selector_rejects_unknown_selector() {
	let result = UtxoAdapter::from_selector(builtin_networks(), "no_such_chain", empty_pool());
	assert!(matches!(result, Err(ChainError::UnknownNetwork(_))));
}

#[test]
fn test_construction_rejects_non_utxo_network() {
	let result = UtxoAdapter::new(&account_network(), empty_pool());
	assert!(matches!(result, Err(ChainError::InvalidConfig(_))));
}

#[test]
fn test_construction_rejects_unknown_address_prefixes() {
	let mut network = utxo_test_network();
	network.p2pkh_prefix = 0x30;
	network.p2sh_prefix = 0x32;
	let result = UtxoAdapter::new(&network, empty_pool());
	assert!(matches!(result, Err(ChainError::InvalidConfig(_))));
}

#[test]
fn test_asset_guard_rejects_foreign_asset() {
	let adapter = UtxoAdapter::new(&utxo_test_network(), empty_pool()).unwrap();
	assert!(adapter.assert_asset_supported(&Asset::new("BTC")).is_ok());
	assert!(matches!(
		adapter.assert_asset_supported(&Asset::new("ETH")),
		Err(ChainError::UnsupportedAsset(_))
	));
}

#[test]
fn test_testnet_adapter_rejects_mainnet_addresses() {
	let adapter = UtxoAdapter::new(&utxo_test_network(), empty_pool()).unwrap();
	assert!(adapter.validate_address(TESTNET_P2PKH));
	assert!(adapter.validate_address(TESTNET_P2SH));
	assert!(!adapter.validate_address(MAINNET_P2PKH));
	assert!(!adapter.validate_address(MAINNET_P2SH));
	assert!(!adapter.validate_address("not an address"));
}

#[test]
fn test_mainnet_adapter_rejects_testnet_addresses() {
	let adapter =
		UtxoAdapter::new(&builtin_networks()["mainnet"], empty_pool()).unwrap();
	assert!(adapter.validate_address(MAINNET_P2PKH));
	assert!(adapter.validate_address(MAINNET_P2SH));
	assert!(!adapter.validate_address(TESTNET_P2PKH));
	assert!(!adapter.validate_address(TESTNET_P2SH));
}

#[test]
fn test_release_payload_is_the_recipient_script() {
	let adapter = UtxoAdapter::new(&utxo_test_network(), empty_pool()).unwrap();
	let payload = adapter.encode_release_payload(TESTNET_P2PKH).unwrap();
	// P2PKH scriptPubKey: OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG
	assert_eq!(payload.len(), 25);
	assert_eq!(payload[0], 0x76);
	assert_eq!(payload[1], 0xa9);

	assert!(matches!(
		adapter.encode_release_payload(MAINNET_P2PKH),
		Err(ChainError::InvalidAddress(_))
	));
}

#[test]
fn test_unit_conversions_at_fixed_precision() {
	let adapter = UtxoAdapter::new(&utxo_test_network(), empty_pool()).unwrap();

	let amount: Decimal = "0.12345678".parse().unwrap();
	assert_eq!(adapter.to_smallest_unit(amount).unwrap(), 12_345_678);
	assert_eq!(adapter.from_smallest_unit(12_345_678).unwrap(), amount);

	// Whole units
	assert_eq!(
		adapter.to_smallest_unit("21.0".parse().unwrap()).unwrap(),
		2_100_000_000
	);

	// Too much precision for 8 decimals
	assert!(matches!(
		adapter.to_smallest_unit("0.123456789".parse().unwrap()),
		Err(ChainError::InvalidAmount(_))
	));

	// Negative amounts are unrepresentable
	assert!(matches!(
		adapter.to_smallest_unit("-1".parse().unwrap()),
		Err(ChainError::InvalidAmount(_))
	));
}

#[test]
fn test_explorer_link_uses_display_order_txid() {
	let adapter = UtxoAdapter::new(&utxo_test_network(), empty_pool()).unwrap();
	let mut txid = vec![0u8; 31];
	txid.push(0xff);
	let tx = ChainTransaction {
		txid,
		index: 0,
		amount: 0,
	};
	let link = adapter.explorer_link(&tx).unwrap();
	assert!(link.starts_with("https://blockstream.info/testnet/tx/ff"));
}

#[tokio::test]
async fn test_confirmation_depth_is_monotonic_over_height_sequence() {
	let mut provider = named_mock();
	provider
		.expect_fetch_utxo()
		.returning(|txid, index| Ok(utxo(txid[0], index, 100_000, Some(99))));

	let heights = Arc::new(AtomicUsize::new(0));
	provider.expect_fetch_height().returning(move || {
		let sequence = [100, 100, 101, 103];
		Ok(sequence[heights.fetch_add(1, Ordering::SeqCst).min(3)])
	});

	let adapter = adapter_with(provider);
	let tx = ChainTransaction {
		txid: vec![0xaa; 32],
		index: 0,
		amount: 100_000,
	};

	let mut depths = Vec::new();
	for _ in 0..4 {
		depths.push(adapter.confirmation_depth(&tx).await.unwrap());
	}
	assert_eq!(depths, vec![2, 2, 3, 5]);
}

#[tokio::test]
async fn test_unconfirmed_output_has_zero_depth_without_height_lookup() {
	let mut provider = named_mock();
	provider
		.expect_fetch_utxo()
		.returning(|txid, index| Ok(utxo(txid[0], index, 100_000, None)));
	provider.expect_fetch_height().never();

	let adapter = adapter_with(provider);
	let tx = ChainTransaction {
		txid: vec![0xaa; 32],
		index: 0,
		amount: 100_000,
	};
	assert_eq!(adapter.confirmation_depth(&tx).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_output_has_zero_depth() {
	let mut provider = named_mock();
	provider
		.expect_fetch_utxo()
		.returning(|_, _| Err(ProviderError::NotFound("unknown output".to_string())));

	let adapter = adapter_with(provider);
	let tx = ChainTransaction {
		txid: vec![0xaa; 32],
		index: 0,
		amount: 100_000,
	};
	assert_eq!(adapter.confirmation_depth(&tx).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_height_lookup_is_not_zero_confirmations() {
	let mut provider = named_mock();
	provider
		.expect_fetch_utxo()
		.returning(|txid, index| Ok(utxo(txid[0], index, 100_000, Some(99))));
	provider
		.expect_fetch_height()
		.returning(|| Err(ProviderError::Connection("down".to_string())));

	let adapter = adapter_with(provider);
	let tx = ChainTransaction {
		txid: vec![0xaa; 32],
		index: 0,
		amount: 100_000,
	};
	assert!(matches!(
		adapter.confirmation_depth(&tx).await,
		Err(ChainError::HeightUnavailable(_))
	));
}
