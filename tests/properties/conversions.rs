//! Unit-conversion properties at the chain's fixed precision.

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use crossgate::models::builtin_networks;
use crossgate::services::chain::utxo::UtxoAdapter;
use crossgate::services::chain::ChainAdapter;
use crossgate::services::provider::ProviderPool;

fn adapter() -> UtxoAdapter {
	UtxoAdapter::new(
		&builtin_networks()["mainnet"],
		Arc::new(ProviderPool::new()),
	)
	.unwrap()
}

proptest! {
	#[test]
	fn smallest_unit_round_trip(units in 0u64..21_000_000_0000_0000u64) {
		let adapter = adapter();
		let human = adapter.from_smallest_unit(units as u128).unwrap();
		prop_assert_eq!(adapter.to_smallest_unit(human).unwrap(), units as u128);
	}

	#[test]
	fn representable_decimals_round_trip(units in 0u64..21_000_000_0000_0000u64) {
		let adapter = adapter();
		// Build a decimal with exactly the chain's precision
		let human = Decimal::from_i128_with_scale(units as i128, 8);
		let raw = adapter.to_smallest_unit(human).unwrap();
		prop_assert_eq!(adapter.from_smallest_unit(raw).unwrap(), human);
	}

	#[test]
	fn excess_precision_never_silently_truncates(units in 1u64..1_000_000u64) {
		let adapter = adapter();
		// One decimal place beyond the chain's precision
		let too_precise = Decimal::from_i128_with_scale(units as i128 * 10 + 1, 9);
		prop_assert!(adapter.to_smallest_unit(too_precise).is_err());
	}
}
