use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::models::ChainKind;

/// A single data-provider backend endpoint with its fallback priority.
///
/// Lower priority values are tried first; ties are broken by registration order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderEndpoint {
	pub type_: String,
	pub url: String,
	pub priority: u32,
}

/// Immutable per-chain, per-environment configuration.
///
/// Loaded once at adapter construction and never mutated afterwards.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Network {
	pub chain_kind: ChainKind,
	pub slug: String,
	pub name: String,
	pub asset_symbol: String,
	pub decimals: u32,
	pub p2pkh_prefix: u8,
	pub p2sh_prefix: u8,
	pub is_testnet: bool,
	pub endpoints: Vec<ProviderEndpoint>,
	pub confirmation_threshold: u64,
	pub poll_interval_ms: u64,
	pub explorer_tx_url: Option<String>,
}

lazy_static! {
	static ref BUILTIN_NETWORKS: HashMap<String, Network> = {
		let mut networks = HashMap::new();
		networks.insert(
			"mainnet".to_string(),
			Network {
				chain_kind: ChainKind::Utxo,
				slug: "mainnet".to_string(),
				name: "Bitcoin".to_string(),
				asset_symbol: "BTC".to_string(),
				decimals: 8,
				p2pkh_prefix: 0x00,
				p2sh_prefix: 0x05,
				is_testnet: false,
				endpoints: vec![ProviderEndpoint {
					type_: "indexer".to_string(),
					url: "https://blockstream.info/api".to_string(),
					priority: 0,
				}],
				confirmation_threshold: 6,
				poll_interval_ms: 15_000,
				explorer_tx_url: Some("https://blockstream.info/tx/{txid}".to_string()),
			},
		);
		networks.insert(
			"testnet".to_string(),
			Network {
				chain_kind: ChainKind::Utxo,
				slug: "testnet".to_string(),
				name: "Bitcoin Testnet".to_string(),
				asset_symbol: "BTC".to_string(),
				decimals: 8,
				p2pkh_prefix: 0x6f,
				p2sh_prefix: 0xc4,
				is_testnet: true,
				endpoints: vec![ProviderEndpoint {
					type_: "indexer".to_string(),
					url: "https://blockstream.info/testnet/api".to_string(),
					priority: 0,
				}],
				confirmation_threshold: 6,
				poll_interval_ms: 15_000,
				explorer_tx_url: Some("https://blockstream.info/testnet/tx/{txid}".to_string()),
			},
		);
		networks.insert(
			"regtest".to_string(),
			Network {
				chain_kind: ChainKind::Utxo,
				slug: "regtest".to_string(),
				name: "Bitcoin Regtest".to_string(),
				asset_symbol: "BTC".to_string(),
				decimals: 8,
				p2pkh_prefix: 0x6f,
				p2sh_prefix: 0xc4,
				is_testnet: true,
				endpoints: vec![ProviderEndpoint {
					type_: "indexer".to_string(),
					url: "http://localhost:3002".to_string(),
					priority: 0,
				}],
				confirmation_threshold: 1,
				poll_interval_ms: 1_000,
				explorer_tx_url: None,
			},
		);
		networks
	};
}

/// Built-in network presets for the reference UTXO chain.
///
/// The returned map is immutable; callers clone entries and pass them
/// explicitly into adapter constructors.
pub fn builtin_networks() -> &'static HashMap<String, Network> {
	&BUILTIN_NETWORKS
}
