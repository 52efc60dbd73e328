//! HTTP indexer backend.
//!
//! A REST block-index client (Esplora-style paths) implementing the provider
//! query contract, with:
//! - Connection pooling and reuse
//! - Configurable retry policy for transient failures
//! - Request timeouts suitable for third-party indexers
//!
//! The client is thread-safe and can be shared across multiple tasks.

use std::{str::FromStr, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use bitcoin::address::{Address, NetworkUnchecked};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, Jitter, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{
	models::{AddressTx, TxOutput, Utxo},
	services::provider::{DataProvider, ProviderError},
};

/// Converts a native-byte-order transaction id to the display-order hex used
/// by indexer URLs.
fn txid_to_hex(txid: &[u8]) -> String {
	let mut bytes = txid.to_vec();
	bytes.reverse();
	hex::encode(bytes)
}

/// Parses display-order hex into native byte order.
fn txid_from_hex(txid: &str) -> Result<Vec<u8>, ProviderError> {
	let mut bytes = hex::decode(txid)
		.map_err(|e| ProviderError::ResponseParse(format!("invalid txid {}: {}", txid, e)))?;
	bytes.reverse();
	Ok(bytes)
}

#[derive(Debug, Deserialize)]
struct TxStatus {
	confirmed: bool,
	block_height: Option<u64>,
}

impl TxStatus {
	fn height(&self) -> Option<u64> {
		if self.confirmed {
			self.block_height
		} else {
			None
		}
	}
}

#[derive(Debug, Deserialize)]
struct AddressUtxo {
	txid: String,
	vout: u32,
	value: u64,
	status: TxStatus,
}

#[derive(Debug, Deserialize)]
struct TxVout {
	scriptpubkey: String,
	scriptpubkey_address: Option<String>,
	value: u64,
}

#[derive(Debug, Deserialize)]
struct IndexedTx {
	txid: String,
	status: TxStatus,
	vout: Vec<TxVout>,
}

/// REST indexer client for the reference UTXO chain family.
#[derive(Clone, Debug)]
pub struct HttpIndexerProvider {
	client: ClientWithMiddleware,
	base_url: String,
	label: String,
}

impl HttpIndexerProvider {
	/// Creates a new indexer client for one base URL.
	///
	/// Configures default timeout and retry policies suitable for third-party
	/// index services; multi-backend fallback is the provider pool's concern.
	pub fn new(base_url: &str) -> Result<Self, anyhow::Error> {
		let url = Url::parse(base_url).context("Failed to parse indexer base URL")?;
		let label = format!("indexer:{}", url.host_str().unwrap_or(base_url));

		// Default retry policy for transient failures
		let retry_policy = ExponentialBackoff::builder()
			.base(2)
			.retry_bounds(Duration::from_millis(250), Duration::from_secs(10))
			.jitter(Jitter::Full)
			.build_with_max_retries(3);

		let http_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.context("Failed to create HTTP client")?;

		let client = ClientBuilder::new(http_client)
			.with(RetryTransientMiddleware::new_with_policy(retry_policy))
			.build();

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
			label,
		})
	}

	async fn get(&self, path: &str) -> Result<reqwest::Response, ProviderError> {
		let url = format!("{}{}", self.base_url, path);
		let response = self
			.client
			.get(&url)
			.send()
			.await
			.map_err(|e| ProviderError::Connection(format!("request to {} failed: {}", url, e)))?;

		let status = response.status();
		if status == reqwest::StatusCode::NOT_FOUND {
			return Err(ProviderError::NotFound(url));
		}
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(ProviderError::Request(format!(
				"{} returned status {}: {}",
				url, status, body
			)));
		}
		Ok(response)
	}

	async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
		self.get(path)
			.await?
			.json()
			.await
			.map_err(|e| ProviderError::ResponseParse(e.to_string()))
	}

	/// The scriptPubKey paying to `address`, recomputed locally since the
	/// UTXO listing endpoint does not echo it back.
	fn script_for_address(address: &str) -> Result<Vec<u8>, ProviderError> {
		let parsed = Address::<NetworkUnchecked>::from_str(address)
			.map_err(|e| ProviderError::Request(format!("invalid address {}: {}", address, e)))?;
		Ok(parsed.assume_checked().script_pubkey().to_bytes())
	}
}

#[async_trait]
impl DataProvider for HttpIndexerProvider {
	fn name(&self) -> String {
		self.label.clone()
	}

	async fn fetch_txs(&self, address: &str) -> Result<Vec<AddressTx>, ProviderError> {
		let txs: Vec<IndexedTx> = self.get_json(&format!("/address/{}/txs", address)).await?;

		txs.into_iter()
			.map(|tx| {
				Ok(AddressTx {
					txid: txid_from_hex(&tx.txid)?,
					block_height: tx.status.height(),
					outputs: tx
						.vout
						.into_iter()
						.enumerate()
						.map(|(index, vout)| {
							Ok(TxOutput {
								index: index as u32,
								amount: vout.value as u128,
								script_pubkey: hex::decode(&vout.scriptpubkey).map_err(|e| {
									ProviderError::ResponseParse(format!(
										"invalid scriptpubkey: {}",
										e
									))
								})?,
								address: vout.scriptpubkey_address,
							})
						})
						.collect::<Result<Vec<_>, ProviderError>>()?,
				})
			})
			.collect()
	}

	async fn fetch_utxos(&self, address: &str) -> Result<Vec<Utxo>, ProviderError> {
		let script_pubkey = Self::script_for_address(address)?;
		let utxos: Vec<AddressUtxo> = self.get_json(&format!("/address/{}/utxo", address)).await?;

		utxos
			.into_iter()
			.map(|utxo| {
				Ok(Utxo {
					txid: txid_from_hex(&utxo.txid)?,
					index: utxo.vout,
					amount: utxo.value as u128,
					script_pubkey: script_pubkey.clone(),
					block_height: utxo.status.height(),
				})
			})
			.collect()
	}

	async fn fetch_utxo(&self, txid: &[u8], index: u32) -> Result<Utxo, ProviderError> {
		let txid_hex = txid_to_hex(txid);
		let tx: IndexedTx = self.get_json(&format!("/tx/{}", txid_hex)).await?;

		let vout = tx.vout.get(index as usize).ok_or_else(|| {
			ProviderError::NotFound(format!("output {}:{} does not exist", txid_hex, index))
		})?;

		Ok(Utxo {
			txid: txid.to_vec(),
			index,
			amount: vout.value as u128,
			script_pubkey: hex::decode(&vout.scriptpubkey)
				.map_err(|e| ProviderError::ResponseParse(format!("invalid scriptpubkey: {}", e)))?,
			block_height: tx.status.height(),
		})
	}

	async fn fetch_height(&self) -> Result<u64, ProviderError> {
		let body = self
			.get("/blocks/tip/height")
			.await?
			.text()
			.await
			.map_err(|e| ProviderError::ResponseParse(e.to_string()))?;

		body.trim()
			.parse::<u64>()
			.map_err(|e| ProviderError::ResponseParse(format!("invalid tip height {}: {}", body, e)))
	}
}
