use std::path::Path;

use url::Url;

use crate::models::{ConfigLoader, Network};

use super::error::ConfigError;

impl ConfigLoader for Network {
	fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let network_dir = path.unwrap_or(Path::new("config/networks"));
		let mut pairs = Vec::new();

		if !network_dir.exists() {
			return Err(ConfigError::file_error("networks directory not found"));
		}

		for entry in std::fs::read_dir(network_dir)? {
			let entry = entry?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let name = path
				.file_stem()
				.and_then(|s| s.to_str())
				.unwrap_or("unknown")
				.to_string();

			if let Ok(network) = Self::load_from_path(&path) {
				pairs.push((name, network));
			}
		}

		Ok(T::from_iter(pairs))
	}

	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path)?;
		let config: Network = serde_json::from_reader(file)?;

		// Validate the config after loading
		if let Err(validation_error) = config.validate() {
			return Err(ConfigError::validation_error(validation_error));
		}

		Ok(config)
	}

	fn validate(&self) -> Result<(), String> {
		// Validate slug
		if !self
			.slug
			.chars()
			.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
		{
			return Err(
				"Slug must contain only lowercase letters, numbers, and underscores".to_string(),
			);
		}

		// Validate endpoint types
		let supported_types = ["indexer"];
		if !self
			.endpoints
			.iter()
			.all(|endpoint| supported_types.contains(&endpoint.type_.as_str()))
		{
			return Err(format!(
				"Endpoint type must be one of: {}",
				supported_types.join(", ")
			));
		}

		// Validate endpoint URLs
		for endpoint in &self.endpoints {
			let url = Url::parse(&endpoint.url)
				.map_err(|e| format!("Invalid endpoint URL {}: {}", endpoint.url, e))?;
			if url.scheme() != "http" && url.scheme() != "https" {
				return Err("All endpoint URLs must use http or https".to_string());
			}
		}

		// Validate asset symbol
		if self.asset_symbol.is_empty() {
			return Err("Asset symbol must not be empty".to_string());
		}

		// Validate decimal precision (bounded so amounts fit a Decimal scale)
		if self.decimals > 18 {
			return Err("Decimals must be at most 18".to_string());
		}

		// Validate confirmation threshold
		if self.confirmation_threshold == 0 {
			return Err("Confirmation threshold must be greater than 0".to_string());
		}

		// Validate poll interval
		if self.poll_interval_ms < 100 {
			return Err("Poll interval must be at least 100ms".to_string());
		}

		Ok(())
	}
}
