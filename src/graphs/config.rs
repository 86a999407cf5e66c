//! Registry configuration.

use serde::{Deserialize, Serialize};

use super::encode::{PlotEndpoint, encode_component};
use super::error::{GraphError, Result};

fn default_id_prefix() -> String {
	"DPAGraph".to_string()
}

/// Settings shared by every widget a registry creates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
	/// Prefix of minted widget ids, followed by the sequence number.
	#[serde(default = "default_id_prefix")]
	pub id_prefix: String,
	/// Backend the image sources point at.
	#[serde(default)]
	pub endpoint: PlotEndpoint,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			id_prefix: default_id_prefix(),
			endpoint: PlotEndpoint::default(),
		}
	}
}

impl GraphConfig {
	/// Parse a JSON configuration and validate it.
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self =
			serde_json::from_str(json).map_err(|e| GraphError::Config(e.to_string()))?;
		config.validate()?;
		Ok(config)
	}

	/// Check that ids and URLs built from this config are well formed.
	pub fn validate(&self) -> Result<()> {
		// Ids land in `id` attributes and `#id` selectors unescaped.
		if self.id_prefix.is_empty() {
			return Err(GraphError::Config("id prefix must not be empty".into()));
		}
		if let Some(c) = self
			.id_prefix
			.chars()
			.find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
		{
			return Err(GraphError::Config(format!(
				"id prefix {:?} contains {:?}",
				self.id_prefix, c
			)));
		}
		if self.endpoint.path.is_empty() {
			return Err(GraphError::Config("endpoint path must not be empty".into()));
		}
		if self.endpoint.path.contains(['?', '#', '"']) {
			return Err(GraphError::Config(format!(
				"endpoint path {:?} must not contain a query, fragment or quote",
				self.endpoint.path
			)));
		}
		let key = &self.endpoint.query_key;
		if key.is_empty() || encode_component(key) != *key {
			return Err(GraphError::Config(format!(
				"query key {:?} must be non-empty and URL-safe",
				key
			)));
		}
		Ok(())
	}
}
