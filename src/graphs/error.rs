//! Error types for graph registry operations.

use thiserror::Error;

/// Errors raised while creating or updating graph widgets.
#[derive(Error, Debug)]
pub enum GraphError {
	/// Parameters could not be turned into JSON.
	#[error("failed to serialize graph parameters: {0}")]
	Serialize(#[from] serde_json::Error),

	/// Registry configuration was rejected.
	#[error("invalid graph configuration: {0}")]
	Config(String),

	/// The DOM refused an operation.
	#[error("DOM operation failed: {0}")]
	Dom(String),

	/// No window or document is available.
	#[error("no document available")]
	NoDocument,
}

/// Result alias used throughout the graphs module.
pub type Result<T> = std::result::Result<T, GraphError>;
