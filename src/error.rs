//! Errors raised at the browser boundary.

use thiserror::Error;

/// Failures when touching the DOM or reading site configuration.
#[derive(Debug, Error)]
pub enum SiteError {
	#[error("browser window is not available")]
	NoWindow,
	#[error("document is not available")]
	NoDocument,
	#[error("canvas 2d context is unavailable")]
	ContextUnavailable,
	#[error("local storage is unavailable")]
	StorageUnavailable,
	#[error("invalid site configuration: {0}")]
	Config(#[from] serde_json::Error),
}
