use std::io;

use thiserror::Error;

/// Top-level error type for the wikidex-core crate.
///
/// The shape-tolerant operations (coercion, flattening, tree building,
/// link resolution) never fail; errors only surface at the edges where a
/// payload has to be parsed, a page has to exist, or a bundle has to be
/// written.
#[derive(Debug, Error)]
pub enum WikiError {
  /// The payload text could not be decoded as JSON.
  #[error("Payload error: {0}")]
  Payload(#[from] serde_json::Error),

  /// Loading succeeded but nothing in the payload flattened to a page.
  #[error("Wiki payload contains no readable pages")]
  EmptyIndex,

  /// A page path that is not present in the index.
  #[error("Page not found: {0}")]
  PageNotFound(String),

  /// I/O failure while writing an export bundle.
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),
}

/// Result type for core operations.
pub type WikiResult<T> = Result<T, WikiError>;
