use thiserror::Error;

/// Error type for wikidex-config operations.
///
/// Every failure carries its full context in the message, including the
/// offending file path or override key where one exists.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Unreadable, unparsable, or invalid configuration.
  #[error("Config error: {0}")]
  Config(String),

  /// Default-config template generation failed.
  #[error("Template generation error: {0}")]
  Template(String),
}
