use std::fmt;

/// Error type for template operations.
///
/// Covers the errors that can come out of default-config generation,
/// which today is only a request for a format we do not ship.
#[derive(Debug)]
pub enum TemplateError {
  /// Indicates that the requested configuration format is not supported.
  /// Contains the name of the unsupported format.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML. Comments explain each field so
/// that a fresh `wikidex init` leaves the user with something readable
/// rather than a bare key dump. Embedding a wall of string in source is not
/// pretty, but it keeps the binary self-contained.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# Wikidex Configuration File

# Wiki payload to browse or export. This is the JSON document produced by
# your wiki backend. Pass "-" on the command line to read it from stdin.
# payload = "wiki.json"

# Output directory for exported markdown bundles
output_dir = "wiki-export"

# Project name used to derive the export directory name ("<name>-wiki").
# Defaults to the repository name found in the payload, when present.
# project_name = "my-project"

# Number of threads to use for parallel export (defaults to number of CPU cores)
# jobs = 4

# Default filter applied by `wikidex tree` when no --filter flag is given
# filter = "getting started"

# Export behavior
[export]
# Overwrite files in a non-empty output directory
force = false
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "payload": "wiki.json",
  "output_dir": "wiki-export",
  "project_name": "my-project",
  "jobs": 4,
  "filter": "",
  "export": {
    "force": false
  }
}
"#;

/// Get the default config template for the requested format.
///
/// # Errors
///
/// Returns [`TemplateError::UnsupportedFormat`] for anything other than
/// `toml` or `json` (case-insensitive).
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
