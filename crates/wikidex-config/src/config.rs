use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the Wikidex wiki browser and exporter.
///
/// [`Config`] holds the options shared by every subcommand: where the wiki
/// payload lives, where exported bundles go, how many worker threads to use
/// and so on. Fields are typically loaded from a TOML or JSON config file,
/// but can also be set via `--set KEY=VALUE` overrides on the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Wiki payload to browse or export. `None` means the path must come
  /// from the command line.
  pub payload: Option<PathBuf>,

  /// Output directory for exported markdown bundles.
  pub output_dir: PathBuf,

  /// Project name used to derive the export directory name. Defaults to
  /// the repository name found in the payload, when present.
  pub project_name: Option<String>,

  /// Number of threads to use for parallel export.
  pub jobs: Option<usize>,

  /// Default filter applied by `wikidex tree` when no flag is given.
  pub filter: Option<String>,

  /// Export behavior.
  pub export: ExportConfig,
}

/// Options for the markdown bundle exporter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
  /// Overwrite files in a non-empty output directory.
  pub force: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      payload:      None,
      output_dir:   PathBuf::from("wiki-export"),
      project_name: None,
      jobs:         None,
      filter:       None,
      export:       ExportConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from a single TOML or JSON file.
  ///
  /// The format is chosen by file extension, case-insensitively.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, has no recognized
  /// extension, or fails to parse.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Could not read config file {}: {}",
        path.display(),
        e
      ))
    })?;

    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
      return Err(ConfigError::Config(format!(
        "Config file {} has no extension",
        path.display()
      )));
    };

    match ext.to_lowercase().as_str() {
      "json" => serde_json::from_str(&content).map_err(|e| {
        ConfigError::Config(format!(
          "Invalid JSON in config {}: {}",
          path.display(),
          e
        ))
      }),
      "toml" => toml::from_str(&content).map_err(|e| {
        ConfigError::Config(format!(
          "Invalid TOML in config {}: {}",
          path.display(),
          e
        ))
      }),
      _ => Err(ConfigError::Config(format!(
        "Unsupported config file format: {}",
        path.display()
      ))),
    }
  }

  /// Load configuration from explicit files and `KEY=VALUE` overrides.
  ///
  /// Files are merged left to right, so later files win. When no file is
  /// given, a config file is discovered from standard locations via
  /// [`Config::find_config_file`], falling back to defaults. Overrides are
  /// applied last and take precedence over everything.
  ///
  /// # Errors
  ///
  /// Returns an error if any file fails to load or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first).map_err(|e| {
        ConfigError::Config(format!(
          "Could not load config {}: {}",
          first.display(),
          e
        ))
      })?;

      for config_path in rest {
        let additional_config = Self::from_file(config_path).map_err(|e| {
          ConfigError::Config(format!(
            "Could not load config {}: {}",
            config_path.display(),
            e
          ))
        })?;
        merged_config.merge(additional_config);
      }

      if config_files.len() > 1 {
        log::info!("Merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!("Found config file {}", discovered_config.display());
      Self::from_file(&discovered_config).map_err(|e| {
        ConfigError::Config(format!(
          "Could not load discovered config {}: {}",
          discovered_config.display(),
          e
        ))
      })?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// Each override must be in the format `KEY=VALUE` where KEY is a
  /// configuration field name, with `.` separating nested fields. An empty
  /// VALUE clears optional fields back to unset.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust, ignore
  /// config.apply_overrides(&vec![
  ///     "export.force=true".to_string(),
  ///     "output_dir=build/wiki".to_string(),
  /// ])?;
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "payload" => {
        self.payload = optional(value).map(PathBuf::from);
      },
      "output_dir" => {
        if value.is_empty() {
          return Err(ConfigError::Config(format!(
            "Invalid value for '{key}': output directory must not be empty"
          )));
        }
        self.output_dir = PathBuf::from(value);
      },
      "project_name" => {
        self.project_name = optional(value).map(str::to_owned);
      },
      "jobs" => {
        self.jobs = match optional(value) {
          Some(raw) => {
            Some(raw.parse::<usize>().map_err(|e| {
              ConfigError::Config(format!(
                "Invalid value for '{key}': '{value}': {e}"
              ))
            })?)
          },
          None => None,
        };
      },
      "filter" => {
        self.filter = optional(value).map(str::to_owned);
      },
      "export.force" => {
        self.export.force = parse_bool(value).ok_or_else(|| {
          ConfigError::Config(format!(
            "Invalid boolean for '{key}': '{value}'"
          ))
        })?;
      },
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'"
        )));
      },
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values
  /// taking precedence.
  ///
  /// This method is used when loading multiple config files. Each successive
  /// config file is merged into the accumulated config, overriding values.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - Plain fields (paths, booleans): Other's value always replaces
  ///
  /// # Arguments
  ///
  /// * `other` - The config to merge in (takes precedence)
  pub fn merge(&mut self, other: Self) {
    if other.payload.is_some() {
      self.payload = other.payload;
    }
    if other.project_name.is_some() {
      self.project_name = other.project_name;
    }
    if other.jobs.is_some() {
      self.jobs = other.jobs;
    }
    if other.filter.is_some() {
      self.filter = other.filter;
    }

    self.output_dir = other.output_dir;
    self.export.force = other.export.force;
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let config_filenames = [
          "wikidex.toml",
          "wikidex.json",
          ".wikidex.toml",
          ".wikidex.json",
          ".config/wikidex.toml",
          ".config/wikidex.json",
        ];

        let current_dir = std::env::current_dir().ok()?;
        for filename in &config_filenames {
          let config_path = current_dir.join(filename);
          if config_path.exists() {
            return Some(config_path);
          }
        }

        if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
          let xdg_config_dir = PathBuf::from(xdg_config_home);
          for filename in &["wikidex.toml", "wikidex.json"] {
            let config_path = xdg_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        if let Ok(home) = std::env::var("HOME") {
          let home_config_dir =
            PathBuf::from(home).join(".config").join("wikidex");
          for filename in &["config.toml", "config.json"] {
            let config_path = home_config_dir.join(filename);
            if config_path.exists() {
              return Some(config_path);
            }
          }
        }

        None
      })
      .clone()
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the template cannot be retrieved or the file cannot
  /// be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Could not write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Wrote default config file {}", path.display());
    Ok(())
  }
}

/// Treat an empty override value as "unset".
fn optional(value: &str) -> Option<&str> {
  if value.is_empty() { None } else { Some(value) }
}

fn parse_bool(value: &str) -> Option<bool> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "on" | "1" => Some(true),
    "false" | "no" | "off" | "0" => Some(false),
    _ => None,
  }
}
