use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

/// Command line interface for wikidex
#[derive(Parser, Debug)]
#[command(author, version, about = "Wikidex: offline wiki browser and exporter")]
pub struct Cli {
  /// Subcommand to run (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Logging verbosity (repeat -v for more, -q for less)
  #[command(flatten)]
  pub verbose: Verbosity<InfoLevel>,

  /// Configuration file(s), TOML or JSON. Repeatable; files are merged in
  /// order and later files override earlier ones
  #[arg(short = 'c', long = "config", action = clap::ArgAction::Append, global = true)]
  pub config_files: Vec<PathBuf>,

  /// Override a configuration value as KEY=VALUE (repeatable)
  #[arg(long = "set", action = clap::ArgAction::Append, global = true)]
  pub config_overrides: Vec<String>,

  /// Number of threads to use for parallel export
  #[arg(long = "jobs", global = true)]
  pub jobs: Option<usize>,
}

/// All supported subcommands for the wikidex CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new Wikidex configuration file
  Init {
    /// Where to write the new configuration file
    #[arg(short, long, default_value = "wikidex.toml")]
    output: PathBuf,

    /// Configuration format to generate.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Overwrite the file if it already exists
    #[arg(short, long)]
    force: bool,
  },

  /// List every page in the wiki, in reading order
  Pages {
    /// Path to the wiki payload ("-" reads from stdin)
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Emit machine-readable JSON instead of a plain listing
    #[arg(long)]
    json: bool,
  },

  /// Print a page's markdown
  Show {
    /// Path to the wiki payload ("-" reads from stdin)
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Page path to print (defaults to the wiki's start page)
    page: Option<String>,
  },

  /// Render the page hierarchy as a tree
  Tree {
    /// Path to the wiki payload ("-" reads from stdin)
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Keep only entries whose name contains this term
    #[arg(short, long)]
    filter: Option<String>,
  },

  /// Print the heading outline of a page
  Outline {
    /// Path to the wiki payload ("-" reads from stdin)
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Page path to outline (defaults to the wiki's start page)
    page: Option<String>,
  },

  /// Resolve a markdown link the way the browser would
  Resolve {
    /// Path to the wiki payload ("-" reads from stdin)
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Page the link appears on (defaults to the wiki root)
    #[arg(long)]
    from: Option<String>,

    /// Link target exactly as written in the markdown
    href: String,
  },

  /// Export the whole wiki as a markdown bundle
  Export {
    /// Path to the wiki payload ("-" reads from stdin)
    #[arg(short, long)]
    payload: Option<PathBuf>,

    /// Output directory for the bundle
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Whether to overwrite files in a non-empty output directory.
    #[arg(long)]
    force: bool,
  },
}

impl Cli {
  /// Parse the process arguments into a [`Cli`].
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
