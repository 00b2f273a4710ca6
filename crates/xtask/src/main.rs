use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

#[derive(Parser)]
#[command(author, version, about)]
struct Xtask {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build distribution artifacts for the wikidex CLI
  Dist {
    /// Directory to write the generated assets into.
    #[arg(short, long, default_value = "dist")]
    output_dir: PathBuf,

    /// Generate shell completions and skip the manpage.
    #[arg(long, conflicts_with = "manpage_only")]
    completions_only: bool,

    /// Generate the manpage and skip completions.
    #[arg(long, conflicts_with = "completions_only")]
    manpage_only: bool,
  },
}

fn main() -> Result<()> {
  let xtask = Xtask::parse();

  let Commands::Dist {
    output_dir,
    completions_only,
    manpage_only,
  } = xtask.command;

  if !manpage_only {
    generate_completions(&output_dir)?;
  }
  if !completions_only {
    generate_manpage(&output_dir)?;
  }

  Ok(())
}

/// Generate completion scripts for every shell clap_complete knows.
fn generate_completions(output_dir: &std::path::Path) -> Result<()> {
  let completions_dir = output_dir.join("completions");
  fs::create_dir_all(&completions_dir).with_context(|| {
    format!("Failed to create {}", completions_dir.display())
  })?;

  let mut cmd = wikidex::cli::Cli::command();
  for &shell in Shell::value_variants() {
    let written = generate_to(shell, &mut cmd, "wikidex", &completions_dir)
      .with_context(|| format!("Failed to generate {shell} completions"))?;
    println!("wrote {}", written.display());
  }

  Ok(())
}

/// Render the top-level manpage from the CLI definition.
fn generate_manpage(output_dir: &std::path::Path) -> Result<()> {
  let man_dir = output_dir.join("man");
  fs::create_dir_all(&man_dir)
    .with_context(|| format!("Failed to create {}", man_dir.display()))?;

  let mut page = Vec::new();
  Man::new(wikidex::cli::Cli::command())
    .render(&mut page)
    .context("Failed to render manpage")?;

  let file_path = man_dir.join("wikidex.1");
  fs::write(&file_path, page)
    .with_context(|| format!("Failed to write {}", file_path.display()))?;
  println!("wrote {}", file_path.display());

  Ok(())
}
