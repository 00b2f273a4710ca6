use std::{fs, io, path::PathBuf};

use color_eyre::eyre::{Context, Result, bail, eyre};
use log::info;

mod cli;
mod commands;
mod payload;

use cli::{Cli, Commands};
use wikidex_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Logging comes up before command handling so config loading can log
  env_logger::Builder::new()
    .filter_level(cli.verbose.log_level_filter())
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    // Refuse to clobber an existing file unless forced
    if output.exists() && !force {
      bail!(
        "Config file {} already exists. Pass --force to overwrite.",
        output.display()
      );
    }

    if let Some(parent) = output.parent() {
      if !parent.as_os_str().is_empty() && !parent.exists() {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Could not create directory {}", parent.display())
        })?;
        info!("Created directory {}", parent.display());
      }
    }

    Config::generate_default_config(format, output).wrap_err_with(|| {
      format!("Could not generate config file {}", output.display())
    })?;

    info!(
      "Wrote a starter configuration. Edit it to customize how your wiki \
       is browsed and exported."
    );
    return Ok(());
  }

  // Create configuration from config file(s) and overrides
  let config = Config::load(&cli.config_files, &cli.config_overrides)?;

  // One global thread pool, shared by every parallel stage
  let thread_count = cli.jobs.or(config.jobs).unwrap_or_else(num_cpus::get);
  rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build_global()?;

  let stdout = io::stdout();
  let mut out = stdout.lock();

  match cli.command {
    // Handled above
    Commands::Init { .. } => Ok(()),

    Commands::Pages { payload, json } => {
      let session = payload::load_session(&payload_path(payload, &config)?)?;
      commands::pages(&session, json, &mut out)
    },

    Commands::Show { payload, page } => {
      let session = payload::load_session(&payload_path(payload, &config)?)?;
      commands::show(&session, page.as_deref(), &mut out)
    },

    Commands::Tree { payload, filter } => {
      let session = payload::load_session(&payload_path(payload, &config)?)?;
      let filter = filter.or_else(|| config.filter.clone());
      commands::tree(&session, filter.as_deref(), &mut out)
    },

    Commands::Outline { payload, page } => {
      let session = payload::load_session(&payload_path(payload, &config)?)?;
      commands::outline(&session, page.as_deref(), &mut out)
    },

    Commands::Resolve {
      payload,
      from,
      href,
    } => {
      let session = payload::load_session(&payload_path(payload, &config)?)?;
      commands::resolve(&session, from.as_deref(), &href, &mut out)
    },

    Commands::Export {
      payload,
      output_dir,
      force,
    } => {
      let session = payload::load_session(&payload_path(payload, &config)?)?;
      commands::export(
        &session,
        &config,
        output_dir.as_deref(),
        force,
        &mut out,
      )
    },
  }
}

/// Payload path from the subcommand flag, falling back to configuration.
fn payload_path(arg: Option<PathBuf>, config: &Config) -> Result<PathBuf> {
  arg.or_else(|| config.payload.clone()).ok_or_else(|| {
    eyre!(
      "No wiki payload given. Pass --payload FILE (\"-\" reads stdin) or set \
       `payload` in wikidex.toml."
    )
  })
}
