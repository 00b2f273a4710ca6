//! Payload loading for the CLI.
//!
//! The CLI's "fetch" is a file read (or stdin). It still goes through
//! [`WikiSession`]'s load tickets so that a failed read leaves the
//! session in the same cleared state a failed network fetch would.

use std::{fs, io::Read, path::Path};

use color_eyre::eyre::{Context, Result};
use wikidex_core::{WikiSession, parse_payload};

/// Read the payload document from a file, or from stdin when the path
/// is `-`.
///
/// # Errors
///
/// Returns an error when the file (or stdin) cannot be read.
pub fn read_payload_text(path: &Path) -> Result<String> {
  if path.as_os_str() == "-" {
    let mut text = String::new();
    std::io::stdin()
      .read_to_string(&mut text)
      .wrap_err("Failed to read payload from stdin")?;
    Ok(text)
  } else {
    fs::read_to_string(path).wrap_err_with(|| {
      format!("Failed to read payload file: {}", path.display())
    })
  }
}

/// Load the payload at `path` into a fresh session.
///
/// # Errors
///
/// Returns an error when the payload cannot be read or is not valid
/// JSON. The failed load is recorded on the session first, so callers
/// that keep the session around see it emptied.
pub fn load_session(path: &Path) -> Result<WikiSession> {
  let mut session = WikiSession::new();
  let ticket = session.begin_load();

  let loaded = read_payload_text(path).and_then(|text| {
    parse_payload(&text).wrap_err_with(|| {
      format!("Failed to parse wiki payload from {}", path.display())
    })
  });

  match loaded {
    Ok(payload) => {
      session.apply(ticket, &payload);
      Ok(session)
    },
    Err(e) => {
      session.fail(ticket);
      Err(e)
    },
  }
}
