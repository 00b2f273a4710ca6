//! Subcommand implementations.
//!
//! Handlers take the loaded session plus a writer instead of printing
//! directly, so integration tests can capture output without spawning
//! the binary.

use std::{
  fs,
  io::Write,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail, eyre};
use serde_json::json;
use wikidex_config::Config;
use wikidex_core::{
  ExportPlan,
  LinkTarget,
  SidebarNode,
  WikiSession,
  bundle_file_name,
  extract_headings,
  project_name_from_url,
  resolve_href,
};

/// List every page path in traversal order, marking the start page.
///
/// # Errors
///
/// Returns an error when the wiki has no pages or the writer fails.
pub fn pages(
  session: &WikiSession,
  json_output: bool,
  out: &mut impl Write,
) -> Result<()> {
  let index = session.ensure_loaded()?;

  if json_output {
    let entries: Vec<_> = index
      .paths()
      .map(|path| {
        json!({
          "path": path,
          "file": bundle_file_name(path),
          "start": session.selected() == Some(path),
        })
      })
      .collect();
    writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
    return Ok(());
  }

  for path in index.paths() {
    let marker = if session.selected() == Some(path) {
      '*'
    } else {
      ' '
    };
    writeln!(out, "{marker} {path}")?;
  }
  Ok(())
}

/// Print a page's markdown.
///
/// The content is written as stored; only a missing final newline is
/// added for terminal hygiene.
///
/// # Errors
///
/// Returns an error when the page does not exist or the writer fails.
pub fn show(
  session: &WikiSession,
  page: Option<&str>,
  out: &mut impl Write,
) -> Result<()> {
  let index = session.ensure_loaded()?;
  let path = match page {
    Some(page) => page,
    None => default_page(session)?,
  };

  let markdown = index.page(path)?;
  write!(out, "{markdown}")?;
  if !markdown.ends_with('\n') {
    writeln!(out)?;
  }
  Ok(())
}

/// Render the sidebar hierarchy as a tree.
///
/// The root line is the repository name when the payload carries one.
/// A filter term keeps only matching pages and their containers, the
/// same way the sidebar filter box does.
///
/// # Errors
///
/// Returns an error when the wiki has no pages or the writer fails.
pub fn tree(
  session: &WikiSession,
  filter: Option<&str>,
  out: &mut impl Write,
) -> Result<()> {
  session.ensure_loaded()?;

  let mut root = SidebarNode::build(session.index());
  if let Some(term) = filter {
    root = root.filter(term);
  }

  writeln!(out, "{}", session.repo().name.as_deref().unwrap_or("wiki"))?;
  if root.leaf_paths().is_empty() {
    if let Some(term) = filter {
      writeln!(out, "(no pages match {term:?})")?;
    }
    return Ok(());
  }

  render_node(&root, "", out)?;
  Ok(())
}

fn render_node(
  node: &SidebarNode,
  prefix: &str,
  out: &mut impl Write,
) -> Result<()> {
  let Some(children) = node.children() else {
    return Ok(());
  };

  let last = children.len().saturating_sub(1);
  for (position, (name, child)) in children.iter().enumerate() {
    let (branch, extension) = if position == last {
      ("└── ", "    ")
    } else {
      ("├── ", "│   ")
    };
    writeln!(out, "{prefix}{branch}{name}")?;
    render_node(child, &format!("{prefix}{extension}"), out)?;
  }
  Ok(())
}

/// Print the heading outline of a page, one heading per line with its
/// 1-based source line and anchor id.
///
/// # Errors
///
/// Returns an error when the page does not exist or the writer fails.
pub fn outline(
  session: &WikiSession,
  page: Option<&str>,
  out: &mut impl Write,
) -> Result<()> {
  let index = session.ensure_loaded()?;
  let path = match page {
    Some(page) => page,
    None => default_page(session)?,
  };

  let headings = extract_headings(index.page(path)?);
  if headings.is_empty() {
    writeln!(out, "(no headings in {path})")?;
    return Ok(());
  }

  for heading in &headings {
    let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
    writeln!(
      out,
      "{:>4}  {indent}{} #{}",
      heading.line + 1,
      heading.text,
      heading.id
    )?;
  }
  Ok(())
}

/// Resolve an href from a page and report where it leads.
///
/// # Errors
///
/// Returns an error when the `from` page does not exist or the writer
/// fails.
pub fn resolve(
  session: &WikiSession,
  from: Option<&str>,
  href: &str,
  out: &mut impl Write,
) -> Result<()> {
  let index = session.ensure_loaded()?;
  if let Some(page) = from {
    // Catch --from typos before they silently change resolution
    index.page(page)?;
  }

  match resolve_href(index, from, href) {
    LinkTarget::External => writeln!(out, "external")?,
    LinkTarget::Page { path, anchor } => {
      match anchor {
        Some(anchor) => writeln!(out, "page {path} #{anchor}")?,
        None => writeln!(out, "page {path}")?,
      }
    },
    LinkTarget::Unresolved => writeln!(out, "unresolved")?,
  }
  Ok(())
}

/// Export the wiki as a markdown bundle.
///
/// The destination comes from [`export_destination`]. A populated
/// destination is refused unless forced by flag or configuration.
///
/// # Errors
///
/// Returns an error when the wiki has no pages, the destination is
/// populated and not forced, or writing fails.
pub fn export(
  session: &WikiSession,
  config: &Config,
  output_dir: Option<&Path>,
  force: bool,
  out: &mut impl Write,
) -> Result<()> {
  let index = session.ensure_loaded()?;

  let destination = export_destination(session, config, output_dir);
  if !force && !config.export.force && dir_is_populated(&destination)? {
    bail!(
      "Output directory is not empty: {}. Use --force to overwrite.",
      destination.display()
    );
  }

  let plan = ExportPlan::new(index);
  plan.write_to(&destination).wrap_err_with(|| {
    format!("Failed to write bundle to {}", destination.display())
  })?;

  writeln!(
    out,
    "exported {} pages to {}",
    plan.len(),
    destination.display()
  )?;
  Ok(())
}

/// Destination directory for a bundle, in order of precedence: the
/// explicit flag, `<project>-wiki` derived from the configured project
/// name or the payload's repository URL, then the configured output
/// directory.
#[must_use]
pub fn export_destination(
  session: &WikiSession,
  config: &Config,
  flag: Option<&Path>,
) -> PathBuf {
  if let Some(dir) = flag {
    return dir.to_path_buf();
  }

  let project = config.project_name.clone().or_else(|| {
    session
      .repo()
      .url
      .as_deref()
      .and_then(project_name_from_url)
  });

  match project {
    Some(name) => PathBuf::from(format!("{name}-wiki")),
    None => config.output_dir.clone(),
  }
}

fn dir_is_populated(dir: &Path) -> Result<bool> {
  if !dir.exists() {
    return Ok(false);
  }
  let mut entries = fs::read_dir(dir).wrap_err_with(|| {
    format!("Failed to read output directory: {}", dir.display())
  })?;
  Ok(entries.next().is_some())
}

fn default_page(session: &WikiSession) -> Result<&str> {
  session
    .selected()
    .ok_or_else(|| eyre!("No page given and the wiki has no start page"))
}
