#![allow(clippy::print_stdout, reason = "Demo output")]
use wikidex_core::{
  ExportPlan,
  SidebarNode,
  WikiSession,
  extract_headings,
  parse_payload,
};

const SAMPLE_PAYLOAD: &str = r##"{
  "github_url": "https://github.com/acme/widget",
  "pages": {
    "Overview": "# Widget\n\nStart with the [guide](guide/setup.md).",
    "guide": {
      "setup": "# Setup\n\n## Requirements\n\n## First Steps\n",
      "advanced": {"content": "# Advanced\nBack to the [overview](../overview.md)."}
    },
    "FAQ": ["# FAQ", "Collected questions."]
  }
}"##;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  println!("wikidex-core demo");
  println!("=================\n");

  let payload = parse_payload(SAMPLE_PAYLOAD)?;

  let mut session = WikiSession::new();
  let ticket = session.begin_load();
  session.apply(ticket, &payload);

  println!("Loaded {} pages", session.index().len());
  println!("Repository: {:?}", session.repo().url);
  println!("Start page: {:?}\n", session.selected());

  println!("Sidebar:");
  let tree = SidebarNode::build(session.index());
  for leaf in tree.leaf_paths() {
    println!("  - {leaf}");
  }

  if let Some(selected) = session.selected() {
    let outline = extract_headings(session.index().page(selected)?);
    println!("\nOutline of {selected}:");
    for heading in outline {
      let indent = "  ".repeat(usize::from(heading.level));
      println!("  {indent}#{} ({})", heading.id, heading.text);
    }
  }

  println!("\nFollowing link 'guide/setup.md':");
  let target = session.follow_link("guide/setup.md");
  println!("  -> {target:?}");
  println!(
    "  now on {:?}, next page {:?}",
    session.selected(),
    session.next_page()
  );

  let plan = ExportPlan::new(session.index());
  println!("\nExport plan ({} files):", plan.len());
  for entry in plan.entries() {
    println!("  {} ({} bytes)", entry.file, entry.content.len());
  }

  Ok(())
}
