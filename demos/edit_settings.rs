use std::env;
use std::path::PathBuf;

use hm_schema::names;
use hmxml::{Editor, ParseOptions, WriteOptions};
use tracing::warn;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let input = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crates/hm-model/fixtures/settings.xml"));
    let parsed = hmxml::load(&input, &ParseOptions::default())?;
    println!("Loaded {} ({} warnings)", input.display(), parsed.diagnostics.len());

    for issue in parsed.document.validate() {
        warn!(path = %issue.path, "{}", issue.message);
    }

    let mut editor = Editor::new(parsed.document);
    editor.on_change(|change| println!("  changed {change}"));
    editor.set(names::IMAGE_CENTRE, "1012.25")?;
    editor.set(names::OUTPUT_BITS, "32")?;
    editor.unset("FBP/Backprojection/Tilt")?;

    let output = env::temp_dir().join("settings_edited.xml");
    editor.save(&output, &WriteOptions::default())?;
    println!("Wrote {}", output.display());
    Ok(())
}
