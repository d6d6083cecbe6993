use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hmxml::{Diagnostic, Issue};
use serde::Serialize;
use tracing::info;

use crate::common;

#[derive(Serialize)]
struct Report<'a> {
    file: String,
    diagnostics: Vec<String>,
    issues: &'a [Issue],
}

/// Report schema deviations and semantic issues; fails when any are found.
pub fn run(file: PathBuf, strict: bool, json: bool) -> Result<()> {
    let parsed = hmxml::load(&file, &common::parse_options(strict))
        .with_context(|| format!("load {}", file.display()))?;
    let issues = parsed.document.validate();
    let problems = parsed.diagnostics.len() + issues.len();

    if json {
        common::print_json(&report(&file, &parsed.diagnostics, &issues))?;
    } else {
        for diagnostic in &parsed.diagnostics {
            println!("warning: {diagnostic}");
        }
        for issue in &issues {
            println!("error: {issue}");
        }
    }

    if problems > 0 {
        bail!("{} has {problems} problem(s)", file.display());
    }
    info!(file = %file.display(), "document is valid");
    Ok(())
}

fn report<'a>(file: &Path, diagnostics: &[Diagnostic], issues: &'a [Issue]) -> Report<'a> {
    Report {
        file: file.display().to_string(),
        diagnostics: diagnostics.iter().map(ToString::to_string).collect(),
        issues,
    }
}
