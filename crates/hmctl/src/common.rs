use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hmxml::{DocumentRoot, ParseOptions, Parsed, WriteOptions};
use serde::Serialize;
use tracing::{info, warn};

pub fn parse_options(strict: bool) -> ParseOptions {
    if strict {
        ParseOptions::strict()
    } else {
        ParseOptions::lenient()
    }
}

/// Load a parameter file, logging every tolerated deviation.
pub fn load_parsed(path: &Path, strict: bool) -> Result<Parsed> {
    let parsed = hmxml::load(path, &parse_options(strict))
        .with_context(|| format!("load {}", path.display()))?;
    if !parsed.diagnostics.is_empty() {
        warn!(
            file = %path.display(),
            count = parsed.diagnostics.len(),
            "document deviates from the schema"
        );
    }
    Ok(parsed)
}

pub fn load_document(path: &Path, strict: bool) -> Result<DocumentRoot> {
    Ok(load_parsed(path, strict)?.document)
}

/// Save to `output`, or back to `input` when no output was given.
///
/// Content dropped while loading leniently (`dropped` deviations) is not
/// written back, so an in-place save is refused while it is non-zero.
pub fn save_document(
    document: &DocumentRoot,
    input: &Path,
    output: Option<&PathBuf>,
    dropped: usize,
) -> Result<()> {
    let target = match output {
        Some(output) => output.as_path(),
        None if dropped == 0 => input,
        None => bail!(
            "refusing to rewrite {} in place: {dropped} schema deviation(s) would be lost; \
             use --output to write elsewhere",
            input.display()
        ),
    };
    hmxml::save(target, document, &WriteOptions::default())
        .with_context(|| format!("save {}", target.display()))?;
    info!(file = %target.display(), "saved");
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialise JSON output")?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_defaults_to_the_input_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.xml");
        std::fs::write(&input, "<HMxml><FBP><LogFile>a.xml</LogFile></FBP></HMxml>").unwrap();

        let mut document = load_document(&input, true).unwrap();
        document.set("FBP/LogFile", "b.xml").unwrap();
        save_document(&document, &input, None, 0).unwrap();
        let reloaded = load_document(&input, true).unwrap();
        assert_eq!(reloaded.get("FBP/LogFile").unwrap().as_deref(), Some("b.xml"));

        let output = dir.path().join("out.xml");
        save_document(&document, &input, Some(&output), 0).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn in_place_save_refuses_to_drop_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.xml");
        let xml = "<HMxml><FBP><Future>1</Future><LogFile>a.xml</LogFile></FBP></HMxml>";
        std::fs::write(&input, xml).unwrap();

        let parsed = load_parsed(&input, false).unwrap();
        let dropped = parsed.diagnostics.len();
        assert_eq!(dropped, 1);
        let err = save_document(&parsed.document, &input, None, dropped).unwrap_err();
        assert!(err.to_string().contains("in place"), "{err}");
        assert_eq!(std::fs::read_to_string(&input).unwrap(), xml);

        let output = dir.path().join("out.xml");
        save_document(&parsed.document, &input, Some(&output), dropped).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn strict_loading_rejects_unknown_elements() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("in.xml");
        std::fs::write(&input, "<HMxml><FBP><Extra/></FBP></HMxml>").unwrap();
        assert!(load_document(&input, true).is_err());
        assert!(load_document(&input, false).is_ok());
    }
}
