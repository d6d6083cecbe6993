use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use hmxml::Editor;
use serde::Serialize;
use tracing::info;

use crate::common;

#[derive(Serialize)]
struct SetResponse<'a> {
    path: &'a str,
    value: Option<String>,
    changed: usize,
}

/// Set `path` to `value`, or remove it when `value` is `None`.
pub fn run(
    file: PathBuf,
    path: String,
    value: Option<String>,
    output: Option<PathBuf>,
    strict: bool,
    json: bool,
) -> Result<()> {
    let parsed = common::load_parsed(&file, strict)?;
    let dropped = parsed.diagnostics.len();
    let mut editor = Editor::new(parsed.document);
    let changed = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&changed);
    editor.on_change(move |change| {
        counter.fetch_add(1, Ordering::Relaxed);
        info!(%change, "parameter changed");
    });

    match &value {
        Some(value) => editor
            .set(&path, value)
            .with_context(|| format!("set {path}"))?,
        None => {
            let removed = editor
                .unset(&path)
                .with_context(|| format!("unset {path}"))?;
            if !removed {
                info!(path = %path, "parameter was not set");
            }
        }
    }

    if editor.is_dirty() || output.is_some() {
        common::save_document(editor.document(), &file, output.as_ref(), dropped)?;
    }

    // Groups have no value to read back.
    let read_back = editor.get(&path).unwrap_or_default();
    if json {
        common::print_json(&SetResponse {
            path: &path,
            value: read_back,
            changed: changed.load(Ordering::Relaxed),
        })?;
    } else if let Some(value) = read_back {
        println!("{value}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<HMxml><FBP><LogFile>a.xml</LogFile>\
                       <OutputData><Bits>16</Bits></OutputData></FBP></HMxml>";

    fn write_doc(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("settings.xml");
        std::fs::write(&path, DOC).unwrap();
        path
    }

    #[test]
    fn set_writes_in_place() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = write_doc(&dir);
        run(file.clone(), "FBP/OutputData/Bits".into(), Some("32".into()), None, true, false)
            .unwrap();
        let document = common::load_document(&file, true).unwrap();
        assert_eq!(document.get("FBP/OutputData/Bits").unwrap().as_deref(), Some("32"));
    }

    #[test]
    fn unset_writes_to_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = write_doc(&dir);
        let out = dir.path().join("out.xml");
        run(file.clone(), "FBP/OutputData".into(), None, Some(out.clone()), true, false).unwrap();
        let edited = common::load_document(&out, true).unwrap();
        assert!(edited.fbp().unwrap().output_data.is_none());
        let original = common::load_document(&file, true).unwrap();
        assert!(original.fbp().unwrap().output_data.is_some());
    }

    #[test]
    fn invalid_value_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = write_doc(&dir);
        let err = run(
            file.clone(),
            "FBP/InputData/Raw/ByteOrder".into(),
            Some("Both".into()),
            None,
            false,
            false,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Both"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), DOC);
    }

    #[test]
    fn lenient_set_keeps_unknown_content_unless_redirected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("settings.xml");
        let xml = "<HMxml><FBP><Future>1</Future><LogFile>a.xml</LogFile></FBP></HMxml>";
        std::fs::write(&file, xml).unwrap();

        let err = run(file.clone(), "FBP/LogFile".into(), Some("b.xml".into()), None, false, false)
            .unwrap_err();
        assert!(format!("{err:#}").contains("--output"));
        assert_eq!(std::fs::read_to_string(&file).unwrap(), xml);

        let out = dir.path().join("out.xml");
        run(file, "FBP/LogFile".into(), Some("b.xml".into()), Some(out.clone()), false, false)
            .unwrap();
        let edited = common::load_document(&out, true).unwrap();
        assert_eq!(edited.get("FBP/LogFile").unwrap().as_deref(), Some("b.xml"));
    }
}
