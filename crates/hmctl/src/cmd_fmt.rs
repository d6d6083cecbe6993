use std::path::PathBuf;

use anyhow::{Context, Result};
use hmxml::WriteOptions;
use tracing::info;

use crate::common;

/// Rewrite a document in canonical element order and indentation.
pub fn run(file: PathBuf, output: Option<PathBuf>, indent: usize, strict: bool) -> Result<()> {
    let document = common::load_document(&file, strict)?;
    let options = WriteOptions::default().indent(indent);
    match output {
        Some(output) => {
            hmxml::save(&output, &document, &options)
                .with_context(|| format!("save {}", output.display()))?;
            info!(file = %output.display(), "formatted");
        }
        None => {
            let xml = hmxml::to_string(&document, &options).context("serialise document")?;
            print!("{xml}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_into_output_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("messy.xml");
        std::fs::write(
            &input,
            "<HMxml>\n<FBP><OutputData><Bits>8</Bits></OutputData>\n\
             <LogFile>l.xml</LogFile></FBP></HMxml>",
        )
        .unwrap();
        let output = dir.path().join("tidy.xml");
        run(input, Some(output.clone()), 2, true).unwrap();
        let tidy = std::fs::read_to_string(output).unwrap();
        let log = tidy.find("<LogFile>").unwrap();
        let data = tidy.find("<OutputData>").unwrap();
        assert!(log < data);
        assert!(tidy.contains("\n    <LogFile>l.xml</LogFile>\n"));
    }
}
