use std::path::PathBuf;

use anyhow::Result;
use hmxml::{names, DocumentRoot};

use crate::common;

/// Parameters printed by the default summary, in display order.
const SUMMARY: &[(&str, &str)] = &[
    ("log file", names::LOG_FILE),
    ("gpu", names::GPU_DEVICE_NUMBER),
    ("input folder", names::INPUT_FOLDER),
    ("input prefix", names::INPUT_PREFIX),
    ("first file", names::INPUT_FILE_FIRST),
    ("last file", names::INPUT_FILE_LAST),
    ("file step", names::INPUT_FILE_STEP),
    ("flat field", names::FLAT_FIELD_FILE_BEFORE),
    ("dark field", names::DARK_FIELD_FILE_BEFORE),
    ("ring artefacts", names::RING_ARTEFACTS_TYPE),
    ("image centre", names::IMAGE_CENTRE),
    ("roi", names::ROI_TYPE),
    ("output folder", names::OUTPUT_FOLDER),
    ("output prefix", names::OUTPUT_PREFIX),
    ("output bits", names::OUTPUT_BITS),
];

pub fn run(file: PathBuf, flat: bool, strict: bool, json: bool) -> Result<()> {
    let document = common::load_document(&file, strict)?;
    if json {
        return common::print_json(&document);
    }
    let lines = if flat {
        flat_lines(&document)
    } else {
        summary_lines(&document)?
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub fn flat_lines(document: &DocumentRoot) -> Vec<String> {
    document
        .entries()
        .into_iter()
        .map(|(path, value)| format!("{path} = {value}"))
        .collect()
}

pub fn summary_lines(document: &DocumentRoot) -> Result<Vec<String>> {
    let width = SUMMARY.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    SUMMARY
        .iter()
        .map(|(label, path)| -> Result<String> {
            let value = document.get(path)?.unwrap_or_else(|| "-".to_string());
            Ok(format!("{label:<width$}  {value}"))
        })
        .collect()
}
