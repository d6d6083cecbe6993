use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::common;

#[derive(Serialize)]
struct ParamValue<'a> {
    path: &'a str,
    value: Option<String>,
}

pub fn run(file: PathBuf, path: String, strict: bool, json: bool) -> Result<()> {
    let document = common::load_document(&file, strict)?;
    let value = document
        .get(&path)
        .with_context(|| format!("read parameter {path}"))?;

    if json {
        common::print_json(&ParamValue { path: &path, value })?;
    } else {
        match value {
            Some(value) => println!("{value}"),
            None => bail!("{path} is not set in {}", file.display()),
        }
    }
    Ok(())
}
