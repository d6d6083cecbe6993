use std::path::PathBuf;

use anyhow::{Context, Result};
use hmxml::{write_chunks, ChunkPlan, JobSettings, WriteOptions};
use serde::Serialize;
use tracing::info;

use crate::common;

/// Arguments of the `split` command.
#[derive(Debug, Clone)]
pub struct SplitArgs {
    pub file: PathBuf,
    pub first: i32,
    pub last: i32,
    pub chunks: u32,
    pub step: i32,
    pub out: PathBuf,
    pub log_dir: Option<PathBuf>,
    pub job: JobSettings,
}

#[derive(Serialize)]
struct ChunkEntry {
    task: u32,
    first: i32,
    last: i32,
    file: String,
}

pub fn run(args: SplitArgs, strict: bool, json: bool) -> Result<()> {
    let mut template = common::load_document(&args.file, strict)?;
    args.job
        .apply(&mut template)
        .context("apply job settings")?;

    let log_dir = args.log_dir.clone().unwrap_or_else(|| args.out.clone());
    let plan = ChunkPlan::new(args.first, args.last, args.chunks)
        .step(args.step)
        .log_dir(log_dir);
    let chunks = plan.split(&template).context("split template")?;
    let paths = write_chunks(&args.out, &chunks, &WriteOptions::default())
        .with_context(|| format!("write chunks to {}", args.out.display()))?;
    info!(chunks = chunks.len(), out = %args.out.display(), "split template");

    if json {
        let entries: Vec<_> = chunks
            .iter()
            .zip(&paths)
            .map(|(chunk, path)| ChunkEntry {
                task: chunk.task,
                first: chunk.first,
                last: chunk.last,
                file: path.display().to_string(),
            })
            .collect();
        common::print_json(&entries)?;
    } else {
        for path in &paths {
            println!("{}", path.display());
        }
    }
    Ok(())
}
