use std::env;

use hmxml::{write_chunks, ChunkPlan, JobSettings, ParseOptions, WriteOptions};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let mut template =
        hmxml::load("crates/hm-model/fixtures/settings.xml", &ParseOptions::default())?.document;

    let out = env::temp_dir().join("hmxml_chunks");
    JobSettings {
        input_folder: Some("/dls/i12/data/sinograms".into()),
        input_prefix: Some("sino_".into()),
        output_prefix: Some("image_".into()),
        image_centre: Some("1012.25".into()),
        ..JobSettings::default()
    }
    .apply(&mut template)?;

    let chunks = ChunkPlan::new(0, 2672, 8)
        .log_dir(&out)
        .split(&template)?;
    for chunk in &chunks {
        info!(
            task = chunk.task,
            first = chunk.first,
            last = chunk.last,
            slices = chunk.slices(),
            "planned chunk"
        );
    }
    let paths = write_chunks(&out, &chunks, &WriteOptions::default())?;
    println!("Wrote {} chunk files to {}", paths.len(), out.display());
    Ok(())
}
