use hm_model::Fbp;
use hmxml::{load_async, save_async, ParseOptions, WriteOptions};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let parsed = load_async("crates/hm-model/fixtures/settings.xml", &ParseOptions::strict()).await?;
    info!(diagnostics = parsed.diagnostics.len(), "loaded fixture");
    let mut document = parsed.document;
    let fbp: &mut Fbp = document.fbp_mut();
    fbp.gpu_device_number = Some(1);

    let output = std::env::temp_dir().join("settings_gpu1.xml");
    save_async(&output, &document, &WriteOptions::default()).await?;
    let reloaded = load_async(&output, &ParseOptions::strict()).await?;
    assert_eq!(reloaded.document, document);
    println!("Round trip through {} preserved the model", output.display());
    Ok(())
}
