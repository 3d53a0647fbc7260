//! Smoke test for the generate → export flow against the live model.
//!
//! Generates a deck for a prompt, then writes it as PPTX and PDF into a
//! scratch directory and prints the paths.
//!
//! Usage:
//!   SLIDECHAT_API_KEY=... \
//!   cargo run -p slidechat-server --example generate_smoke -- "A short deck about tides"

use std::sync::Arc;

use slidechat_core::models::slide::SlideDocument;
use slidechat_export::format::{ExportFormat, ExportMode};
use slidechat_export::pipeline::ExportPipeline;
use slidechat_genai::gemini::{GeminiClient, GeminiConfig};
use slidechat_genai::generate::SlideGenerator;
use slidechat_server::config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt().with_env_filter("info").init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "A three-slide introduction to tides".to_string());

    let key = config::api_key(|k| std::env::var(k).ok())?;
    let client = GeminiClient::new(GeminiConfig::new(key))?;
    println!("model: {}", client.model().await?);

    let generator = SlideGenerator::new(Arc::new(client))?;
    let deck = generator
        .generate_slides(&prompt, &SlideDocument::default())
        .await?;

    for (i, slide) in deck.iter().enumerate() {
        println!("{:>2}. [{}] {}", i + 1, slide.layout, slide.title);
        for line in &slide.content {
            println!("      - {line}");
        }
    }

    let out = tempfile::Builder::new().prefix("slidechat-smoke").tempdir()?.keep();
    let pipeline = ExportPipeline::new(&out);
    for format in [ExportFormat::Pptx, ExportFormat::Pdf] {
        let handle = pipeline
            .export_document(&deck, ExportMode::Download, format, |p| {
                println!("  [{:>3}%] {}", p.percent, p.message);
            })
            .await?;
        println!("{handle:?}");
    }

    Ok(())
}
