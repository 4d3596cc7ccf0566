//! Command line front end for the EdgeStag filter pipeline.
//!
//! Reads an image, converts it to 8-bit grayscale, runs a filter pipeline
//! and writes the result.
//!
//! # Usage
//!
//! ```bash
//! # Sobel edges (default pipeline)
//! cargo run --release --bin edgestag -- input.png edges.png
//!
//! # Blur first, then Scharr
//! cargo run --release --bin edgestag -- input.png edges.png --filters blur,scharr
//!
//! # Pipeline from a JSON file, print stage timings
//! cargo run --release --bin edgestag -- input.png edges.png --config pipeline.json --timings
//!
//! # Per-stage timing in the log
//! RUST_LOG=debug cargo run --release --bin edgestag -- input.png edges.png
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use edgestag_rust::{FilterKind, PipelineConfig, SampleBuffer, StageConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to read (any format the `image` crate decodes)
    input: PathBuf,

    /// Where to write the filtered grayscale image
    output: PathBuf,

    /// Comma separated filters: blur, sobel, scharr
    #[arg(short, long, conflicts_with = "config")]
    filters: Option<String>,

    /// JSON pipeline description
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print per-stage timings as JSON
    #[arg(short, long)]
    timings: bool,
}

fn load_config(args: &Args) -> Result<PipelineConfig> {
    if let Some(path) = &args.config {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        return PipelineConfig::from_json(&json)
            .with_context(|| format!("failed to parse config {}", path.display()));
    }

    match &args.filters {
        Some(list) => Ok(PipelineConfig::parse_list(list)?),
        None => Ok(PipelineConfig {
            stages: vec![StageConfig::from(FilterKind::Sobel)],
        }),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(&args)?;
    let pipeline = config.build();
    info!("pipeline: {:?}", pipeline.stage_names());

    let image = image::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let gray = image.to_luma8();
    let input = SampleBuffer::from_gray_image(&gray);
    info!("input {}: {}x{}", args.input.display(), input.width(), input.height());

    let (output, timings) = pipeline.run_timed(input)?;

    output
        .to_gray_image()?
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("wrote {}", args.output.display());

    if args.timings {
        println!("{}", serde_json::to_string_pretty(&timings)?);
    }

    Ok(())
}
