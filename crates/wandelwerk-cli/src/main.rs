// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wandelwerk — file conversion from the command line.
//
// Entry point. Initialises logging, reads the input files, runs one
// conversion through the engine, writes the result. This binary is the
// transport boundary: it is the only place raw operation strings exist.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use wandelwerk_convert::convert_named;
use wandelwerk_core::options::ConversionOptions;
use wandelwerk_core::types::InputAsset;

#[derive(Parser)]
#[command(
    name = "wandelwerk",
    about = "Convert and merge images and PDFs",
    version
)]
struct Cli {
    /// Operation: merge-pdf, merge-images-vertical, merge-images-horizontal,
    /// png, jpg, jpeg, webp, svg, or pdf
    operation: String,

    /// Input files, in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Quality for lossy encoders (30-100)
    #[arg(short, long)]
    quality: Option<u8>,

    /// Raw options JSON as an upload client would send it
    /// (unknown fields are ignored)
    #[arg(long)]
    options_json: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut options = match &cli.options_json {
        Some(raw) => ConversionOptions::from_json(raw).context("invalid --options-json")?,
        None => ConversionOptions::default(),
    };
    if let Some(quality) = cli.quality {
        options.quality = quality;
    }

    let mut assets = Vec::with_capacity(cli.inputs.len());
    for path in &cli.inputs {
        let bytes = std::fs::read(path)
            .with_context(|| format!("cannot read input {}", path.display()))?;
        assets.push(match extension_of(path) {
            Some(extension) => InputAsset::with_extension(bytes, extension),
            None => InputAsset::new(bytes),
        });
    }

    let output = convert_named(&assets, &cli.operation, &options)
        .with_context(|| format!("operation {} failed", cli.operation))?;

    if output.raster_fallback {
        tracing::warn!(
            "the requested format cannot be produced natively; the output is a PNG raster fallback"
        );
    }

    std::fs::write(&cli.output, &output.bytes)
        .with_context(|| format!("cannot write output {}", cli.output.display()))?;

    tracing::info!(
        mime = output.mime,
        bytes = output.bytes.len(),
        output = %cli.output.display(),
        "done"
    );
    Ok(())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|extension| extension.to_string_lossy().to_ascii_lowercase())
}
