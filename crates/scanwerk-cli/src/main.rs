// SPDX-License-Identifier: MIT
//
// CLI front end for Scanwerk.
//
// A thin shim over the library crates: maps CLI flags to a ScanJob, submits
// it to the background worker, and prints progress events. All actual
// processing lives in scanwerk-document and scanwerk-engine.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use scanwerk_core::config::{MAX_DPI, MIN_DPI, ScanConfig};
use scanwerk_core::types::{JobInput, ScanJob};
use scanwerk_engine::{JobEvent, submit};
use tracing_subscriber::EnvFilter;

/// Convert photographed or scanned document pages into a clean,
/// black-and-white "scanned look" PDF.
#[derive(Parser, Debug)]
#[command(name = "scanwerk", version, about)]
struct Args {
    /// One PDF document, or any number of image files (processed in order).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Rasterization quality for PDF input, in DPI (100-400).
    #[arg(long, default_value_t = 200)]
    dpi: u32,

    /// Output PDF path. Defaults to "<first input stem>_scanned.pdf"
    /// next to the first input.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn job_input(inputs: Vec<PathBuf>) -> Result<JobInput> {
    let is_pdf = |p: &PathBuf| {
        p.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    };

    if inputs.iter().any(is_pdf) {
        if inputs.len() > 1 {
            bail!("PDF input must be a single file (multi-document merging is not supported)");
        }
        Ok(JobInput::Pdf(inputs.into_iter().next().expect("one input")))
    } else {
        Ok(JobInput::Images(inputs))
    }
}

fn default_output(first_input: &PathBuf) -> PathBuf {
    let stem = first_input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    first_input.with_file_name(format!("{stem}_scanned.pdf"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let dpi = args.dpi.clamp(MIN_DPI, MAX_DPI);
    if dpi != args.dpi {
        eprintln!("note: DPI {} clamped to {dpi}", args.dpi);
    }

    let first_input = args.inputs.first().context("at least one input")?.clone();
    let output_path = args.output.unwrap_or_else(|| default_output(&first_input));

    let input = job_input(args.inputs)?;
    let config = ScanConfig {
        dpi,
        ..ScanConfig::default()
    };

    let mut handle = submit(ScanJob::new(input, output_path, config));

    while let Some(event) = handle.next_event().await {
        match event {
            JobEvent::Progress(p) => {
                eprintln!("scanning page {} of {}...", p.current, p.total);
            }
            JobEvent::Completed { output_path } => {
                println!("{}", output_path.display());
                return Ok(());
            }
            JobEvent::Failed { error } => bail!("conversion failed: {error}"),
        }
    }

    bail!("worker exited without reporting a result")
}
