// SPDX-License-Identifier: MIT
//
// Job orchestration — runs the per-page pipeline over every page of a job
// in document order and assembles the output PDF.

use std::path::PathBuf;

use image::GrayImage;
use scanwerk_core::config::ScanConfig;
use scanwerk_core::error::{Result, ScanwerkError};
use scanwerk_core::types::{JobInput, Progress, ScanJob};
use scanwerk_document::{PdfAssembler, process_page};
use tracing::{info, instrument};

use crate::source::{ImageFileSource, PageSource, PdfPageSource};

/// Process every page of `source` through the scan pipeline, in order.
///
/// Emits one [`Progress`] notification after each page, with `current`
/// running from 1 to `total`. A source with zero pages fails with
/// [`ScanwerkError::EmptyInput`] before any page is touched. The result
/// sequence preserves source order: element `i` is the processed rendition
/// of page `i`.
pub fn run_job(
    source: &mut dyn PageSource,
    config: &ScanConfig,
    mut progress: impl FnMut(Progress),
) -> Result<Vec<GrayImage>> {
    let total = source.page_count();
    if total == 0 {
        return Err(ScanwerkError::EmptyInput);
    }

    let mut pages = Vec::with_capacity(total);
    for index in 0..total {
        let raster = source.page(index)?;
        pages.push(process_page(raster, config));
        progress(Progress {
            current: index + 1,
            total,
        });
    }

    Ok(pages)
}

/// Run a complete job: open its source, process all pages, assemble the
/// multi-page PDF, and write it to the job's output path.
///
/// Assembly happens strictly after every page has been processed — a job
/// that fails partway through never leaves a partial artifact behind. All
/// source handles are released when this function returns, on success and
/// on error alike.
#[instrument(skip(job, progress), fields(job_id = %job.id))]
pub fn convert_job(job: &ScanJob, progress: impl FnMut(Progress)) -> Result<PathBuf> {
    let mut source = open_source(&job.input, job.config.dpi)?;
    let pages = run_job(source.as_mut(), &job.config, progress)?;

    let assembler = PdfAssembler::new(job.config.dpi);
    assembler.write_to_file(&pages, &job.output_path)?;

    info!(
        pages = pages.len(),
        output = %job.output_path.display(),
        "job completed"
    );
    Ok(job.output_path.clone())
}

fn open_source(input: &JobInput, dpi: u32) -> Result<Box<dyn PageSource>> {
    match input {
        JobInput::Pdf(path) => Ok(Box::new(PdfPageSource::open(path, dpi)?)),
        JobInput::Images(paths) => Ok(Box::new(ImageFileSource::new(paths.clone()))),
    }
}
