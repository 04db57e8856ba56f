// SPDX-License-Identifier: MIT
//
// scanwerk-engine — Page sources, job orchestration, and the background
// worker for Scanwerk.
//
// The engine obtains page rasters from external sources (PDF rasterization
// via pdfium, image file decoding via the `image` crate), runs the
// per-page pipeline from scanwerk-document over every page of a job in
// document order, and delivers progress and results over a channel so that
// front ends never share mutable state with a running job.

pub mod job;
pub mod source;
pub mod worker;

pub use job::{convert_job, run_job};
pub use source::{ImageFileSource, PageSource, PdfPageSource};
pub use worker::{JobEvent, JobHandle, submit};
