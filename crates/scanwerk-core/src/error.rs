// SPDX-License-Identifier: MIT
//
// Unified error types for Scanwerk.

use thiserror::Error;

/// Top-level error type for all Scanwerk operations.
///
/// A failed page quadrilateral detection is deliberately NOT an error: the
/// rectifier falls back to the uncropped raster, so detection failure never
/// reaches this enum. Likewise a degenerate perspective transform is absorbed
/// inside the rectifier and never surfaced.
#[derive(Debug, Error)]
pub enum ScanwerkError {
    // -- Source errors --
    #[error("source could not be opened: {0}")]
    SourceOpen(String),

    #[error("job has no pages or images to process")]
    EmptyInput,

    #[error("page {page} could not be rendered: {detail}")]
    PageRender { page: usize, detail: String },

    #[error("unsupported channel layout: {channels} channels (expected 3 or 4)")]
    UnsupportedChannelLayout { channels: u8 },

    // -- Processing errors --
    #[error("image processing failed: {0}")]
    Image(String),

    // -- Output errors --
    #[error("output assembly failed: {0}")]
    Assembly(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanwerkError>;
