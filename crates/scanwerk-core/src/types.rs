// SPDX-License-Identifier: MIT
//
// Core domain types for the Scanwerk pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ScanConfig;

/// Unique identifier for a scan job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a scan job reads its pages from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobInput {
    /// Every page of a single PDF document, rasterized at the job's DPI.
    Pdf(PathBuf),
    /// An ordered list of standalone photo/image files, one page each.
    Images(Vec<PathBuf>),
}

/// One end-to-end request: convert an ordered set of pages or images into a
/// single scanned-look PDF at `output_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanJob {
    pub id: JobId,
    pub input: JobInput,
    pub output_path: PathBuf,
    pub config: ScanConfig,
}

impl ScanJob {
    pub fn new(input: JobInput, output_path: PathBuf, config: ScanConfig) -> Self {
        Self {
            id: JobId::new(),
            input,
            output_path,
            config,
        }
    }
}

/// Per-page progress notification emitted after each page completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// 1-indexed number of the page that just finished.
    pub current: usize,
    /// Total number of pages in the job.
    pub total: usize,
}
