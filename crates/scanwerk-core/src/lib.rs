// SPDX-License-Identifier: MIT
//
// scanwerk-core — Shared types, configuration, and error definitions for the
// Scanwerk document scanning pipeline.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BinarizeParams, DetectorParams, ScanConfig};
pub use error::ScanwerkError;
pub use types::*;
