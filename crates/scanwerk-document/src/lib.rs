// SPDX-License-Identifier: MIT
//
// scanwerk-document — The per-page image pipeline for Scanwerk.
//
// Turns a photographed or rasterized document page into a clean, flat,
// black-and-white rendition: paper boundary detection, perspective
// rectification, and adaptive binarization, plus assembly of the processed
// pages into a multi-page PDF.

pub mod binarize;
pub mod detect;
pub mod geometry;
pub mod page;
pub mod pdf;
pub mod rectify;

pub use binarize::binarize;
pub use detect::detect_page;
pub use page::process_page;
pub use pdf::PdfAssembler;
pub use rectify::rectify;
