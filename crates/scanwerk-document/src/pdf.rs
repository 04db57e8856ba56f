// SPDX-License-Identifier: MIT
//
// Output assembler — builds one multi-page PDF from the processed page
// rasters using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use image::{DynamicImage, GrayImage};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, info, instrument};

const MM_PER_INCH: f32 = 25.4;

/// Assembles processed pages into a single multi-page PDF.
///
/// Each PDF page is sized to its raster at the assembler's DPI and the
/// raster is placed full-bleed, so the output pages mirror the rectified
/// page geometry rather than being forced onto a fixed paper size.
pub struct PdfAssembler {
    /// Resolution the rasters were produced at, in dots per inch.
    dpi: u32,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfAssembler {
    /// Create a new assembler for rasters produced at the given DPI.
    pub fn new(dpi: u32) -> Self {
        Self { dpi, title: None }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Serialise the ordered page sequence into PDF bytes.
    ///
    /// The first raster becomes page 1 and the rest are appended in order.
    /// An empty sequence is an [`ScanwerkError::Assembly`] error: jobs must
    /// never produce an empty artifact.
    #[instrument(skip(self, pages), fields(page_count = pages.len(), dpi = self.dpi))]
    pub fn assemble(&self, pages: &[GrayImage]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ScanwerkError::Assembly(
                "no pages to assemble".to_string(),
            ));
        }

        let title = self.title.as_deref().unwrap_or("Scanwerk Scan");
        let mut doc = PdfDocument::new(title);
        let mut pdf_pages = Vec::with_capacity(pages.len());

        for page in pages {
            let (width, height) = page.dimensions();

            // printpdf's RGB8 path is the safe, universally supported one;
            // the binary pages are expanded from luma before embedding.
            let rgb = DynamicImage::ImageLuma8(page.clone()).to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let page_w = Mm(width as f32 / self.dpi as f32 * MM_PER_INCH);
            let page_h = Mm(height as f32 / self.dpi as f32 * MM_PER_INCH);

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(1.0),
                    scale_y: Some(1.0),
                    dpi: Some(self.dpi as f32),
                    rotate: None,
                },
            }];

            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(output_bytes = output.len(), "PDF assembled");

        Ok(output)
    }

    /// Assemble and write the PDF directly to a file.
    pub fn write_to_file(&self, pages: &[GrayImage], path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.assemble(pages)?;
        std::fs::write(path.as_ref(), &bytes)
            .map_err(|err| ScanwerkError::Assembly(format!("{}: {err}", path.as_ref().display())))?;
        info!(path = %path.as_ref().display(), "scanned PDF written");
        Ok(())
    }
}
