// SPDX-License-Identifier: MIT
//
// Page sources — where a job's rasters come from.
//
// The pipeline itself only ever sees 3-channel RGB rasters; the sources are
// responsible for getting there. PDF pages are rasterized through pdfium at
// the job's DPI with alpha discarded to opaque, photo files are decoded via
// the `image` crate with transparency composited onto white.

use std::path::PathBuf;

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use pdfium_render::prelude::*;
use scanwerk_core::error::{Result, ScanwerkError};
use tracing::{debug, info, instrument};

/// An ordered collection of page rasters feeding one scan job.
///
/// Implementations own whatever underlying handles they need (an open PDF
/// document, a list of file paths) and release them when dropped, on every
/// exit path.
pub trait PageSource: Send {
    /// Number of pages this source provides.
    fn page_count(&self) -> usize;

    /// Produce the raster for the page at `index` (0-based).
    fn page(&mut self, index: usize) -> Result<RgbImage>;
}

// -- PDF pages ----------------------------------------------------------------

/// Rasterizes the pages of a single PDF document at a fixed DPI.
pub struct PdfPageSource {
    pdfium: Pdfium,
    path: PathBuf,
    dpi: u32,
    page_count: usize,
}

impl PdfPageSource {
    /// Bind to the pdfium library and open the document.
    ///
    /// The document is opened once here to validate it and read the page
    /// count; failure to bind or to parse the file is a
    /// [`ScanwerkError::SourceOpen`].
    #[instrument(skip_all, fields(path = %path.as_ref().display(), dpi))]
    pub fn open(path: impl AsRef<std::path::Path>, dpi: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|err| ScanwerkError::SourceOpen(format!("pdfium unavailable: {err:?}")))?;
        let pdfium = Pdfium::new(bindings);

        let page_count = {
            let document = pdfium
                .load_pdf_from_file(&path, None)
                .map_err(|err| {
                    ScanwerkError::SourceOpen(format!("{}: {err:?}", path.display()))
                })?;
            document.pages().len() as usize
        };

        info!(pages = page_count, "PDF source opened");
        Ok(Self {
            pdfium,
            path,
            dpi,
            page_count,
        })
    }
}

impl PageSource for PdfPageSource {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page(&mut self, index: usize) -> Result<RgbImage> {
        let document = self
            .pdfium
            .load_pdf_from_file(&self.path, None)
            .map_err(|err| ScanwerkError::SourceOpen(format!("{}: {err:?}", self.path.display())))?;

        let pages = document.pages();
        let page = pages
            .get(index as u16)
            .map_err(|err| ScanwerkError::PageRender {
                page: index + 1,
                detail: format!("{err:?}"),
            })?;

        // Page media box is in points (72 per inch); scale to the job's DPI.
        let scale = self.dpi as f32 / 72.0;
        let width_px = (page.width().value * scale).round().max(1.0) as i32;
        let height_px = (page.height().value * scale).round().max(1.0) as i32;
        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|err| ScanwerkError::PageRender {
                page: index + 1,
                detail: format!("{err:?}"),
            })?;

        let raster = bitmap.as_image();
        debug!(
            page = index + 1,
            width = raster.width(),
            height = raster.height(),
            "PDF page rasterized"
        );
        opaque_rgb(raster)
    }
}

/// Reduce a rendered page to opaque RGB.
///
/// 3-channel rasters pass through; in 4-channel rasters the fourth channel
/// is alpha and is simply discarded (the page is already composited).
/// Anything else is an unsupported layout and is rejected rather than
/// silently misinterpreted.
fn opaque_rgb(raster: DynamicImage) -> Result<RgbImage> {
    match raster {
        DynamicImage::ImageRgb8(rgb) => Ok(rgb),
        DynamicImage::ImageRgba8(rgba) => Ok(RgbImage::from_fn(
            rgba.width(),
            rgba.height(),
            |x, y| {
                let Rgba([r, g, b, _]) = *rgba.get_pixel(x, y);
                Rgb([r, g, b])
            },
        )),
        other => Err(ScanwerkError::UnsupportedChannelLayout {
            channels: other.color().channel_count(),
        }),
    }
}

// -- Standalone image files ---------------------------------------------------

/// Decodes an ordered list of standalone photo/image files, one page each.
pub struct ImageFileSource {
    paths: Vec<PathBuf>,
}

impl ImageFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl PageSource for ImageFileSource {
    fn page_count(&self) -> usize {
        self.paths.len()
    }

    #[instrument(skip(self))]
    fn page(&mut self, index: usize) -> Result<RgbImage> {
        let path = self.paths.get(index).ok_or(ScanwerkError::PageRender {
            page: index + 1,
            detail: "image index out of range".to_string(),
        })?;

        let decoded = image::open(path)
            .map_err(|err| ScanwerkError::SourceOpen(format!("{}: {err}", path.display())))?;
        debug!(
            path = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "image decoded"
        );
        Ok(flatten_photo(decoded))
    }
}

/// Normalize a decoded photo to opaque RGB.
///
/// Transparent images are composited onto a white background (a scan of a
/// transparent sheet is white paper); every other color model is converted
/// to RGB.
fn flatten_photo(decoded: DynamicImage) -> RgbImage {
    match decoded {
        DynamicImage::ImageRgb8(rgb) => rgb,
        DynamicImage::ImageRgba8(rgba) => composite_on_white(&rgba),
        other if other.color().has_alpha() => composite_on_white(&other.to_rgba8()),
        other => other.to_rgb8(),
    }
}

fn composite_on_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = a as u16;
        let blend = |channel: u8| -> u8 {
            ((channel as u16 * alpha + 255 * (255 - alpha)) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    #[test]
    fn opaque_rgb_passes_three_channels_through() {
        let rgb = RgbImage::from_pixel(4, 4, Rgb([10, 20, 30]));
        let out = opaque_rgb(DynamicImage::ImageRgb8(rgb.clone())).expect("rgb is supported");
        assert_eq!(out.as_raw(), rgb.as_raw());
    }

    #[test]
    fn opaque_rgb_discards_alpha() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 7]));
        let out = opaque_rgb(DynamicImage::ImageRgba8(rgba)).expect("rgba is supported");
        assert!(out.pixels().all(|p| *p == Rgb([10, 20, 30])));
    }

    #[test]
    fn opaque_rgb_rejects_other_layouts() {
        let gray = GrayImage::from_pixel(4, 4, image::Luma([128]));
        let err = opaque_rgb(DynamicImage::ImageLuma8(gray)).unwrap_err();
        assert!(matches!(
            err,
            ScanwerkError::UnsupportedChannelLayout { channels: 1 }
        ));
    }

    /// Fully transparent pixels become white, opaque pixels keep their color.
    #[test]
    fn photos_composite_transparency_onto_white() {
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([40, 50, 60, 255]));
        rgba.put_pixel(1, 0, Rgba([40, 50, 60, 0]));

        let out = composite_on_white(&rgba);
        assert_eq!(*out.get_pixel(0, 0), Rgb([40, 50, 60]));
        assert_eq!(*out.get_pixel(1, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn image_source_reports_its_page_count() {
        let source = ImageFileSource::new(vec!["a.png".into(), "b.png".into()]);
        assert_eq!(source.page_count(), 2);
    }

    #[test]
    fn missing_image_file_is_a_source_error() {
        let mut source = ImageFileSource::new(vec!["/nonexistent/scan.png".into()]);
        assert!(matches!(
            source.page(0),
            Err(ScanwerkError::SourceOpen(_))
        ));
    }
}
