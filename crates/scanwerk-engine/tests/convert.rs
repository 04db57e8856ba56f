// SPDX-License-Identifier: MIT
//
// End-to-end conversion tests: image files in, multi-page scanned PDF out.

use image::{Rgb, RgbImage};
use scanwerk_core::config::ScanConfig;
use scanwerk_core::types::{JobInput, ScanJob};
use scanwerk_engine::convert_job;

/// Synthetic "photographed page": bright rectangle on a dark background.
fn page_photo(width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([25, 25, 30]));
    let (x0, y0) = (width / 5, height / 5);
    let (x1, y1) = (width * 4 / 5, height * 4 / 5);
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, Rgb([235, 235, 230]));
        }
    }
    img
}

#[test]
fn images_job_produces_a_pdf_with_one_page_per_image() {
    let dir = tempfile::tempdir().expect("tempdir");

    let mut paths = Vec::new();
    for (i, (w, h)) in [(400u32, 520u32), (380, 500), (420, 540)].iter().enumerate() {
        let path = dir.path().join(format!("photo_{i}.png"));
        page_photo(*w, *h).save(&path).expect("write test photo");
        paths.push(path);
    }

    let output = dir.path().join("bundle_scanned.pdf");
    let job = ScanJob::new(
        JobInput::Images(paths),
        output.clone(),
        ScanConfig::default(),
    );

    let mut progress = Vec::new();
    let written = convert_job(&job, |p| progress.push(p)).expect("conversion succeeds");

    assert_eq!(written, output);
    assert_eq!(progress.len(), 3);
    assert!(progress.iter().all(|p| p.total == 3));
    assert_eq!(
        progress.iter().map(|p| p.current).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    let bytes = std::fs::read(&output).expect("artifact readable");
    let doc = lopdf::Document::load_mem(&bytes).expect("output parses as PDF");
    assert_eq!(doc.get_pages().len(), 3);
}

#[test]
fn unreadable_image_fails_without_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("broken_scanned.pdf");

    let job = ScanJob::new(
        JobInput::Images(vec![dir.path().join("does_not_exist.png")]),
        output.clone(),
        ScanConfig::default(),
    );

    assert!(convert_job(&job, |_| {}).is_err());
    assert!(!output.exists());
}
