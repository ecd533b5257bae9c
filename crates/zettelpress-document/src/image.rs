// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Thermal image preprocessing.
//
// Thermal heads print pure black-or-white dots, so attached images are
// reduced to grayscale and binarized at a fixed threshold before they go
// into the ticket PDF. Failures degrade: a photo that cannot be binarized
// is embedded unmodified, and an unreadable file means the ticket simply
// prints without its image.

use image::{DynamicImage, ImageFormat};
use imageproc::contrast::{ThresholdType, threshold};
use tracing::{debug, instrument, warn};

use zettelpress_core::error::{Result, ZettelpressError};

/// Binarization cut-off on the 0–255 luma scale. Pixels above print white,
/// pixels at or below print black.
pub const THERMAL_THRESHOLD: u8 = 180;

/// Prepare an uploaded image file for thermal printing.
///
/// Returns PNG bytes ready for embedding, or `None` when the file cannot
/// be used at all — the caller renders the ticket without an image.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn prepare_ticket_image(path: impl AsRef<std::path::Path>) -> Option<Vec<u8>> {
    let path = path.as_ref();
    let original = match image::open(path) {
        Ok(img) => img,
        Err(err) => {
            warn!(error = %err, "ticket image unreadable, printing without it");
            return None;
        }
    };

    match binarize(&original) {
        Ok(bytes) => {
            debug!(bytes = bytes.len(), "image binarized for thermal output");
            Some(bytes)
        }
        Err(err) => {
            warn!(error = %err, "binarization failed, falling back to the unmodified image");
            match encode_png(&original) {
                Ok(bytes) => Some(bytes),
                Err(err) => {
                    warn!(error = %err, "re-encoding original failed, printing without an image");
                    None
                }
            }
        }
    }
}

/// Grayscale + fixed-threshold binarization, re-encoded as PNG.
fn binarize(original: &DynamicImage) -> Result<Vec<u8>> {
    let gray = original.to_luma8();
    let mono = threshold(&gray, THERMAL_THRESHOLD, ThresholdType::Binary);
    encode_png(&DynamicImage::ImageLuma8(mono))
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    img.write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| ZettelpressError::Image(format!("PNG encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn gradient_fixture() -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("create temp image");
        let img = GrayImage::from_fn(8, 8, |x, y| Luma([(x * 32 + y) as u8]));
        img.save(file.path()).expect("write fixture");
        file
    }

    #[test]
    fn binarized_output_contains_only_black_and_white() {
        let fixture = gradient_fixture();
        let bytes = prepare_ticket_image(fixture.path()).expect("preprocess");

        let decoded = image::load_from_memory(&bytes).expect("decode output").to_luma8();
        assert!(
            decoded.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255),
            "expected pure monochrome output"
        );
    }

    #[test]
    fn pixels_above_threshold_go_white() {
        let file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("create temp image");
        let img = GrayImage::from_fn(2, 1, |x, _| {
            Luma([if x == 0 { THERMAL_THRESHOLD + 10 } else { THERMAL_THRESHOLD - 10 }])
        });
        img.save(file.path()).expect("write fixture");

        let bytes = prepare_ticket_image(file.path()).expect("preprocess");
        let decoded = image::load_from_memory(&bytes).expect("decode").to_luma8();
        assert_eq!(decoded.get_pixel(0, 0).0[0], 255);
        assert_eq!(decoded.get_pixel(1, 0).0[0], 0);
    }

    #[test]
    fn missing_file_yields_none() {
        assert!(prepare_ticket_image("/nonexistent/ticket-photo.png").is_none());
    }

    #[test]
    fn undecodable_file_yields_none() {
        let file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("create temp file");
        std::fs::write(file.path(), b"this is not a png").expect("write junk");
        assert!(prepare_ticket_image(file.path()).is_none());
    }
}
