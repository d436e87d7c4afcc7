//! Barcode decoding with the `rxing` crate (ZXing port).

use image::GrayImage;
use tracing::trace;

use crate::detect::{BarcodeDecoder, BarcodeRegion, Rect};
use crate::error::ScanResult;

/// Multi-barcode decoder over raw luma buffers.
#[derive(Debug, Default)]
pub struct RxingDecoder;

impl RxingDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl BarcodeDecoder for RxingDecoder {
    fn decode(&mut self, frame: &GrayImage) -> ScanResult<Vec<BarcodeRegion>> {
        let (width, height) = frame.dimensions();
        let results =
            match ::rxing::helpers::detect_multiple_in_luma(frame.as_raw().clone(), width, height) {
                Ok(results) => results,
                Err(err) => {
                    // rxing reports "nothing in this frame" as an error.
                    trace!(error = ?err, "no barcode decoded");
                    return Ok(Vec::new());
                }
            };

        let regions = results
            .iter()
            .filter_map(|result| {
                let points = result.getPoints();
                let mut rect = Rect::bounding(points.iter().map(|p| (p.x, p.y)))?;
                // 1D readers report the two ends of the scan line.
                if points.len() <= 2 {
                    rect = rect.around_scan_line();
                }
                Some(BarcodeRegion {
                    rect,
                    text: result.getText().to_string(),
                    format: format!("{:?}", result.getBarcodeFormat()),
                })
            })
            .collect();
        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use ::rxing::{BarcodeFormat, MultiFormatWriter, Writer};
    use image::{Luma, Rgb, RgbImage};
    use scan_scale::presets::Size;

    use super::*;
    use crate::processing::FrameScaler;

    const CODE: &str = "7894650940174";
    /// Where the symbol (quiet zone included) is painted on a 1280x720 frame.
    const AREA: Rect = Rect { x: 260, y: 240, w: 760, h: 240 };

    fn frame_with_ean13() -> RgbImage {
        let matrix = MultiFormatWriter::default()
            .encode(CODE, &BarcodeFormat::EAN_13, AREA.w, AREA.h)
            .unwrap();
        assert_eq!((matrix.getWidth(), matrix.getHeight()), (760, 240));

        let mut frame = RgbImage::from_pixel(1280, 720, Rgb([255, 255, 255]));
        for y in 0..matrix.getHeight() {
            for x in 0..matrix.getWidth() {
                if matrix.get(x, y) {
                    frame.put_pixel(AREA.x as u32 + x, AREA.y as u32 + y, Rgb([0, 0, 0]));
                }
            }
        }
        frame
    }

    #[test]
    fn decodes_ean13_on_the_half_size_frame() {
        let mut scaler = FrameScaler::new(0.5, Size { w: 1200, h: 800 });
        let detection = scaler.detection_frame(&frame_with_ean13()).unwrap();
        assert_eq!(detection.dimensions(), (640, 360));

        let regions = RxingDecoder::new().decode(&detection).unwrap();
        let region = regions.iter().find(|r| r.text == CODE).unwrap();
        assert_eq!(region.format, "EAN_13");

        let rect = region.rect.scaled(scaler.detect_scale());
        assert!(rect.x >= AREA.x && rect.right() <= AREA.right(), "{:?}", rect);
        assert!(rect.y >= AREA.y && rect.bottom() <= AREA.bottom(), "{:?}", rect);
        // The scan line is drawn as a box, not a hairline.
        assert!(rect.h >= rect.w / 4 - 2, "{:?}", rect);
    }

    #[test]
    fn blank_frames_decode_to_nothing() {
        let mut decoder = RxingDecoder::new();
        let blank = GrayImage::from_pixel(640, 360, Luma([255]));
        assert_eq!(decoder.decode(&blank).unwrap(), Vec::new());
        assert_eq!(decoder.decode(&GrayImage::new(1, 1)).unwrap(), Vec::new());
    }
}
