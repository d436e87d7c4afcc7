//! # Barcode Detection
//!
//! The decoder is an external collaborator: the capture loop hands it a reduced
//! single-channel frame and gets back zero or more [`BarcodeRegion`]s in that
//! frame's coordinates.

use image::GrayImage;

use crate::error::ScanResult;

pub mod rxing;

pub use self::rxing::RxingDecoder;

/// Axis-aligned bounding box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Smallest rectangle containing all `points`.
    pub fn bounding(points: impl IntoIterator<Item = (f32, f32)>) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x0, y0) = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (x0, y0, x0, y0);
        for (x, y) in iter {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        Some(Self {
            x: min_x.floor() as i32,
            y: min_y.floor() as i32,
            w: (max_x - min_x).ceil().max(1.0) as i32,
            h: (max_y - min_y).ceil().max(1.0) as i32,
        })
    }

    /// Grow a line-shaped box to a quarter of its width, centered on the line.
    /// Linear symbologies only report the scan line they were read on.
    pub fn around_scan_line(self) -> Self {
        let h = (self.w / 4).max(self.h);
        Self {
            x: self.x,
            y: (self.y + self.h / 2 - h / 2).max(0),
            w: self.w,
            h,
        }
    }

    /// Map a rectangle found on a frame reduced by `factor` back to the full
    /// frame (factor 0.5 doubles every coordinate).
    pub fn scaled(self, factor: f32) -> Self {
        let inv = 1.0 / factor;
        Self {
            x: (self.x as f32 * inv).round() as i32,
            y: (self.y as f32 * inv).round() as i32,
            w: (self.w as f32 * inv).round() as i32,
            h: (self.h as f32 * inv).round() as i32,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// A decoded barcode and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeRegion {
    pub rect: Rect,
    /// Decoded payload.
    pub text: String,
    /// Symbology tag, e.g. `EAN_13`.
    pub format: String,
}

/// Barcode decoder collaborator.
pub trait BarcodeDecoder {
    /// Decode every barcode visible in `frame`. An empty vector means nothing
    /// was found.
    fn decode(&mut self, frame: &GrayImage) -> ScanResult<Vec<BarcodeRegion>>;
}
