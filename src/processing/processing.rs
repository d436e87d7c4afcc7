//! # Frame Scaling
//!
//! The two resize steps of a capture-loop iteration:
//!
//! 1. **Detection frame**: grayscale copy of the raw frame, uniformly reduced by
//!    the detection scale. The decoder only ever sees this frame.
//! 2. **Display frame**: the annotated full-resolution frame, shrunk to fit the
//!    display bound when it is larger. Aspect ratio is preserved and frames are
//!    never upscaled.
//!
//! Both go through one reusable `fast_image_resize::Resizer` via `scan-scale`.

use fast_image_resize::Resizer;
use image::{GrayImage, RgbImage};
use scan_scale::cpu::{scale_gray_cpu, scale_rgb_cpu};
use scan_scale::presets::{ScaleTarget, Size, build_plan};

use crate::error::{ScanError, ScanResult};

/// Reusable scaler for the per-frame resize steps.
pub struct FrameScaler {
    resizer: Resizer,
    detect_scale: f32,
    max_display: Size,
}

impl FrameScaler {
    pub fn new(detect_scale: f32, max_display: Size) -> Self {
        Self {
            resizer: Resizer::new(),
            detect_scale,
            max_display,
        }
    }

    pub fn detect_scale(&self) -> f32 {
        self.detect_scale
    }

    /// Single-channel copy of `frame` reduced by the detection scale.
    pub fn detection_frame(&mut self, frame: &RgbImage) -> ScanResult<GrayImage> {
        let gray = image::imageops::grayscale(frame);
        let plan = build_plan(size_of(frame), ScaleTarget::Factor(self.detect_scale));
        if plan.is_identity() {
            return Ok(gray);
        }

        let mut out = GrayImage::new(plan.out.w, plan.out.h);
        scale_gray_cpu(&mut self.resizer, gray.as_raw(), &plan, &mut out)?;
        Ok(out)
    }

    /// `frame` fitted inside the display bound. Frames that already fit are
    /// returned unchanged.
    pub fn display_frame(&mut self, frame: RgbImage) -> ScanResult<RgbImage> {
        let input = size_of(&frame);
        if input.fits_within(self.max_display) {
            return Ok(frame);
        }

        let plan = build_plan(input, ScaleTarget::FitWithin(self.max_display));
        let mut out = RgbImage::new(plan.out.w, plan.out.h);
        scale_rgb_cpu(&mut self.resizer, frame.as_raw(), &plan, &mut out)
            .map_err(|e| ScanError::from(e).with_operation("fit display frame"))?;
        Ok(out)
    }
}

fn size_of(frame: &RgbImage) -> Size {
    Size {
        w: frame.width(),
        h: frame.height(),
    }
}
