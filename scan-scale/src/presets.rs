// SPDX-License-Identifier: MIT
//! # Scaling Plans and Quality Tiers
//!
//! Plan computation for the two resize steps of the capture loop:
//!
//! 1. **Factor**: uniform downscale of every frame before barcode detection
//! 2. **FitWithin**: shrink the annotated frame to fit a display bound
//!
//! All computations use floating-point for precision but round to integers, and
//! every output side is clamped to at least 1px.

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    /// True when both sides fit inside `bound`.
    pub fn fits_within(self, bound: Size) -> bool {
        self.w <= bound.w && self.h <= bound.h
    }
}

/// Defines the target size constraint for scaling operations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleTarget {
    /// Multiply both sides by the same factor (0.5 = half size).
    Factor(f32),
    /// Keep aspect ratio and fit entirely inside the bound. Never upscales.
    FitWithin(Size),
}

/// Complete scaling plan computed from input parameters.
#[derive(Clone, Copy, Debug)]
pub struct ScalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Target size constraint used for planning
    pub target: ScaleTarget,
    /// Final computed output dimensions
    pub out: Size,
}

impl ScalePlan {
    /// True when the plan leaves the frame untouched.
    pub fn is_identity(&self) -> bool {
        self.input == self.out
    }
}

/// Compute a scaling plan from input parameters.
///
/// # Arguments
/// * `input` - Source image dimensions
/// * `target` - Size constraint to apply
///
/// # Performance
/// O(1) computation with minimal floating-point operations
pub fn build_plan(input: Size, target: ScaleTarget) -> ScalePlan {
    let (w, h) = match target {
        ScaleTarget::Factor(factor) => scale_uniform(input, factor),
        ScaleTarget::FitWithin(bound) => fit_within(input, bound),
    };
    ScalePlan {
        input,
        target,
        out: Size { w, h },
    }
}

fn scale_uniform(input: Size, factor: f32) -> (u32, u32) {
    let s = factor.max(0.0) as f64;
    (
        ((input.w as f64 * s).round() as u32).max(1),
        ((input.h as f64 * s).round() as u32).max(1),
    )
}

/// Fit image within a bounding box while preserving aspect ratio.
/// Returns (width, height) that fit entirely within the box.
fn fit_within(input: Size, box_: Size) -> (u32, u32) {
    let (w, h) = (input.w as f64, input.h as f64);
    let (bw, bh) = (box_.w as f64, box_.h as f64);
    let s = (bw / w).min(bh / h).min(1.0);
    (
        ((w * s).round() as u32).max(1),
        ((h * s).round() as u32).max(1),
    )
}

/// Stream quality tiers offered when connecting to a phone camera.
///
/// Lower quality means smaller JPEG frames on the wire and faster decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum QualityTier {
    /// High quality (slower)
    #[clap(name = "high")]
    High,
    /// Balanced (recommended)
    #[clap(name = "balanced")]
    Balanced,
    /// High performance (faster)
    #[clap(name = "performance")]
    Performance,
}

impl QualityTier {
    /// All tiers in menu order.
    pub const ALL: [QualityTier; 3] = [
        QualityTier::High,
        QualityTier::Balanced,
        QualityTier::Performance,
    ];

    /// Stream quality parameter sent to the camera app.
    pub fn quality(self) -> u8 {
        match self {
            QualityTier::High => 90,
            QualityTier::Balanced => 60,
            QualityTier::Performance => 30,
        }
    }

    /// Menu label shown to the operator.
    pub fn label(self) -> &'static str {
        match self {
            QualityTier::High => "High quality (slower)",
            QualityTier::Balanced => "Balanced (recommended)",
            QualityTier::Performance => "High performance (faster)",
        }
    }

    /// Menu option ("1".."3"). Empty or unknown input selects `Balanced`.
    pub fn from_option(option: &str) -> Self {
        match option.trim() {
            "1" => QualityTier::High,
            "3" => QualityTier::Performance,
            _ => QualityTier::Balanced,
        }
    }
}

impl Default for QualityTier {
    fn default() -> Self {
        QualityTier::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_size_factor_rounds() {
        let plan = build_plan(Size { w: 1281, h: 721 }, ScaleTarget::Factor(0.5));
        assert_eq!(plan.out, Size { w: 641, h: 361 });
    }

    #[test]
    fn fit_within_preserves_aspect() {
        let plan = build_plan(
            Size { w: 1920, h: 1080 },
            ScaleTarget::FitWithin(Size { w: 1200, h: 800 }),
        );
        assert_eq!(plan.out, Size { w: 1200, h: 675 });
        assert!(plan.out.fits_within(Size { w: 1200, h: 800 }));
    }

    #[test]
    fn fit_within_never_upscales() {
        let plan = build_plan(
            Size { w: 640, h: 480 },
            ScaleTarget::FitWithin(Size { w: 1200, h: 800 }),
        );
        assert!(plan.is_identity());
    }

    #[test]
    fn quality_tier_options() {
        assert_eq!(QualityTier::from_option("1").quality(), 90);
        assert_eq!(QualityTier::from_option("2").quality(), 60);
        assert_eq!(QualityTier::from_option("3").quality(), 30);
        assert_eq!(QualityTier::from_option("").quality(), 60);
        assert_eq!(QualityTier::from_option("7").quality(), 60);
    }
}
