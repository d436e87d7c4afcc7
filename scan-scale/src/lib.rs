// SPDX-License-Identifier: MIT
//! # scan-scale: Frame Scaling for Barcode Detection and Display
//!
//! This crate holds the two resize concerns of the barcode capture loop and the
//! stream quality tiers offered to the operator.
//!
//! ## Key Components
//!
//! - [`presets`]: Scaling plan computation and the [`presets::QualityTier`] menu
//! - [`cpu`]: CPU scaling of RGB and single-channel frames using fast_image_resize
//!
//! ## Scaling Strategy
//!
//! Detection runs on a uniformly reduced frame (half size by default), trading a
//! little decoding accuracy for throughput. The annotated full-resolution frame is
//! fitted inside a display bound before it is shown, preserving aspect ratio and
//! never upscaling.
//!
//! ## Usage Example
//!
//! ```rust
//! use scan_scale::{cpu::scale_gray_cpu, presets::{build_plan, ScaleTarget, Size}};
//!
//! let input = Size { w: 640, h: 480 };
//! let plan = build_plan(input, ScaleTarget::Factor(0.5));
//! assert_eq!((plan.out.w, plan.out.h), (320, 240));
//!
//! let src = vec![128u8; 640 * 480];
//! let mut dst = vec![0u8; (plan.out.w * plan.out.h) as usize];
//! let mut resizer = fast_image_resize::Resizer::new();
//! scale_gray_cpu(&mut resizer, &src, &plan, &mut dst).unwrap();
//! ```

pub mod cpu;
pub mod presets;
