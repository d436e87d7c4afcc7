// SPDX-License-Identifier: MIT
// CPU scaler built on fast_image_resize (SIMD-accelerated).
// RGB8 or GRAY8 in, same format out, direct write into caller-provided dst buffer.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::{U8, U8x3};
use fir::{ResizeAlg, ResizeOptions, Resizer};

use crate::presets::ScalePlan;

#[derive(Debug)]
pub enum ScaleError {
    BufferTooSmall,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::BufferTooSmall => write!(f, "Output buffer too small"),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

fn options() -> ResizeOptions {
    // Bilinear keeps barcode edges sharp enough and is much cheaper than Lanczos.
    ResizeOptions::new().resize_alg(ResizeAlg::Convolution(fir::FilterType::Bilinear))
}

/// Scale a tightly packed RGB8 frame.
/// `dst` must hold at least `plan.out.w * plan.out.h * 3` bytes.
pub fn scale_rgb_cpu(
    resizer: &mut Resizer,
    src_rgb: &[u8],
    plan: &ScalePlan,
    dst: &mut [u8],
) -> Result<(), ScaleError> {
    let dst_len = (plan.out.w as usize) * (plan.out.h as usize) * 3;
    if dst.len() < dst_len {
        return Err(ScaleError::BufferTooSmall);
    }

    let src_view = TypedImageRef::<U8x3>::from_buffer(plan.input.w, plan.input.h, src_rgb)?;
    let mut dst_image = TypedImage::<U8x3>::from_buffer(plan.out.w, plan.out.h, &mut dst[..dst_len])?;
    resizer.resize_typed::<U8x3>(&src_view, &mut dst_image, &options())?;
    Ok(())
}

/// Scale a tightly packed single-channel frame.
/// `dst` must hold at least `plan.out.w * plan.out.h` bytes.
pub fn scale_gray_cpu(
    resizer: &mut Resizer,
    src_gray: &[u8],
    plan: &ScalePlan,
    dst: &mut [u8],
) -> Result<(), ScaleError> {
    let dst_len = (plan.out.w as usize) * (plan.out.h as usize);
    if dst.len() < dst_len {
        return Err(ScaleError::BufferTooSmall);
    }

    let src_view = TypedImageRef::<U8>::from_buffer(plan.input.w, plan.input.h, src_gray)?;
    let mut dst_image = TypedImage::<U8>::from_buffer(plan.out.w, plan.out.h, &mut dst[..dst_len])?;
    resizer.resize_typed::<U8>(&src_view, &mut dst_image, &options())?;
    Ok(())
}
