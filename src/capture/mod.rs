// # Capture Module
//
// Video sources feeding the capture loop. Every backend implements
// `FrameSource`, a blocking, single-threaded interface: the loop owns the
// source and decides when to open, flush, read and release it.

use std::fmt;
use std::str::FromStr;

use image::RgbImage;

use crate::error::ScanResult;

pub mod mjpeg;
#[cfg(feature = "opencv")]
pub mod camera;

pub use mjpeg::MjpegSource;
#[cfg(feature = "opencv")]
pub use camera::OpenCvSource;

/// Address of a video source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Network stream (HTTP MJPEG, RTSP, ...).
    Url(String),
    /// Local camera by zero-based index.
    Device(i32),
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::Url(url) => write!(f, "{}", url),
            SourceSpec::Device(index) => write!(f, "camera #{}", index),
        }
    }
}

impl FromStr for SourceSpec {
    type Err = std::convert::Infallible;

    /// `"0"` and `"/dev/video0"` name local devices; anything else is a URL.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<i32>() {
            return Ok(SourceSpec::Device(index));
        }
        if let Some(stripped) = s.strip_prefix("/dev/video") {
            if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(index) = stripped.parse::<i32>() {
                    return Ok(SourceSpec::Device(index));
                }
            }
        }
        Ok(SourceSpec::Url(s.to_string()))
    }
}

/// Blocking frame source.
pub trait FrameSource {
    /// Open (or reopen) the source. Any previously open stream is replaced.
    ///
    /// # Errors
    ///
    /// `ScanError::SourceOpen` when the source cannot be reached.
    fn open(&mut self, spec: &SourceSpec) -> ScanResult<()>;

    /// Whether a stream is currently open.
    fn is_opened(&self) -> bool;

    /// Pull and discard one buffered frame. Returns false when nothing was
    /// available.
    fn grab(&mut self) -> ScanResult<bool>;

    /// Read the next frame. `Ok(None)` means the read failed without a
    /// specific error (end of stream, empty frame).
    fn read(&mut self) -> ScanResult<Option<RgbImage>>;

    /// Close the stream. Safe to call when already closed.
    fn release(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_device_indices() {
        assert_eq!("0".parse::<SourceSpec>().unwrap(), SourceSpec::Device(0));
        assert_eq!(
            "/dev/video2".parse::<SourceSpec>().unwrap(),
            SourceSpec::Device(2)
        );
    }

    #[test]
    fn parses_urls() {
        assert_eq!(
            "http://10.0.0.2:8080/video".parse::<SourceSpec>().unwrap(),
            SourceSpec::Url("http://10.0.0.2:8080/video".into())
        );
        assert_eq!(
            "/dev/videox".parse::<SourceSpec>().unwrap(),
            SourceSpec::Url("/dev/videox".into())
        );
    }
}
