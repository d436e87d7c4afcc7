//! OpenCV-backed capture source for local cameras and any stream OpenCV can open.

use image::RgbImage;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture},
};
use tracing::debug;

use crate::capture::{FrameSource, SourceSpec};
use crate::error::{ScanError, ScanResult};

fn cv_err(err: opencv::Error) -> ScanError {
    ScanError::external("opencv", err)
}

/// `videoio::VideoCapture` wrapper with a one-frame internal buffer.
#[derive(Default)]
pub struct OpenCvSource {
    capture: Option<VideoCapture>,
    frame: Mat,
}

impl OpenCvSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameSource for OpenCvSource {
    fn open(&mut self, spec: &SourceSpec) -> ScanResult<()> {
        self.release();
        let mut cap = match spec {
            SourceSpec::Device(index) => VideoCapture::new(*index, videoio::CAP_ANY),
            SourceSpec::Url(url) => VideoCapture::from_file(url, videoio::CAP_ANY),
        }
        .map_err(|e| ScanError::source_open(spec.to_string(), e.to_string()))?;

        // Keep latency low: the driver should not queue stale frames.
        let _ = cap.set(videoio::CAP_PROP_BUFFERSIZE, 1.0);

        if !cap.is_opened().map_err(cv_err)? {
            return Err(ScanError::source_open(spec.to_string(), "capture did not open"));
        }
        debug!(source = %spec, "OpenCV capture opened");
        self.capture = Some(cap);
        Ok(())
    }

    fn is_opened(&self) -> bool {
        self.capture
            .as_ref()
            .map(|cap| cap.is_opened().unwrap_or(false))
            .unwrap_or(false)
    }

    fn grab(&mut self) -> ScanResult<bool> {
        match self.capture.as_mut() {
            Some(cap) => cap.grab().map_err(cv_err),
            None => Ok(false),
        }
    }

    fn read(&mut self) -> ScanResult<Option<RgbImage>> {
        let Some(cap) = self.capture.as_mut() else {
            return Err(ScanError::frame_read("capture is not open"));
        };
        if !cap.read(&mut self.frame).map_err(cv_err)? {
            return Ok(None);
        }

        let size = self.frame.size().map_err(cv_err)?;
        if size.width <= 0 || size.height <= 0 {
            return Ok(None);
        }
        if self.frame.channels() != 3 {
            return Err(ScanError::frame_read(format!(
                "expected 3-channel BGR frame, got {} channels",
                self.frame.channels()
            )));
        }

        let bgr = self.frame.data_bytes().map_err(cv_err)?;
        let mut rgb = Vec::with_capacity(bgr.len());
        for px in bgr.chunks_exact(3) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        let frame = RgbImage::from_raw(size.width as u32, size.height as u32, rgb)
            .ok_or_else(|| ScanError::frame_read("frame buffer size mismatch"))?;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if let Some(mut cap) = self.capture.take() {
            let _ = cap.release();
        }
    }
}
