// # MJPEG Capture Source
//
// Pure-Rust reader for the multipart JPEG streams served by phone camera apps
// (IP Webcam `/video`, `/videofeed`). The HTTP body is read with blocking
// reqwest and split on JPEG start/end markers, so the part headers and
// boundaries of the multipart envelope never need parsing.

use std::io::Read;
use std::time::Duration;

use image::{ImageFormat, RgbImage};
use tracing::{debug, warn};

use crate::capture::{FrameSource, SourceSpec};
use crate::error::{ScanError, ScanResult};

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];
const READ_CHUNK: usize = 16 * 1024;
const MAX_FRAME_BYTES: usize = 8 * 1024 * 1024;

/// HTTP MJPEG source. Local camera devices are not supported here.
pub struct MjpegSource {
    client: reqwest::blocking::Client,
    response: Option<reqwest::blocking::Response>,
    buffer: Vec<u8>,
}

impl MjpegSource {
    /// Create a source with the given per-read timeout.
    pub fn new(read_timeout: Duration) -> ScanResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(read_timeout)
            .build()
            .map_err(|e| ScanError::external("reqwest", e))?;
        Ok(Self {
            client,
            response: None,
            buffer: Vec::with_capacity(READ_CHUNK * 4),
        })
    }

    /// Next complete JPEG from the stream, or `None` at end of stream.
    fn next_jpeg(&mut self) -> ScanResult<Option<Vec<u8>>> {
        let response = self
            .response
            .as_mut()
            .ok_or_else(|| ScanError::frame_read("stream is not open"))?;

        let mut chunk = [0u8; READ_CHUNK];
        loop {
            if let Some((start, end)) = locate_jpeg(&self.buffer) {
                let frame = self.buffer[start..end].to_vec();
                self.buffer.drain(..end);
                return Ok(Some(frame));
            }

            if self.buffer.len() > MAX_FRAME_BYTES {
                warn!(bytes = self.buffer.len(), "no JPEG boundary found, dropping buffered stream data");
                self.buffer.clear();
            }

            let n = response
                .read(&mut chunk)
                .map_err(|e| ScanError::frame_read(e.to_string()))?;
            if n == 0 {
                debug!("MJPEG stream ended");
                return Ok(None);
            }
            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}

impl FrameSource for MjpegSource {
    fn open(&mut self, spec: &SourceSpec) -> ScanResult<()> {
        self.release();
        let url = match spec {
            SourceSpec::Url(url) => url,
            SourceSpec::Device(_) => {
                return Err(ScanError::source_open(
                    spec.to_string(),
                    "local cameras require building with the `opencv` feature",
                ));
            }
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                ScanError::source_open(url.clone(), e.to_string())
                    .with_recovery_suggestion("Check the address and that the camera app is streaming")
            })?;

        debug!(url = %url, status = %response.status(), "MJPEG stream opened");
        self.response = Some(response);
        Ok(())
    }

    fn is_opened(&self) -> bool {
        self.response.is_some()
    }

    fn grab(&mut self) -> ScanResult<bool> {
        Ok(self.next_jpeg()?.is_some())
    }

    fn read(&mut self) -> ScanResult<Option<RgbImage>> {
        let Some(jpeg) = self.next_jpeg()? else {
            return Ok(None);
        };
        let frame = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg)
            .map_err(|e| ScanError::frame_read(format!("corrupt JPEG frame: {}", e)))?
            .to_rgb8();
        Ok(Some(frame))
    }

    fn release(&mut self) {
        self.response = None;
        self.buffer.clear();
    }
}

fn find_marker(haystack: &[u8], marker: [u8; 2], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(2)
        .position(|w| w == marker)
        .map(|p| p + from)
}

/// Byte range `[start, end)` of the first complete JPEG in `buffer`.
fn locate_jpeg(buffer: &[u8]) -> Option<(usize, usize)> {
    let start = find_marker(buffer, SOI, 0)?;
    let end = find_marker(buffer, EOI, start + 2)? + 2;
    Some((start, end))
}
