//! # Scanner Configuration
//!
//! Configuration structure and validation for a scanning session. It is the
//! common interface between the interactive setup in the binary and the capture
//! loop.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Default | Description |
//! |-----------|------|---------|-------------|
//! | `source_url` | `String` | `http://192.168.1.100:8080/video` | Primary network stream |
//! | `fallback` | `SourceSpec` | `camera #0` | Source opened once when the stream cannot be opened |
//! | `quality` | `u8` | `60` | Stream quality requested from the camera app |
//! | `store_path` | `PathBuf` | `products_database.json` | Product store file |
//! | `debounce_frames` | `u32` | `30` | Frames during which a new code cannot fire |
//! | `detect_scale` | `f32` | `0.5` | Uniform downscale before detection |
//! | `flush_frames` | `u32` | `2` | Buffered frames discarded per iteration |
//! | `max_display` | `Size` | `1200x800` | Display bound, aspect preserved |
//! | `name_display_chars` | `usize` | `30` | Product name budget on the overlay |
//!
//! ## Addresses
//!
//! Operators type whatever the phone app shows. [`normalize_address`] turns that
//! into a stream URL, and [`ScannerConfig::stream_url`] swaps in the IP Webcam
//! quality endpoint when the address looks like that app.
//!
//! ## Examples
//!
//! ```rust
//! use barcode_scanner::config::config::{normalize_address, ScannerConfig};
//!
//! let mut config = ScannerConfig::default();
//! config.source_url = normalize_address("192.168.0.7:8080");
//! config.quality = 30;
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.stream_url(), "http://192.168.0.7:8080/videofeed?quality=30");
//! ```

use std::path::PathBuf;

use scan_scale::presets::Size;

use crate::capture::SourceSpec;
use crate::error::{ScanError, ScanResult};

/// Default stream address of the IP Webcam app.
pub const DEFAULT_SOURCE_URL: &str = "http://192.168.1.100:8080/video";

/// Default product store file.
pub const DEFAULT_STORE_PATH: &str = "products_database.json";

/// Configuration structure for a scanning session.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Normalized network stream address (see [`normalize_address`]).
    pub source_url: String,

    /// Source opened once when the network stream is unavailable. A local
    /// camera by default; a second stream URL also works.
    pub fallback: SourceSpec,

    /// Stream quality (1-100) requested from the camera app.
    pub quality: u8,

    /// Product store file.
    pub store_path: PathBuf,

    /// Number of frames after a scan event during which no new event fires.
    /// Must be greater than 0.
    pub debounce_frames: u32,

    /// Uniform scale factor applied before detection. Must be in (0, 1].
    pub detect_scale: f32,

    /// Buffered frames discarded before each read to bound latency.
    pub flush_frames: u32,

    /// Frames larger than this are shrunk before display.
    pub max_display: Size,

    /// Character budget for the product name drawn on the frame.
    pub name_display_chars: usize,

    /// Key poll wait in milliseconds.
    pub key_wait_ms: u32,

    /// Title of the display window.
    pub window_title: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fallback: SourceSpec::Device(0),
            quality: 60,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            debounce_frames: 30,
            detect_scale: 0.5,
            flush_frames: 2,
            max_display: Size { w: 1200, h: 800 },
            name_display_chars: 30,
            key_wait_ms: 1,
            window_title: "Barcode Scanner (Phone)".to_string(),
        }
    }
}

impl ScannerConfig {
    /// Creates a configuration for the given stream, quality and store file,
    /// keeping defaults for the loop tuning parameters.
    pub fn new(source_url: String, quality: u8, store_path: PathBuf) -> Self {
        Self {
            source_url,
            quality,
            store_path,
            ..Self::default()
        }
    }

    /// Validates the configuration parameters.
    ///
    /// # Errors
    ///
    /// `ScanError::Config` naming the first invalid field.
    pub fn validate(&self) -> ScanResult<()> {
        if self.source_url.trim().is_empty() {
            return Err(ScanError::config("source_url", &self.source_url, "must not be empty"));
        }
        if let SourceSpec::Url(url) = &self.fallback {
            if url.trim().is_empty() {
                return Err(ScanError::config("fallback", url, "must not be empty"));
            }
        }
        if !(1..=100).contains(&self.quality) {
            return Err(ScanError::config(
                "quality",
                self.quality.to_string(),
                "must be between 1 and 100",
            ));
        }
        if self.debounce_frames == 0 {
            return Err(ScanError::config("debounce_frames", "0", "must be at least one frame"));
        }
        if !(self.detect_scale > 0.0 && self.detect_scale <= 1.0) {
            return Err(ScanError::config(
                "detect_scale",
                self.detect_scale.to_string(),
                "must be in (0, 1]",
            ));
        }
        if self.max_display.w == 0 || self.max_display.h == 0 {
            return Err(ScanError::config(
                "max_display",
                format!("{}x{}", self.max_display.w, self.max_display.h),
                "must be non-zero",
            ));
        }
        if self.name_display_chars == 0 {
            return Err(ScanError::config("name_display_chars", "0", "must be greater than 0"));
        }
        Ok(())
    }

    /// Stream URL actually opened. IP Webcam addresses are redirected to the
    /// `/videofeed` endpoint with the configured quality.
    pub fn stream_url(&self) -> String {
        stream_endpoint(&self.source_url, self.quality)
    }

    /// Primary source to open.
    pub fn primary_source(&self) -> SourceSpec {
        SourceSpec::Url(self.stream_url())
    }

    /// Source tried once when the primary cannot be opened.
    pub fn fallback_source(&self) -> SourceSpec {
        self.fallback.clone()
    }
}

/// Normalize an operator-typed address into a `/video` stream URL.
///
/// Empty input selects [`DEFAULT_SOURCE_URL`]; a missing `http://` scheme is
/// added and a `/video` suffix appended when absent.
pub fn normalize_address(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return DEFAULT_SOURCE_URL.to_string();
    }
    let mut url = if input.starts_with("http://") {
        input.to_string()
    } else {
        format!("http://{}", input)
    };
    if !url.ends_with("/video") {
        url.push_str("/video");
    }
    url
}

/// Swap in the IP Webcam quality endpoint when the URL looks like that app
/// (mentions `ip-webcam` or uses its default port 8080).
pub fn stream_endpoint(url: &str, quality: u8) -> String {
    if url.to_lowercase().contains("ip-webcam") || url.contains(":8080") {
        let base = url.split("/video").next().unwrap_or(url);
        format!("{}/videofeed?quality={}", base, quality)
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScannerConfig::default();
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert_eq!(config.debounce_frames, 30);
        assert_eq!(config.detect_scale, 0.5);
        assert_eq!(config.max_display, Size { w: 1200, h: 800 });
        assert_eq!(config.store_path, PathBuf::from("products_database.json"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScannerConfig::default();
        assert!(config.validate().is_ok());

        config.debounce_frames = 0;
        assert!(config.validate().is_err());
        config.debounce_frames = 30;

        config.detect_scale = 0.0;
        assert!(config.validate().is_err());
        config.detect_scale = 1.5;
        assert!(config.validate().is_err());
        config.detect_scale = 0.5;

        config.quality = 0;
        assert!(config.validate().is_err());
        config.quality = 60;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_field_is_named_in_a_fatal_error() {
        let mut config = ScannerConfig::default();
        config.detect_scale = 1.5;

        let err = config.validate().unwrap_err();
        assert!(matches!(
            &err,
            ScanError::Config { field, value, .. } if field == "detect_scale" && value == "1.5"
        ));
        assert!(crate::error::classify::is_fatal(&err));

        config.detect_scale = 0.5;
        config.fallback = SourceSpec::Url("  ".into());
        assert!(matches!(
            config.validate(),
            Err(ScanError::Config { field, .. }) if field == "fallback"
        ));
    }

    #[test]
    fn test_fallback_source_follows_config() {
        let mut config = ScannerConfig::default();
        assert_eq!(config.fallback_source(), SourceSpec::Device(0));

        config.fallback = "http://10.0.0.9:4747/video".parse().unwrap();
        assert_eq!(
            config.fallback_source(),
            SourceSpec::Url("http://10.0.0.9:4747/video".into())
        );
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address(""), DEFAULT_SOURCE_URL);
        assert_eq!(
            normalize_address("192.168.0.10:8080"),
            "http://192.168.0.10:8080/video"
        );
        assert_eq!(
            normalize_address("http://10.0.0.2:4747/video"),
            "http://10.0.0.2:4747/video"
        );
    }

    #[test]
    fn test_stream_endpoint_rewrites_ip_webcam() {
        assert_eq!(
            stream_endpoint("http://192.168.1.100:8080/video", 90),
            "http://192.168.1.100:8080/videofeed?quality=90"
        );
        assert_eq!(
            stream_endpoint("http://my-ip-webcam.local/video", 30),
            "http://my-ip-webcam.local/videofeed?quality=30"
        );
        assert_eq!(
            stream_endpoint("http://10.0.0.2:4747/video", 30),
            "http://10.0.0.2:4747/video"
        );
    }
}
