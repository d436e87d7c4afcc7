//! Common test utilities for the scanner tests
//!
//! Scripted stand-ins for the video source, display, and decoder so the capture
//! loop can be driven frame by frame without a camera or a window.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::path::PathBuf;

use barcode_scanner::config::ScannerConfig;
use barcode_scanner::error::{ScanError, ScanResult};
use barcode_scanner::{
    BarcodeDecoder, BarcodeRegion, Console, Display, FrameSource, Key, ProductStore, Rect,
    SourceSpec,
};
use image::{GrayImage, Rgb, RgbImage};

pub const FOUND_CODE: &str = "7894650940174";
pub const FOUND_NAME: &str = "Odorizador de ambiente aerossol brisa cítrica de verão Glade";
pub const MISSING_CODE: &str = "0000000000000";

/// Mid-gray test frame.
pub fn test_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([128, 128, 128]))
}

/// EAN-13 detection in detection-frame coordinates.
pub fn ean13(code: &str) -> BarcodeRegion {
    BarcodeRegion {
        rect: Rect::new(100, 80, 120, 40),
        text: code.to_string(),
        format: "EAN_13".to_string(),
    }
}

/// Store seeded in a fresh temporary directory.
pub fn seeded_store() -> (tempfile::TempDir, PathBuf, ProductStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.json");
    let store = ProductStore::load(&path).unwrap();
    (dir, path, store)
}

pub fn config() -> ScannerConfig {
    ScannerConfig::default()
}

/// Console fed from a fixed script of operator lines.
pub fn scripted_console(lines: &[&str]) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    let mut input = lines.join("\n");
    input.push('\n');
    Console::new(Cursor::new(input.into_bytes()), Vec::new())
}

/// Frame source replaying a script of reads.
///
/// `None` in the frame script is a failed read. Open attempts follow
/// `open_plan`; once it is exhausted a source opens only while it still has
/// frames to give.
#[derive(Debug, Default)]
pub struct MockSource {
    frames: VecDeque<Option<RgbImage>>,
    open_plan: VecDeque<bool>,
    opened: bool,
    drop_after: Option<usize>,
    pub open_attempts: Vec<SourceSpec>,
    pub grabs: usize,
    pub releases: usize,
}

impl MockSource {
    /// Source delivering `count` good 640x480 frames.
    pub fn streaming(count: usize) -> Self {
        Self::with_frames((0..count).map(|_| Some(test_frame(640, 480))))
    }

    pub fn with_frames(frames: impl IntoIterator<Item = Option<RgbImage>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn open_plan(mut self, plan: &[bool]) -> Self {
        self.open_plan = plan.iter().copied().collect();
        self
    }

    /// Stream closes by itself after `reads` successful reads, as a phone app
    /// going to the background would.
    pub fn drops_after(mut self, reads: usize) -> Self {
        self.drop_after = Some(reads);
        self
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }
}

impl FrameSource for MockSource {
    fn open(&mut self, spec: &SourceSpec) -> ScanResult<()> {
        self.open_attempts.push(spec.clone());
        let ok = self
            .open_plan
            .pop_front()
            .unwrap_or(!self.frames.is_empty());
        self.opened = ok;
        if ok {
            Ok(())
        } else {
            Err(ScanError::source_open(spec.to_string(), "scripted failure"))
        }
    }

    fn is_opened(&self) -> bool {
        self.opened
    }

    fn grab(&mut self) -> ScanResult<bool> {
        self.grabs += 1;
        Ok(self.opened)
    }

    fn read(&mut self) -> ScanResult<Option<RgbImage>> {
        if !self.opened {
            return Err(ScanError::frame_read("source is closed"));
        }
        let frame = self.frames.pop_front().flatten();
        if let Some(remaining) = self.drop_after.as_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.drop_after = None;
                self.opened = false;
            }
        }
        Ok(frame)
    }

    fn release(&mut self) {
        self.opened = false;
        self.releases += 1;
    }
}

/// Display recording what was shown and replaying a script of key presses.
#[derive(Debug, Default)]
pub struct ScriptedDisplay {
    keys: VecDeque<Option<Key>>,
    pub shown: usize,
    pub last_size: Option<(u32, u32)>,
    pub last_title: Option<String>,
    pub closes: usize,
}

impl ScriptedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per frame; frames past the script see no key.
    pub fn with_keys(keys: impl IntoIterator<Item = Option<Key>>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Display for ScriptedDisplay {
    fn show(&mut self, title: &str, frame: &RgbImage) -> ScanResult<()> {
        self.shown += 1;
        self.last_size = Some(frame.dimensions());
        self.last_title = Some(title.to_string());
        Ok(())
    }

    fn poll_key(&mut self, _wait_ms: u32) -> ScanResult<Option<Key>> {
        Ok(self.keys.pop_front().flatten())
    }

    fn close(&mut self) {
        self.closes += 1;
    }
}

/// Decoder replaying one result per frame; frames past the script decode
/// nothing.
#[derive(Debug, Default)]
pub struct ScriptedDecoder {
    script: VecDeque<ScanResult<Vec<BarcodeRegion>>>,
    pub frame_sizes: Vec<(u32, u32)>,
}

impl ScriptedDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: impl IntoIterator<Item = ScanResult<Vec<BarcodeRegion>>>) -> Self {
        Self {
            script: results.into_iter().collect(),
            ..Self::default()
        }
    }

    /// The same detections on every one of `frames` frames.
    pub fn repeating(regions: Vec<BarcodeRegion>, frames: usize) -> Self {
        Self::with_results((0..frames).map(|_| Ok(regions.clone())))
    }
}

impl BarcodeDecoder for ScriptedDecoder {
    fn decode(&mut self, frame: &GrayImage) -> ScanResult<Vec<BarcodeRegion>> {
        self.frame_sizes.push(frame.dimensions());
        self.script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
