//! # Display Surface
//!
//! One titled window showing the annotated frame, plus non-blocking key polling.
//! The capture loop only understands two keys: `q` (quit) and `a` (add product).
//!
//! [`WindowDisplay`] is the default surface. `HighGuiDisplay` replaces it in
//! OpenCV builds and [`HeadlessDisplay`] runs without any window.

use image::RgbImage;
use tracing::debug;

use crate::error::ScanResult;

#[cfg(feature = "opencv")]
pub mod highgui;
pub mod window;

#[cfg(feature = "opencv")]
pub use highgui::HighGuiDisplay;
pub use window::WindowDisplay;

/// Key press recognized by the capture loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Quit,
    AddProduct,
    Other(u8),
}

impl Key {
    /// Map a raw key code (as returned by a GUI toolkit) to a [`Key`].
    /// Only the low byte is significant.
    pub fn from_code(code: i32) -> Self {
        match (code & 0xFF) as u8 {
            b'q' => Key::Quit,
            b'a' => Key::AddProduct,
            other => Key::Other(other),
        }
    }
}

/// Display collaborator.
pub trait Display {
    /// Show `frame` in the window titled `title`, creating it if needed.
    fn show(&mut self, title: &str, frame: &RgbImage) -> ScanResult<()>;

    /// Wait up to `wait_ms` for a key press.
    fn poll_key(&mut self, wait_ms: u32) -> ScanResult<Option<Key>>;

    /// Close every window. Safe to call when nothing is shown.
    fn close(&mut self);
}

/// Window-less display: frames are only counted. No key is ever reported, so
/// a headless session ends with Ctrl-C or when the source is lost.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    frames_shown: u64,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }
}

impl Display for HeadlessDisplay {
    fn show(&mut self, _title: &str, frame: &RgbImage) -> ScanResult<()> {
        self.frames_shown += 1;
        if self.frames_shown % 100 == 1 {
            debug!(
                frames = self.frames_shown,
                width = frame.width(),
                height = frame.height(),
                "headless display"
            );
        }
        Ok(())
    }

    fn poll_key(&mut self, _wait_ms: u32) -> ScanResult<Option<Key>> {
        Ok(None)
    }

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_codes_use_low_byte() {
        assert_eq!(Key::from_code(b'q' as i32), Key::Quit);
        assert_eq!(Key::from_code(0x1_0000 | b'a' as i32), Key::AddProduct);
        assert_eq!(Key::from_code(27), Key::Other(27));
    }

    #[test]
    fn headless_display_counts_frames() {
        let mut display = HeadlessDisplay::new();
        let frame = RgbImage::new(4, 4);
        display.show("test", &frame).unwrap();
        display.show("test", &frame).unwrap();
        assert_eq!(display.frames_shown(), 2);
        assert_eq!(display.poll_key(1).unwrap(), None);
    }
}
