//! Native window through `minifb`, no system libraries needed at build time.
//!
//! `minifb` takes 0RGB `u32` pixels and reports key presses collected while it
//! pumps window events, which happens on every [`Display::show`].

use std::thread;
use std::time::Duration;

use image::RgbImage;
use minifb::{KeyRepeat, Window, WindowOptions};
use tracing::debug;

use crate::display::{Display, Key};
use crate::error::{ScanError, ScanResult};

fn window_err(operation: &str, err: minifb::Error) -> ScanError {
    ScanError::display(operation, err.to_string())
        .with_recovery_suggestion("Run with --headless when no desktop session is available")
}

/// Pack RGB pixels into the 0RGB words `minifb` expects.
pub fn pack_rgb(frame: &RgbImage, buffer: &mut Vec<u32>) {
    buffer.clear();
    buffer.extend(
        frame
            .pixels()
            .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2])),
    );
}

/// Key reported for one poll. A closed window quits; otherwise the first
/// `q` or `a` pressed wins and anything else is ignored.
pub fn key_from_window(pressed: &[minifb::Key], open: bool) -> Option<Key> {
    if !open {
        return Some(Key::Quit);
    }
    pressed.iter().find_map(|key| match key {
        minifb::Key::Q => Some(Key::Quit),
        minifb::Key::A => Some(Key::AddProduct),
        _ => None,
    })
}

/// Window sized to the frame; recreated when the frame size or title changes.
#[derive(Default)]
pub struct WindowDisplay {
    window: Option<Window>,
    title: String,
    size: (usize, usize),
    buffer: Vec<u32>,
    pressed: Vec<minifb::Key>,
}

impl WindowDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn window_for(&mut self, title: &str, width: usize, height: usize) -> ScanResult<&mut Window> {
        let stale = self.title != title || self.size != (width, height);
        if stale || self.window.is_none() {
            let mut window = Window::new(title, width, height, WindowOptions::default())
                .map_err(|e| window_err("create window", e))?;
            // Pacing comes from the source and the key wait.
            window.set_target_fps(0);
            debug!(title, width, height, "window created");
            self.title = title.to_string();
            self.size = (width, height);
            self.window = Some(window);
        }
        self.window
            .as_mut()
            .ok_or_else(|| ScanError::display("create window", "window missing"))
    }
}

impl Display for WindowDisplay {
    fn show(&mut self, title: &str, frame: &RgbImage) -> ScanResult<()> {
        let (width, height) = (frame.width() as usize, frame.height() as usize);
        let mut buffer = std::mem::take(&mut self.buffer);
        pack_rgb(frame, &mut buffer);

        let window = self.window_for(title, width, height)?;
        let result = window.update_with_buffer(&buffer, width, height);
        let pressed = window.get_keys_pressed(KeyRepeat::No);
        self.buffer = buffer;
        result.map_err(|e| window_err("update window", e))?;
        self.pressed.extend(pressed);
        Ok(())
    }

    fn poll_key(&mut self, wait_ms: u32) -> ScanResult<Option<Key>> {
        // Presses are collected while `show` pumps events, so waiting only paces the loop.
        thread::sleep(Duration::from_millis(u64::from(wait_ms)));
        let open = self.window.as_ref().is_none_or(Window::is_open);
        let key = key_from_window(&self.pressed, open);
        self.pressed.clear();
        Ok(key)
    }

    fn close(&mut self) {
        if self.window.take().is_some() {
            debug!(title = %self.title, "window closed");
        }
        self.pressed.clear();
    }
}
