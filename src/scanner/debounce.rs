/// Scan-event suppression measured in frames.
///
/// A decoded code fires an event only when no window is running. While a window
/// runs, the code that opened it and every other code are suppressed; once it
/// runs out, a code held in front of the camera fires again. The last fired
/// code outlives the window since the add-product key acts on it.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: u32,
    cooldown: u32,
    last: Option<String>,
}

impl Debouncer {
    pub fn new(window: u32) -> Self {
        Self {
            window,
            cooldown: 0,
            last: None,
        }
    }

    /// Returns true and opens a new window when `code` is a new scan event.
    pub fn should_fire(&mut self, code: &str) -> bool {
        if self.cooldown > 0 {
            return false;
        }
        self.cooldown = self.window;
        self.last = Some(code.to_string());
        true
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    /// Last code that fired an event.
    pub fn last_code(&self) -> Option<&str> {
        self.last.as_deref()
    }
}
