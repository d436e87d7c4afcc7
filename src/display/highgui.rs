//! OpenCV highgui window.

use image::RgbImage;
use opencv::{
    core::{CV_8UC3, Mat, Scalar},
    highgui,
    prelude::*,
};

use crate::display::{Display, Key};
use crate::error::{ScanError, ScanResult};

fn cv_err(operation: &str, err: opencv::Error) -> ScanError {
    ScanError::display(operation, err.to_string())
}

#[derive(Debug, Default)]
pub struct HighGuiDisplay {
    open: bool,
}

impl HighGuiDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for HighGuiDisplay {
    fn show(&mut self, title: &str, frame: &RgbImage) -> ScanResult<()> {
        let mut mat = Mat::new_rows_cols_with_default(
            frame.height() as i32,
            frame.width() as i32,
            CV_8UC3,
            Scalar::all(0.0),
        )
        .map_err(|e| cv_err("allocate", e))?;

        // highgui expects BGR.
        let dst = mat.data_bytes_mut().map_err(|e| cv_err("allocate", e))?;
        for (d, s) in dst.chunks_exact_mut(3).zip(frame.pixels()) {
            d[0] = s[2];
            d[1] = s[1];
            d[2] = s[0];
        }

        highgui::imshow(title, &mat).map_err(|e| cv_err("imshow", e))?;
        self.open = true;
        Ok(())
    }

    fn poll_key(&mut self, wait_ms: u32) -> ScanResult<Option<Key>> {
        let code = highgui::wait_key(wait_ms as i32).map_err(|e| cv_err("wait_key", e))?;
        if code < 0 {
            return Ok(None);
        }
        Ok(Some(Key::from_code(code)))
    }

    fn close(&mut self) {
        if self.open {
            let _ = highgui::destroy_all_windows();
            self.open = false;
        }
    }
}
