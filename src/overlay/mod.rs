//! # Frame Overlays
//!
//! Everything drawn on the full-resolution frame: the alignment guides, the
//! detection boxes and the lookup messages. Drawing goes through [`Canvas`],
//! which renders into the frame and keeps a log of what it drew so a frame's
//! annotations can be inspected without looking at pixels.
//!
//! Text origins follow the usual convention of the bottom-left corner of the
//! first character (baseline).

use image::{Rgb, RgbImage};

use crate::detect::Rect;

mod font;

/// Guide color.
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
/// Detection and "found" color.
pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
/// "Not found" color.
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

pub const LINE_THICKNESS: i32 = 2;
pub const LABEL_SCALE: i32 = 2;
pub const HEADLINE_SCALE: i32 = 3;

pub const GUIDE_CAPTION: &str = "Align the barcode inside the blue rectangle";
pub const FOUND_HEADLINE: &str = "PRODUCT FOUND!";
pub const NOT_FOUND_HEADLINE: &str = "ERROR: Product not found!";
pub const ADD_HINT: &str = "Press 'a' to register";

/// One drawing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Line {
        from: (i32, i32),
        to: (i32, i32),
        color: Rgb<u8>,
        thickness: i32,
    },
    Rect {
        rect: Rect,
        color: Rgb<u8>,
        thickness: i32,
    },
    Text {
        text: String,
        origin: (i32, i32),
        scale: i32,
        color: Rgb<u8>,
    },
}

impl Overlay {
    /// Caption of a text overlay.
    pub fn text(&self) -> Option<&str> {
        match self {
            Overlay::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Drawing surface over a frame.
pub struct Canvas<'a> {
    image: &'a mut RgbImage,
    log: Vec<Overlay>,
}

impl<'a> Canvas<'a> {
    pub fn new(image: &'a mut RgbImage) -> Self {
        Self {
            image,
            log: Vec::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.image.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.image.height() as i32
    }

    /// Render `overlay` and record it.
    pub fn draw(&mut self, overlay: Overlay) {
        match &overlay {
            Overlay::Line {
                from,
                to,
                color,
                thickness,
            } => self.render_line(*from, *to, *color, *thickness),
            Overlay::Rect {
                rect,
                color,
                thickness,
            } => {
                let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
                self.render_line((l, t), (r, t), *color, *thickness);
                self.render_line((r, t), (r, b), *color, *thickness);
                self.render_line((r, b), (l, b), *color, *thickness);
                self.render_line((l, b), (l, t), *color, *thickness);
            }
            Overlay::Text {
                text,
                origin,
                scale,
                color,
            } => self.render_text(text, *origin, *scale, *color),
        }
        self.log.push(overlay);
    }

    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb<u8>) {
        self.draw(Overlay::Line {
            from,
            to,
            color,
            thickness: LINE_THICKNESS,
        });
    }

    pub fn rect(&mut self, rect: Rect, color: Rgb<u8>) {
        self.draw(Overlay::Rect {
            rect,
            color,
            thickness: LINE_THICKNESS,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, origin: (i32, i32), scale: i32, color: Rgb<u8>) {
        self.draw(Overlay::Text {
            text: text.into(),
            origin,
            scale,
            color,
        });
    }

    /// Everything drawn so far, in order.
    pub fn overlays(&self) -> &[Overlay] {
        &self.log
    }

    pub fn into_overlays(self) -> Vec<Overlay> {
        self.log
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && x < self.width() && y < self.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn block(&mut self, x: i32, y: i32, size: i32, color: Rgb<u8>) {
        let half = size / 2;
        for dy in 0..size.max(1) {
            for dx in 0..size.max(1) {
                self.put(x - half + dx, y - half + dy, color);
            }
        }
    }

    // Bresenham with a square brush.
    fn render_line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb<u8>, thickness: i32) {
        let (mut x, mut y) = from;
        let dx = (to.0 - x).abs();
        let dy = -(to.1 - y).abs();
        let sx = if x < to.0 { 1 } else { -1 };
        let sy = if y < to.1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.block(x, y, thickness, color);
            if x == to.0 && y == to.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn render_text(&mut self, text: &str, origin: (i32, i32), scale: i32, color: Rgb<u8>) {
        let scale = scale.max(1);
        let top = origin.1 - font::GLYPH_H * scale;
        let mut x = origin.0;
        for ch in font::normalize(text) {
            if let Some(rows) = font::glyph_bits(ch) {
                for (row, bits) in rows.iter().enumerate() {
                    for col in 0..font::GLYPH_W {
                        if (bits >> (font::GLYPH_W - 1 - col)) & 1 == 1 {
                            for sy in 0..scale {
                                for sx in 0..scale {
                                    self.put(
                                        x + col * scale + sx,
                                        top + row as i32 * scale + sy,
                                        color,
                                    );
                                }
                            }
                        }
                    }
                }
            }
            x += font::ADVANCE * scale;
        }
    }
}

/// Center cross-lines, a centered guide rectangle (a third of the width, a
/// quarter of the height) and the alignment caption.
pub fn draw_guides(canvas: &mut Canvas<'_>) {
    let (w, h) = (canvas.width(), canvas.height());
    canvas.line((0, h / 2), (w, h / 2), BLUE);
    canvas.line((w / 2, 0), (w / 2, h), BLUE);

    let (rw, rh) = (w / 3, h / 4);
    canvas.rect(Rect::new((w - rw) / 2, (h - rh) / 2, rw, rh), BLUE);
    canvas.text(GUIDE_CAPTION, (10, h - 20), LABEL_SCALE, BLUE);
}

/// Detection box with its `"<FORMAT>: <text>"` label above it.
pub fn draw_detection(canvas: &mut Canvas<'_>, rect: Rect, format: &str, text: &str) {
    canvas.rect(rect, GREEN);
    canvas.text(
        format!("{}: {}", format, text),
        (rect.x, rect.y - 10),
        LABEL_SCALE,
        GREEN,
    );
}

/// "Found" headline and the product name, cut to `name_budget` characters.
pub fn draw_found(canvas: &mut Canvas<'_>, rect: Rect, name: &str, name_budget: usize) {
    canvas.text(FOUND_HEADLINE, (rect.x, rect.bottom() + 30), HEADLINE_SCALE, GREEN);
    canvas.text(
        truncate_chars(name, name_budget),
        (rect.x, rect.bottom() + 60),
        LABEL_SCALE,
        GREEN,
    );
}

/// "Not found" headline, the raw code and the add-product hint.
pub fn draw_not_found(canvas: &mut Canvas<'_>, rect: Rect, code: &str) {
    canvas.text(NOT_FOUND_HEADLINE, (rect.x, rect.bottom() + 30), HEADLINE_SCALE, RED);
    canvas.text(
        format!("Code: {}", code),
        (rect.x, rect.bottom() + 60),
        LABEL_SCALE,
        RED,
    );
    canvas.text(ADD_HINT, (rect.x, rect.bottom() + 90), LABEL_SCALE, RED);
}

/// First `budget` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guides_follow_frame_geometry() {
        let mut frame = RgbImage::new(300, 200);
        let mut canvas = Canvas::new(&mut frame);
        draw_guides(&mut canvas);

        let overlays = canvas.into_overlays();
        assert_eq!(overlays.len(), 4);
        assert_eq!(
            overlays[2],
            Overlay::Rect {
                rect: Rect::new(100, 75, 100, 50),
                color: BLUE,
                thickness: LINE_THICKNESS,
            }
        );
        assert_eq!(overlays[3].text(), Some(GUIDE_CAPTION));

        assert_eq!(*frame.get_pixel(0, 100), BLUE);
        assert_eq!(*frame.get_pixel(150, 0), BLUE);
        assert_eq!(*frame.get_pixel(5, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn drawing_outside_the_frame_is_clipped() {
        let mut frame = RgbImage::new(10, 10);
        let mut canvas = Canvas::new(&mut frame);
        canvas.rect(Rect::new(-20, -20, 100, 100), GREEN);
        canvas.text("ERROR", (-3, 2), LABEL_SCALE, RED);
        assert_eq!(canvas.overlays().len(), 2);
    }

    #[test]
    fn found_name_is_truncated() {
        let mut frame = RgbImage::new(640, 480);
        let mut canvas = Canvas::new(&mut frame);
        let name = "Odorizador de ambiente aerossol brisa cítrica de verão Glade";
        draw_found(&mut canvas, Rect::new(10, 10, 100, 40), name, 30);

        let texts: Vec<&str> = canvas.overlays().iter().filter_map(Overlay::text).collect();
        assert_eq!(texts, [FOUND_HEADLINE, "Odorizador de ambiente aerosso"]);
    }

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("verão", 4), "verã");
        assert_eq!(truncate_chars("abc", 30), "abc");
    }

    #[test]
    fn text_is_drawn_above_the_baseline() {
        let mut frame = RgbImage::new(40, 40);
        let mut canvas = Canvas::new(&mut frame);
        canvas.text("I", (0, 20), 1, RED);
        // Top row of 'I' is 0b01110, starting 7 rows above the baseline.
        assert_eq!(*frame.get_pixel(1, 13), RED);
        assert_eq!(*frame.get_pixel(0, 13), Rgb([0, 0, 0]));
        assert_eq!(*frame.get_pixel(1, 20), Rgb([0, 0, 0]));
    }
}
