use crate::rendering::domain::painter::{Painter, Rect, Stroke, TextSize, TextStyle};
use crate::shared::color::Rgb;
use crate::shared::frame::{Frame, PixelOrder, CHANNELS};

use super::bitmap_font::{self, ADVANCE, GLYPH_HEIGHT};

/// Screen pixels per font dot at `scale == 1.0`.
const DOTS_PER_SCALE: f64 = 4.0;

/// CPU painter drawing straight into frame bytes.
///
/// Text uses the built-in 5×7 block font, each dot rendered as a square
/// whose side grows with the text scale.
pub struct BitmapPainter;

impl BitmapPainter {
    pub fn new() -> Self {
        Self
    }

    fn dot_size(style: TextStyle) -> u32 {
        (style.scale * DOTS_PER_SCALE).round().max(1.0) as u32
    }
}

impl Default for BitmapPainter {
    fn default() -> Self {
        Self::new()
    }
}

fn color_bytes(order: PixelOrder, color: Rgb) -> [u8; 3] {
    match order {
        PixelOrder::Rgb => color.to_array(),
        PixelOrder::Bgr => [color.2, color.1, color.0],
    }
}

/// Paints the intersection of `rect` and the canvas.
fn fill_rect(canvas: &mut Frame, rect: Rect, bytes: [u8; 3]) {
    let w = canvas.width() as i32;
    let h = canvas.height() as i32;
    let x1 = rect.left.clamp(0, w) as usize;
    let x2 = rect.right.clamp(0, w) as usize;
    let y1 = rect.top.clamp(0, h) as usize;
    let y2 = rect.bottom.clamp(0, h) as usize;
    if x2 <= x1 || y2 <= y1 {
        return;
    }

    let stride = w as usize * CHANNELS;
    let data = canvas.data_mut();
    for row in y1..y2 {
        let start = row * stride + x1 * CHANNELS;
        let end = row * stride + x2 * CHANNELS;
        for px in data[start..end].chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&bytes);
        }
    }
}

impl Painter for BitmapPainter {
    fn measure_text(&self, text: &str, style: TextStyle) -> TextSize {
        let dot = Self::dot_size(style);
        let chars = text.chars().count() as u32;
        // No trailing gap after the last glyph
        let width = if chars == 0 {
            0
        } else {
            chars * ADVANCE * dot - dot
        };
        TextSize {
            width,
            height: GLYPH_HEIGHT * dot,
        }
    }

    fn fill(&self, canvas: &mut Frame, color: Rgb) {
        let bytes = color_bytes(canvas.order(), color);
        for px in canvas.data_mut().chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&bytes);
        }
    }

    fn rectangle(&self, canvas: &mut Frame, rect: Rect, color: Rgb, stroke: Stroke) {
        let bytes = color_bytes(canvas.order(), color);
        match stroke {
            Stroke::Filled => fill_rect(canvas, rect, bytes),
            Stroke::Outline(thickness) => {
                let t = thickness as i32;
                let edges = [
                    Rect {
                        bottom: (rect.top + t).min(rect.bottom),
                        ..rect
                    },
                    Rect {
                        top: (rect.bottom - t).max(rect.top),
                        ..rect
                    },
                    Rect {
                        right: (rect.left + t).min(rect.right),
                        ..rect
                    },
                    Rect {
                        left: (rect.right - t).max(rect.left),
                        ..rect
                    },
                ];
                for edge in edges {
                    fill_rect(canvas, edge, bytes);
                }
            }
        }
    }

    fn text(&self, canvas: &mut Frame, text: &str, origin: (i32, i32), style: TextStyle, color: Rgb) {
        let bytes = color_bytes(canvas.order(), color);
        let dot = Self::dot_size(style) as i32;
        let (x0, baseline) = origin;
        let top = baseline - GLYPH_HEIGHT as i32 * dot;

        for (i, c) in text.chars().enumerate() {
            let glyph = bitmap_font::glyph(c);
            let glyph_x = x0 + i as i32 * ADVANCE as i32 * dot;
            for row in 0..GLYPH_HEIGHT {
                for col in 0..bitmap_font::GLYPH_WIDTH {
                    if !bitmap_font::is_set(&glyph, col, row) {
                        continue;
                    }
                    let left = glyph_x + col as i32 * dot;
                    let y = top + row as i32 * dot;
                    let block = Rect {
                        left,
                        top: y,
                        right: left + dot,
                        bottom: y + dot,
                    };
                    fill_rect(canvas, block, bytes);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(scale: f64) -> TextStyle {
        TextStyle {
            scale,
            thickness: 1,
        }
    }

    fn canvas(w: u32, h: u32) -> Frame {
        Frame::filled(w, h, [0, 0, 0])
    }

    #[test]
    fn test_measure_scales_with_style() {
        let p = BitmapPainter::new();
        let small = p.measure_text("LOCKED", style(1.0));
        let large = p.measure_text("LOCKED", style(1.5));
        // 6 glyphs × 6 dots − 1 trailing dot; 4px and 6px dots
        assert_eq!(small, TextSize { width: 140, height: 28 });
        assert_eq!(large, TextSize { width: 210, height: 42 });
    }

    #[test]
    fn test_measure_longer_label_is_wider() {
        let p = BitmapPainter::new();
        let style = style(1.5);
        assert!(p.measure_text("ACCESS DENIED", style).width > p.measure_text("LOCKED", style).width);
        assert_eq!(p.measure_text("", style).width, 0);
    }

    #[test]
    fn test_thickness_does_not_change_block_font_metrics() {
        let p = BitmapPainter::new();
        let heavy = TextStyle {
            scale: 1.5,
            thickness: 3,
        };
        assert_eq!(p.measure_text("LOCKED", heavy), p.measure_text("LOCKED", style(1.5)));
    }

    #[test]
    fn test_fill_respects_channel_order() {
        let p = BitmapPainter::new();
        let mut rgb = canvas(2, 2);
        p.fill(&mut rgb, Rgb::RED);
        assert_eq!(rgb.pixel(1, 1), [255, 0, 0]);

        let mut bgr = Frame::new(vec![0; 12], 2, 2, PixelOrder::Bgr, 0);
        p.fill(&mut bgr, Rgb::RED);
        assert_eq!(bgr.pixel(1, 1), [0, 0, 255]);
    }

    #[test]
    fn test_outline_draws_border_only() {
        let p = BitmapPainter::new();
        let mut frame = canvas(20, 20);
        let rect = Rect {
            left: 2,
            top: 2,
            right: 18,
            bottom: 18,
        };
        p.rectangle(&mut frame, rect, Rgb::GREEN, Stroke::Outline(3));

        assert_eq!(frame.pixel(2, 2), [0, 255, 0]);
        assert_eq!(frame.pixel(4, 10), [0, 255, 0]);
        assert_eq!(frame.pixel(17, 17), [0, 255, 0]);
        assert_eq!(frame.pixel(5, 5), [0, 0, 0]);
        assert_eq!(frame.pixel(10, 10), [0, 0, 0]);
        assert_eq!(frame.pixel(1, 1), [0, 0, 0]);
        assert_eq!(frame.pixel(18, 18), [0, 0, 0]);
    }

    #[test]
    fn test_filled_rect_clips_to_canvas() {
        let p = BitmapPainter::new();
        let mut frame = canvas(10, 10);
        let rect = Rect {
            left: -5,
            top: 8,
            right: 4,
            bottom: 30,
        };
        p.rectangle(&mut frame, rect, Rgb::WHITE, Stroke::Filled);
        assert_eq!(frame.pixel(0, 9), [255, 255, 255]);
        assert_eq!(frame.pixel(3, 8), [255, 255, 255]);
        assert_eq!(frame.pixel(4, 8), [0, 0, 0]);
        assert_eq!(frame.pixel(0, 7), [0, 0, 0]);
    }

    #[test]
    fn test_text_stays_inside_measured_box() {
        let p = BitmapPainter::new();
        let style = style(1.0);
        let mut frame = canvas(200, 60);
        let origin = (10, 40);
        p.text(&mut frame, "UNKNOWN", origin, style, Rgb::WHITE);

        let size = p.measure_text("UNKNOWN", style);
        let (x1, y1) = (10, 40 - size.height);
        let (x2, y2) = (10 + size.width, 40);
        let mut inked = 0;
        for y in 0..60 {
            for x in 0..200 {
                if frame.pixel(x, y) == [255, 255, 255] {
                    inked += 1;
                    assert!(x >= x1 && x < x2 && y >= y1 && y < y2, "ink at ({x}, {y})");
                }
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn test_text_off_canvas_does_not_panic() {
        let p = BitmapPainter::new();
        let mut frame = canvas(10, 10);
        p.text(&mut frame, "LOCKED", (-50, -50), style(2.0), Rgb::WHITE);
        p.text(&mut frame, "LOCKED", (500, 500), style(2.0), Rgb::WHITE);
    }
}
