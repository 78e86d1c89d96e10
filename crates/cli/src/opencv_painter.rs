use opencv::core::{Mat, Point, Rect as CvRect, Scalar, CV_8UC3};
use opencv::imgproc;
use opencv::prelude::*;

use facelock_core::rendering::domain::painter::{Painter, Rect, Stroke, TextSize, TextStyle};
use facelock_core::shared::color::Rgb;
use facelock_core::shared::frame::{Frame, PixelOrder, CHANNELS};

const FONT: i32 = imgproc::FONT_HERSHEY_SIMPLEX;

/// Painter using OpenCV's Hershey font and drawing primitives.
///
/// Each drawing call copies the canvas into a `Mat` in its own channel
/// order, draws, and copies the result back. Drawing errors are logged and
/// leave the canvas unchanged.
pub struct OpencvPainter;

impl OpencvPainter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpencvPainter {
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

fn scalar(order: PixelOrder, color: Rgb) -> Scalar {
    let [c0, c1, c2] = color_bytes(order, color);
    Scalar::new(c0 as f64, c1 as f64, c2 as f64, 0.0)
}

fn draw_on(canvas: &mut Frame, draw: impl FnOnce(&mut Mat) -> opencv::Result<()>) {
    if let Err(e) = try_draw_on(canvas, draw) {
        log::warn!("Drawing failed: {e}");
    }
}

fn try_draw_on(
    canvas: &mut Frame,
    draw: impl FnOnce(&mut Mat) -> opencv::Result<()>,
) -> opencv::Result<()> {
    let mut mat = Mat::new_rows_cols_with_default(
        canvas.height() as i32,
        canvas.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(canvas.data());
    draw(&mut mat)?;
    canvas.data_mut().copy_from_slice(mat.data_bytes()?);
    Ok(())
}

impl Painter for OpencvPainter {
    fn measure_text(&self, text: &str, style: TextStyle) -> TextSize {
        let mut baseline = 0;
        match imgproc::get_text_size(text, FONT, style.scale, style.thickness as i32, &mut baseline) {
            Ok(size) => TextSize {
                width: size.width.max(0) as u32,
                height: size.height.max(0) as u32,
            },
            Err(e) => {
                log::warn!("Text measurement failed: {e}");
                TextSize {
                    width: 0,
                    height: 0,
                }
            }
        }
    }

    fn fill(&self, canvas: &mut Frame, color: Rgb) {
        let bytes = color_bytes(canvas.order(), color);
        for px in canvas.data_mut().chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&bytes);
        }
    }

    fn rectangle(&self, canvas: &mut Frame, rect: Rect, color: Rgb, stroke: Stroke) {
        let color = scalar(canvas.order(), color);
        // OpenCV strokes are centered on the edge; inset by half to draw inward
        let (inset, thickness) = match stroke {
            Stroke::Filled => (0, imgproc::FILLED),
            Stroke::Outline(t) => ((t / 2) as i32, t as i32),
        };
        let cv_rect = CvRect::new(
            rect.left + inset,
            rect.top + inset,
            rect.right - rect.left - 2 * inset,
            rect.bottom - rect.top - 2 * inset,
        );
        if cv_rect.width <= 0 || cv_rect.height <= 0 {
            return;
        }
        draw_on(canvas, |mat| {
            imgproc::rectangle(mat, cv_rect, color, thickness, imgproc::LINE_8, 0)
        });
    }

    fn text(&self, canvas: &mut Frame, text: &str, origin: (i32, i32), style: TextStyle, color: Rgb) {
        let color = scalar(canvas.order(), color);
        draw_on(canvas, |mat| {
            imgproc::put_text(
                mat,
                text,
                Point::new(origin.0, origin.1),
                FONT,
                style.scale,
                color,
                style.thickness as i32,
                imgproc::LINE_8,
                false,
            )
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: TextStyle = TextStyle {
        scale: 1.5,
        thickness: 3,
    };

    fn canvas(w: u32, h: u32) -> Frame {
        Frame::filled(w, h, [0, 0, 0])
    }

    #[test]
    fn test_measure_grows_with_text_and_scale() {
        let p = OpencvPainter::new();
        let locked = p.measure_text("LOCKED", STATUS);
        let denied = p.measure_text("ACCESS DENIED", STATUS);
        let small = p.measure_text(
            "LOCKED",
            TextStyle {
                scale: 1.0,
                thickness: 1,
            },
        );

        assert!(locked.width > 0 && locked.height > 0);
        assert!(denied.width > locked.width);
        assert!(small.width < locked.width);
    }

    #[test]
    fn test_rectangle_respects_channel_order() {
        let p = OpencvPainter::new();
        let full = Rect {
            left: 0,
            top: 0,
            right: 4,
            bottom: 4,
        };

        let mut rgb = canvas(4, 4);
        p.rectangle(&mut rgb, full, Rgb::RED, Stroke::Filled);
        assert_eq!(rgb.pixel(2, 2), [255, 0, 0]);

        let mut bgr = Frame::new(vec![0; 48], 4, 4, PixelOrder::Bgr, 0);
        p.rectangle(&mut bgr, full, Rgb::RED, Stroke::Filled);
        assert_eq!(bgr.pixel(2, 2), [0, 0, 255]);
    }

    #[test]
    fn test_outline_draws_inward_border() {
        let p = OpencvPainter::new();
        let mut frame = canvas(20, 20);
        let rect = Rect {
            left: 2,
            top: 2,
            right: 18,
            bottom: 18,
        };
        p.rectangle(&mut frame, rect, Rgb::GREEN, Stroke::Outline(3));

        assert_eq!(frame.pixel(2, 10), [0, 255, 0]);
        assert_eq!(frame.pixel(17, 10), [0, 255, 0]);
        assert_eq!(frame.pixel(10, 10), [0, 0, 0]);
        assert_eq!(frame.pixel(1, 10), [0, 0, 0]);
        assert_eq!(frame.pixel(18, 10), [0, 0, 0]);
    }

    #[test]
    fn test_text_inks_canvas_near_origin() {
        let p = OpencvPainter::new();
        let mut frame = canvas(300, 80);
        p.text(&mut frame, "UNLOCKED", (10, 60), STATUS, Rgb::WHITE);

        let inked: Vec<(u32, u32)> = (0..80)
            .flat_map(|y| (0..300).map(move |x| (x, y)))
            .filter(|&(x, y)| frame.pixel(x, y) != [0, 0, 0])
            .collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|&(x, y)| x >= 5 && y <= 65));
    }

    #[test]
    fn test_drawing_off_canvas_does_not_panic() {
        let p = OpencvPainter::new();
        let mut frame = canvas(10, 10);
        p.text(&mut frame, "LOCKED", (-50, -50), STATUS, Rgb::WHITE);
        let outside = Rect {
            left: 40,
            top: 40,
            right: 60,
            bottom: 60,
        };
        p.rectangle(&mut frame, outside, Rgb::RED, Stroke::Outline(3));
        assert_eq!(frame.pixel(5, 5), [0, 0, 0]);
    }
}
