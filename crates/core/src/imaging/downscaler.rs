use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::shared::frame::Frame;

/// Produces reduced-resolution copies of captured frames for analysis.
///
/// Both axes shrink by the same factor; output dimensions are
/// `round(dim * factor)`, never below one pixel. The factor is kept so
/// regions found on the small copy can be mapped back with
/// [`Downscaler::inverse_factor`].
#[derive(Clone, Copy, Debug)]
pub struct Downscaler {
    factor: f64,
}

impl Downscaler {
    pub fn new(factor: f64) -> Result<Self, &'static str> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err("downscale factor must be in (0, 1]");
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn inverse_factor(&self) -> f64 {
        1.0 / self.factor
    }

    pub fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = |d: u32| ((d as f64 * self.factor).round() as u32).max(1);
        (scale(width), scale(height))
    }

    pub fn downscale(&self, frame: &Frame) -> Result<Frame, Box<dyn std::error::Error>> {
        let (w, h) = self.target_size(frame.width(), frame.height());
        if (w, h) == (frame.width(), frame.height()) {
            return Ok(frame.clone());
        }

        // Channel order is irrelevant to resampling, so BGR data passes
        // through an RgbImage untouched.
        let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to wrap frame data for resizing")?;
        let small = imageops::resize(&img, w, h, FilterType::Triangle);

        Ok(Frame::new(
            small.into_raw(),
            w,
            h,
            frame.order(),
            frame.index(),
        ))
    }
}
