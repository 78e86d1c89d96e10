use std::path::Path;

use crate::enrollment::domain::image_loader::ImageLoader;
use crate::shared::frame::{Frame, PixelOrder};

/// Decodes enrollment photos with the `image` crate.
///
/// Any format the crate recognises is accepted; alpha and grayscale inputs
/// are converted to 8-bit RGB.
pub struct ImageFileLoader;

impl ImageFileLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader for ImageFileLoader {
    fn load(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let img = image::open(path)?.to_rgb8();
        let (width, height) = img.dimensions();
        Ok(Frame::new(img.into_raw(), width, height, PixelOrder::Rgb, 0))
    }
}
