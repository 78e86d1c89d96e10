use std::path::Path;

use crate::shared::frame::Frame;

/// Reads a still image into an RGB [`Frame`].
pub trait ImageLoader: Send {
    fn load(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>>;
}
