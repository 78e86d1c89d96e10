use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};

use crate::camera::domain::frame_source::FrameSource;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::{Frame, PixelOrder};

/// Replays still images as if they came from a camera.
///
/// `path` may be a single image or a directory; a directory is played back
/// in file-name order and wraps around at the end. Every image is resized
/// to the configured capture resolution when the source starts.
pub struct ImageFileSource {
    path: PathBuf,
    width: u32,
    height: u32,
    frames: Vec<Frame>,
    cursor: usize,
    captured: usize,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            frames: Vec::new(),
            cursor: 0,
            captured: 0,
        }
    }

    /// Number of images loaded by [`FrameSource::start`].
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn decode(&self, path: &Path) -> Result<Frame, Box<dyn std::error::Error>> {
        let mut img = image::open(path)
            .map_err(|e| format!("Failed to read {}: {e}", path.display()))?
            .to_rgb8();
        if img.dimensions() != (self.width, self.height) {
            img = imageops::resize(&img, self.width, self.height, FilterType::Triangle);
        }
        Ok(Frame::new(
            img.into_raw(),
            self.width,
            self.height,
            PixelOrder::Rgb,
            0,
        ))
    }
}

/// Image files directly inside `dir`, sorted by name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image(p))
        .collect();
    paths.sort();
    Ok(paths)
}

pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageFileSource {
    fn start(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if self.width == 0 || self.height == 0 {
            return Err("Capture resolution must be non-zero".into());
        }

        let paths = if self.path.is_dir() {
            list_images(&self.path)?
        } else if self.path.is_file() {
            vec![self.path.clone()]
        } else {
            return Err(format!("{} does not exist", self.path.display()).into());
        };
        if paths.is_empty() {
            return Err(format!("No images found in {}", self.path.display()).into());
        }

        self.frames = paths
            .iter()
            .map(|p| self.decode(p))
            .collect::<Result<Vec<_>, _>>()?;
        self.cursor = 0;
        self.captured = 0;
        log::debug!(
            "Replaying {} image(s) from {} at {}x{}",
            self.frames.len(),
            self.path.display(),
            self.width,
            self.height
        );
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        if self.frames.is_empty() {
            return Err("ImageFileSource: not started".into());
        }
        let frame = self.frames[self.cursor].clone().with_index(self.captured);
        self.cursor = (self.cursor + 1) % self.frames.len();
        self.captured += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_image(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_single_image_is_resized_to_capture_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "a.png", 40, 30, [50, 100, 200]);
        let mut source = ImageFileSource::new(&path, 64, 48);
        source.start().unwrap();

        let frame = source.capture_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));
        assert_eq!(frame.order(), PixelOrder::Rgb);
        assert_eq!(frame.pixel(10, 10), [50, 100, 200]);
    }

    #[test]
    fn test_single_image_repeats_with_increasing_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "a.png", 8, 8, [1, 2, 3]);
        let mut source = ImageFileSource::new(&path, 8, 8);
        source.start().unwrap();

        let indices: Vec<usize> = (0..3).map(|_| source.capture_frame().unwrap().index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_directory_plays_in_name_order_and_wraps() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "b.png", 4, 4, [20, 20, 20]);
        write_image(dir.path(), "a.png", 4, 4, [10, 10, 10]);
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let mut source = ImageFileSource::new(dir.path(), 4, 4);
        source.start().unwrap();
        assert_eq!(source.len(), 2);

        let firsts: Vec<u8> = (0..3)
            .map(|_| source.capture_frame().unwrap().pixel(0, 0)[0])
            .collect();
        assert_eq!(firsts, vec![10, 20, 10]);
    }

    #[test]
    fn test_start_missing_path_fails() {
        let mut source = ImageFileSource::new("/nonexistent/camera.png", 8, 8);
        assert!(source.start().is_err());
    }

    #[test]
    fn test_start_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = ImageFileSource::new(dir.path(), 8, 8);
        assert!(source.start().is_err());
    }

    #[test]
    fn test_capture_before_start_fails() {
        let mut source = ImageFileSource::new("unused.png", 8, 8);
        assert!(source.capture_frame().is_err());
    }

    #[test]
    fn test_stop_releases_frames_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "a.png", 4, 4, [0, 0, 0]);
        let mut source = ImageFileSource::new(&path, 4, 4);
        source.start().unwrap();
        source.stop();
        source.stop();
        assert!(source.is_empty());
        assert!(source.capture_frame().is_err());
    }

    #[test]
    fn test_is_image_ignores_case() {
        assert!(is_image(Path::new("owner.JPG")));
        assert!(is_image(Path::new("frame.png")));
        assert!(!is_image(Path::new("clip.mp4")));
        assert!(!is_image(Path::new("README")));
    }
}
