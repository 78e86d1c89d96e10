use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use facelock_core::camera::domain::frame_source::FrameSource;
use facelock_core::shared::frame::{Frame, PixelOrder};

/// Captures BGR frames from a camera through OpenCV's `VideoCapture`.
///
/// The requested resolution is a hint to the driver; frames that arrive at
/// another size are resized so the loop always sees the configured one.
pub struct OpencvCameraSource {
    index: i32,
    width: u32,
    height: u32,
    capture: Option<VideoCapture>,
    frame_index: usize,
}

impl OpencvCameraSource {
    pub fn new(index: i32, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
            capture: None,
            frame_index: 0,
        }
    }
}

impl FrameSource for OpencvCameraSource {
    fn start(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut capture = VideoCapture::new(self.index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(format!("Cannot open camera {}", self.index).into());
        }
        capture.set(videoio::CAP_PROP_FRAME_WIDTH, self.width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, self.height as f64)?;
        log::debug!(
            "Camera {} opened at {}x{}",
            self.index,
            capture.get(videoio::CAP_PROP_FRAME_WIDTH)?,
            capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?
        );
        self.capture = Some(capture);
        self.frame_index = 0;
        Ok(())
    }

    fn capture_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let capture = self
            .capture
            .as_mut()
            .ok_or("OpencvCameraSource: not started")?;

        let mut mat = Mat::default();
        if !capture.read(&mut mat)? || mat.empty() {
            return Err("Camera returned no frame".into());
        }

        let target = Size::new(self.width as i32, self.height as i32);
        if mat.size()? != target {
            let mut resized = Mat::default();
            imgproc::resize(&mat, &mut resized, target, 0.0, 0.0, imgproc::INTER_LINEAR)?;
            mat = resized;
        }
        if !mat.is_continuous() {
            mat = mat.try_clone()?;
        }

        let frame = Frame::new(
            mat.data_bytes()?.to_vec(),
            self.width,
            self.height,
            PixelOrder::Bgr,
            self.frame_index,
        );
        self.frame_index += 1;
        Ok(frame)
    }

    fn stop(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::debug!("Failed to release camera: {e}");
            }
        }
    }
}
