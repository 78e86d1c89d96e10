use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;

use facelock_core::display::domain::display::Display;
use facelock_core::rendering::domain::decision_renderer::RenderedSurfaces;
use facelock_core::shared::constants::{CAMERA_WINDOW, STATUS_WINDOW};
use facelock_core::shared::frame::{Frame, PixelOrder, CHANNELS};

/// Shows the status panel and camera view in two HighGUI windows.
///
/// Quit is polled with a 1 ms key wait after every presented cycle.
pub struct OpencvDisplay {
    quit_key: char,
    max_cycles: Option<u64>,
    presented: u64,
}

impl OpencvDisplay {
    pub fn new(quit_key: char, max_cycles: Option<u64>) -> Self {
        Self {
            quit_key,
            max_cycles,
            presented: 0,
        }
    }
}

/// Copies a frame into a BGR `Mat`, swapping channels if it is RGB.
fn to_bgr_mat(frame: &Frame) -> opencv::Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    let dst = mat.data_bytes_mut()?;
    dst.copy_from_slice(frame.data());
    if frame.order() == PixelOrder::Rgb {
        for px in dst.chunks_exact_mut(CHANNELS) {
            px.swap(0, 2);
        }
    }
    Ok(mat)
}

impl Display for OpencvDisplay {
    fn present(&mut self, surfaces: &RenderedSurfaces) -> Result<(), Box<dyn std::error::Error>> {
        highgui::imshow(STATUS_WINDOW, &to_bgr_mat(&surfaces.status_panel)?)?;
        highgui::imshow(CAMERA_WINDOW, &to_bgr_mat(&surfaces.camera_view)?)?;
        self.presented += 1;
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        if self.max_cycles.is_some_and(|max| self.presented >= max) {
            return true;
        }
        match highgui::wait_key(1) {
            Ok(key) => key >= 0 && (key & 0xFF) == self.quit_key as i32,
            Err(e) => {
                log::warn!("Key poll failed: {e}");
                false
            }
        }
    }

    fn close(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            log::debug!("Failed to close windows: {e}");
        }
    }
}
