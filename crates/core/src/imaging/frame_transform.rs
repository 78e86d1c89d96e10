//! In-place pixel transforms applied to every captured frame.

use crate::shared::frame::{Frame, PixelOrder, CHANNELS};

/// Flips a frame left-to-right so the camera view behaves like a mirror.
pub fn mirror_horizontal(frame: &mut Frame) {
    let w = frame.width() as usize;
    let row_len = w * CHANNELS;
    for row in frame.data_mut().chunks_exact_mut(row_len) {
        for x in 0..w / 2 {
            let a = x * CHANNELS;
            let b = (w - 1 - x) * CHANNELS;
            for c in 0..CHANNELS {
                row.swap(a + c, b + c);
            }
        }
    }
}

/// Returns the frame with its channels in RGB order, swapping red and blue
/// when the source delivered BGR.
pub fn into_rgb(frame: Frame) -> Frame {
    if frame.order() == PixelOrder::Rgb {
        return frame;
    }
    let (w, h, index) = (frame.width(), frame.height(), frame.index());
    let mut data = frame.into_data();
    for px in data.chunks_exact_mut(CHANNELS) {
        px.swap(0, 2);
    }
    Frame::new(data, w, h, PixelOrder::Rgb, index)
}
