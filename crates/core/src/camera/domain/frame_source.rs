use crate::shared::frame::Frame;

/// Supplies captured frames at a resolution fixed when the source is built.
///
/// Implementations handle device and decoding details while the access loop
/// works with plain [`Frame`]s. `capture_frame` may fail transiently; the
/// caller decides whether to retry.
pub trait FrameSource: Send {
    /// Opens the device or input. Called once before the first capture.
    fn start(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Returns the next frame.
    fn capture_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Releases the device. Safe to call more than once.
    fn stop(&mut self);
}
