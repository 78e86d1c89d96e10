use crate::rendering::domain::decision_renderer::RenderedSurfaces;

/// Shows the two per-cycle surfaces and reports when the operator wants out.
///
/// The access loop knows nothing about windows or keyboards; it presents
/// each cycle's surfaces and then polls [`Display::quit_requested`] once.
pub trait Display: Send {
    fn present(&mut self, surfaces: &RenderedSurfaces) -> Result<(), Box<dyn std::error::Error>>;

    /// Polls for the quit signal. May block briefly, e.g. for a key press.
    fn quit_requested(&mut self) -> bool;

    /// Tears down any windows. Safe to call more than once.
    fn close(&mut self);
}
