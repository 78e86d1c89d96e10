use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::display::domain::display::Display;
use crate::rendering::domain::decision_renderer::RenderedSurfaces;

/// A display without windows.
///
/// Surfaces are counted and dropped. Quit is requested once the shared stop
/// flag is raised (typically from a Ctrl-C handler) or after `max_cycles`
/// presentations.
pub struct HeadlessDisplay {
    stop: Arc<AtomicBool>,
    max_cycles: Option<u64>,
    presented: u64,
}

impl HeadlessDisplay {
    pub fn new(stop: Arc<AtomicBool>, max_cycles: Option<u64>) -> Self {
        Self {
            stop,
            max_cycles,
            presented: 0,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Display for HeadlessDisplay {
    fn present(&mut self, surfaces: &RenderedSurfaces) -> Result<(), Box<dyn std::error::Error>> {
        self.presented += 1;
        log::trace!(
            "Cycle {}: status {}x{}, camera {}x{}",
            self.presented,
            surfaces.status_panel.width(),
            surfaces.status_panel.height(),
            surfaces.camera_view.width(),
            surfaces.camera_view.height()
        );
        Ok(())
    }

    fn quit_requested(&mut self) -> bool {
        if self.stop.load(Ordering::SeqCst) {
            return true;
        }
        self.max_cycles.is_some_and(|max| self.presented >= max)
    }

    fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;

    fn surfaces() -> RenderedSurfaces {
        RenderedSurfaces {
            status_panel: Frame::filled(4, 4, [0, 0, 0]),
            camera_view: Frame::filled(8, 8, [0, 0, 0]),
        }
    }

    #[test]
    fn test_runs_until_flag_without_cap() {
        let stop = Arc::new(AtomicBool::new(false));
        let mut display = HeadlessDisplay::new(stop.clone(), None);
        for _ in 0..5 {
            display.present(&surfaces()).unwrap();
            assert!(!display.quit_requested());
        }
        stop.store(true, Ordering::SeqCst);
        assert!(display.quit_requested());
    }

    #[test]
    fn test_quits_after_cycle_cap() {
        let mut display = HeadlessDisplay::new(Arc::new(AtomicBool::new(false)), Some(2));
        display.present(&surfaces()).unwrap();
        assert!(!display.quit_requested());
        display.present(&surfaces()).unwrap();
        assert!(display.quit_requested());
        assert_eq!(display.presented(), 2);
    }

    #[test]
    fn test_raised_flag_wins_before_any_cycle() {
        let mut display = HeadlessDisplay::new(Arc::new(AtomicBool::new(true)), Some(10));
        assert!(display.quit_requested());
    }
}
