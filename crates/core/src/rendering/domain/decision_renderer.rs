use crate::access::domain::verdict::{AccessState, Verdict};
use crate::shared::color::Rgb;
use crate::shared::constants::{DEFAULT_PANEL_HEIGHT, DEFAULT_PANEL_WIDTH};
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

use super::painter::{Painter, Rect, Stroke, TextSize, TextStyle};
use super::status_appearance::{region_color, StatusAppearance};

const STATUS_TEXT: TextStyle = TextStyle {
    scale: 1.5,
    thickness: 3,
};
const LABEL_TEXT: TextStyle = TextStyle {
    scale: 1.0,
    thickness: 1,
};

const BOX_THICKNESS: u32 = 3;
/// Height of the filled band holding a face label.
const LABEL_BAND_HEIGHT: i32 = 35;
/// Label offset from the band's left and bottom edges.
const LABEL_INSET: i32 = 6;

/// The two surfaces shown each cycle.
#[derive(Clone, Debug)]
pub struct RenderedSurfaces {
    pub status_panel: Frame,
    pub camera_view: Frame,
}

/// Turns a verdict into the status panel and the annotated camera view.
pub struct DecisionRenderer {
    painter: Box<dyn Painter>,
    panel_width: u32,
    panel_height: u32,
}

impl DecisionRenderer {
    pub fn new(painter: Box<dyn Painter>, panel_width: u32, panel_height: u32) -> Self {
        Self {
            painter,
            panel_width,
            panel_height,
        }
    }

    pub fn with_default_panel(painter: Box<dyn Painter>) -> Self {
        Self::new(painter, DEFAULT_PANEL_WIDTH, DEFAULT_PANEL_HEIGHT)
    }

    /// Renders both surfaces.
    ///
    /// `frame` is the mirrored full-resolution capture and `regions` the
    /// cycle's faces already rescaled to its coordinates.
    pub fn render(&self, verdict: &Verdict, mut frame: Frame, regions: &[FaceRegion]) -> RenderedSurfaces {
        self.annotate(&mut frame, verdict, regions);
        RenderedSurfaces {
            status_panel: self.status_panel(verdict.state),
            camera_view: frame,
        }
    }

    /// Solid panel in the state's color with its label centered on it.
    pub fn status_panel(&self, state: AccessState) -> Frame {
        let appearance = StatusAppearance::for_state(state);
        let mut panel = Frame::filled(self.panel_width, self.panel_height, [0, 0, 0]);
        self.painter.fill(&mut panel, appearance.panel);

        let size = self.painter.measure_text(appearance.label, STATUS_TEXT);
        let origin = centered_origin(size, self.panel_width, self.panel_height);
        self.painter
            .text(&mut panel, appearance.label, origin, STATUS_TEXT, appearance.text);
        panel
    }

    /// Draws a box, label band and label for every region.
    ///
    /// Color and label come from the overall verdict, so every face in the
    /// cycle is drawn the same way.
    pub fn annotate(&self, frame: &mut Frame, verdict: &Verdict, regions: &[FaceRegion]) {
        let color = region_color(verdict.is_match());
        let label = verdict.region_label();

        for region in regions {
            self.painter
                .rectangle(frame, Rect::from(*region), color, Stroke::Outline(BOX_THICKNESS));

            let band = Rect {
                left: region.left,
                top: region.bottom - LABEL_BAND_HEIGHT,
                right: region.right,
                bottom: region.bottom,
            };
            self.painter.rectangle(frame, band, color, Stroke::Filled);

            let origin = (region.left + LABEL_INSET, region.bottom - LABEL_INSET);
            self.painter.text(frame, label, origin, LABEL_TEXT, Rgb::WHITE);
        }
    }
}

/// Bottom-left text origin that centers a box of `size` on the canvas.
pub fn centered_origin(size: TextSize, canvas_width: u32, canvas_height: u32) -> (i32, i32) {
    let x = (canvas_width as i32 - size.width as i32) / 2;
    let y = (canvas_height as i32 + size.height as i32) / 2;
    (x, y)
}
