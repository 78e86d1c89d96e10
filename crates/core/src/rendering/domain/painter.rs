use crate::shared::color::Rgb;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

/// Pixel rectangle with exclusive `right`/`bottom` edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl From<FaceRegion> for Rect {
    fn from(r: FaceRegion) -> Self {
        Self {
            left: r.left,
            top: r.top,
            right: r.right,
            bottom: r.bottom,
        }
    }
}

/// Font scale and stroke thickness. Painters with a fixed-weight font may
/// ignore the thickness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub scale: f64,
    pub thickness: u32,
}

/// Measured extent of a rendered string, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stroke {
    /// Outline of the given thickness, drawn inward from the edges.
    Outline(u32),
    Filled,
}

/// Domain interface for the drawing primitives the renderer needs.
///
/// Colors are given as RGB; implementations honor the canvas frame's
/// channel order. Text origins are the bottom-left corner of the text box.
pub trait Painter: Send {
    fn measure_text(&self, text: &str, style: TextStyle) -> TextSize;

    fn fill(&self, canvas: &mut Frame, color: Rgb);

    fn rectangle(&self, canvas: &mut Frame, rect: Rect, color: Rgb, stroke: Stroke);

    fn text(&self, canvas: &mut Frame, text: &str, origin: (i32, i32), style: TextStyle, color: Rgb);
}
