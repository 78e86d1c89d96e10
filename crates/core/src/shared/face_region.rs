/// A detected face box in the coordinate space of the frame it was found in.
///
/// Edges are stored in (top, right, bottom, left) order. `right` and `bottom`
/// are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceRegion {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl FaceRegion {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Builds a region from floating-point `[x1, y1, x2, y2]` corners,
    /// clamped to a `frame_w` × `frame_h` frame.
    pub fn from_corners(corners: [f64; 4], frame_w: u32, frame_h: u32) -> Self {
        let [x1, y1, x2, y2] = corners;
        let clamp_x = |v: f64| (v.round() as i32).clamp(0, frame_w as i32);
        let clamp_y = |v: f64| (v.round() as i32).clamp(0, frame_h as i32);
        Self {
            top: clamp_y(y1),
            right: clamp_x(x2),
            bottom: clamp_y(y2),
            left: clamp_x(x1),
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Multiplies all four edges by `factor`, rounding to the nearest pixel.
    ///
    /// A region found on a frame downscaled by `f` maps back onto the
    /// original with `scaled(1.0 / f)`.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |v: i32| (v as f64 * factor).round() as i32;
        Self {
            top: scale(self.top),
            right: scale(self.right),
            bottom: scale(self.bottom),
            left: scale(self.left),
        }
    }

    /// Rescales every region by `factor`.
    pub fn scale_all(regions: &[FaceRegion], factor: f64) -> Vec<FaceRegion> {
        regions.iter().map(|r| r.scaled(factor)).collect()
    }
}
