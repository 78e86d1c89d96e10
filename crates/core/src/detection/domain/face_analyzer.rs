use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

use super::encoding::Encoding;
use super::face_observation::FaceObservation;

/// Domain interface for finding and encoding faces.
///
/// Both operations expect an RGB frame. `encode_faces` returns one encoding
/// per supplied region, in the same order. Implementations may hold
/// inference sessions, hence `&mut self`.
pub trait FaceAnalyzer: Send {
    fn detect_faces(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>>;

    fn encode_faces(
        &mut self,
        frame: &Frame,
        regions: &[FaceRegion],
    ) -> Result<Vec<Encoding>, Box<dyn std::error::Error>>;

    /// Detects then encodes, pairing each region with its encoding.
    fn observe(&mut self, frame: &Frame) -> Result<Vec<FaceObservation>, Box<dyn std::error::Error>> {
        let regions = self.detect_faces(frame)?;
        if regions.is_empty() {
            return Ok(Vec::new());
        }
        let encodings = self.encode_faces(frame, &regions)?;
        if encodings.len() != regions.len() {
            return Err(format!(
                "analyzer returned {} encodings for {} regions",
                encodings.len(),
                regions.len()
            )
            .into());
        }
        Ok(regions
            .into_iter()
            .zip(encodings)
            .map(|(region, encoding)| FaceObservation::new(region, encoding))
            .collect())
    }
}
