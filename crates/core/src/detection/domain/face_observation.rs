use crate::shared::face_region::FaceRegion;

use super::encoding::Encoding;

/// A detected face and its encoding, both relative to the same analysis frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceObservation {
    pub region: FaceRegion,
    pub encoding: Encoding,
}

impl FaceObservation {
    pub fn new(region: FaceRegion, encoding: Encoding) -> Self {
        Self { region, encoding }
    }

    pub fn regions(observations: &[FaceObservation]) -> Vec<FaceRegion> {
        observations.iter().map(|o| o.region).collect()
    }
}
