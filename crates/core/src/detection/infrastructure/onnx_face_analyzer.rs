use std::path::{Path, PathBuf};

use crate::detection::domain::encoding::Encoding;
use crate::detection::domain::face_analyzer::FaceAnalyzer;
use crate::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

use super::model_resolver::{self, ModelSource, ProgressFn};
use super::onnx_face_detector::OnnxFaceDetector;
use super::onnx_face_encoder::OnnxFaceEncoder;

pub const DETECTOR_MODEL: ModelSource = ModelSource {
    name: YOLO_MODEL_NAME,
    url: YOLO_MODEL_URL,
};

pub const ENCODER_MODEL: ModelSource = ModelSource {
    name: EMBEDDING_MODEL_NAME,
    url: EMBEDDING_MODEL_URL,
};

/// [`FaceAnalyzer`] backed by a YOLO face detector and an ArcFace encoder.
pub struct OnnxFaceAnalyzer {
    detector: OnnxFaceDetector,
    encoder: OnnxFaceEncoder,
}

impl OnnxFaceAnalyzer {
    pub fn new(
        detector_path: &Path,
        encoder_path: &Path,
        confidence: f64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            detector: OnnxFaceDetector::new(detector_path, confidence)?,
            encoder: OnnxFaceEncoder::new(encoder_path)?,
        })
    }

    /// Resolves both models (downloading if needed) and loads them.
    pub fn from_model_dirs(
        search_dirs: &[PathBuf],
        confidence: f64,
        progress: impl Fn(&str) -> Option<ProgressFn>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        log::info!("Resolving model: {}", DETECTOR_MODEL.name);
        let detector_path =
            model_resolver::resolve(DETECTOR_MODEL, search_dirs, progress(DETECTOR_MODEL.name))?;
        log::info!("Resolving model: {}", ENCODER_MODEL.name);
        let encoder_path =
            model_resolver::resolve(ENCODER_MODEL, search_dirs, progress(ENCODER_MODEL.name))?;
        Self::new(&detector_path, &encoder_path, confidence)
    }
}

impl FaceAnalyzer for OnnxFaceAnalyzer {
    fn detect_faces(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        self.detector.detect(frame)
    }

    fn encode_faces(
        &mut self,
        frame: &Frame,
        regions: &[FaceRegion],
    ) -> Result<Vec<Encoding>, Box<dyn std::error::Error>> {
        regions
            .iter()
            .map(|region| self.encoder.encode(frame, region))
            .collect()
    }
}
