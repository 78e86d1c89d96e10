use std::path::Path;

use crate::access::domain::enrolled_identity::EnrolledIdentity;
use crate::detection::domain::face_analyzer::FaceAnalyzer;
use crate::enrollment::domain::image_loader::ImageLoader;

use super::loop_logger::LoopLogger;
use super::startup_error::StartupError;

/// Computes the owner's encoding from the enrollment photo.
///
/// The photo is analyzed at full resolution. When it holds several faces the
/// first one the analyzer reports is enrolled.
pub struct EnrollIdentityUseCase {
    loader: Box<dyn ImageLoader>,
}

impl EnrollIdentityUseCase {
    pub fn new(loader: Box<dyn ImageLoader>) -> Self {
        Self { loader }
    }

    pub fn execute(
        &self,
        path: &Path,
        analyzer: &mut dyn FaceAnalyzer,
        logger: &mut dyn LoopLogger,
    ) -> Result<EnrolledIdentity, StartupError> {
        if !path.is_file() {
            return Err(StartupError::EnrollmentNotFound(path.to_path_buf()));
        }

        logger.info("Loading owner face data... (this might take a moment)");
        let image = self
            .loader
            .load(path)
            .map_err(|source| StartupError::EnrollmentUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let observations = analyzer
            .observe(&image)
            .map_err(|source| StartupError::Analyzer {
                path: path.to_path_buf(),
                source,
            })?;

        let first = observations
            .into_iter()
            .next()
            .ok_or_else(|| StartupError::NoFaceInEnrollment(path.to_path_buf()))?;
        log::debug!(
            "Enrolled {}-d encoding from {}",
            first.encoding.len(),
            path.display()
        );
        Ok(EnrolledIdentity::new(first.encoding, path.to_path_buf()))
    }
}
