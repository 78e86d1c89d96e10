use std::path::PathBuf;

/// Failures that stop the access loop before its first cycle.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("'{}' not found! Please put a photo of your face named '{}' in this folder.", .0.display(), .0.display())]
    EnrollmentNotFound(PathBuf),
    #[error("No face found in '{}'. Please use a clearer photo.", .0.display())]
    NoFaceInEnrollment(PathBuf),
    #[error("Could not read '{}': {source}", .path.display())]
    EnrollmentUnreadable {
        path: PathBuf,
        source: Box<dyn std::error::Error>,
    },
    #[error("Face analysis failed on '{}': {source}", .path.display())]
    Analyzer {
        path: PathBuf,
        source: Box<dyn std::error::Error>,
    },
    #[error("Error starting camera: {0}")]
    CameraInit(Box<dyn std::error::Error>),
}

impl StartupError {
    /// Process exit status for this failure.
    ///
    /// `2` for enrollment problems, `3` when the camera will not start.
    pub fn exit_code(&self) -> i32 {
        match self {
            StartupError::EnrollmentNotFound(_)
            | StartupError::NoFaceInEnrollment(_)
            | StartupError::EnrollmentUnreadable { .. }
            | StartupError::Analyzer { .. } => 2,
            StartupError::CameraInit(_) => 3,
        }
    }
}
