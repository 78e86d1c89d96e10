use std::path::{Path, PathBuf};

use crate::detection::domain::encoding::Encoding;

/// The owner's face encoding and the photo it was computed from.
///
/// Created once at startup and never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrolledIdentity {
    encoding: Encoding,
    source: PathBuf,
}

impl EnrolledIdentity {
    pub fn new(encoding: Encoding, source: PathBuf) -> Self {
        Self { encoding, source }
    }

    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}
