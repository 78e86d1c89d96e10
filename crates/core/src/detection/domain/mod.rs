pub mod encoding;
pub mod face_analyzer;
pub mod face_observation;
