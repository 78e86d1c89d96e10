#[cfg(feature = "ffmpeg")]
pub mod ffmpeg_camera_source;
pub mod image_file_source;
