pub mod downscaler;
pub mod frame_transform;
