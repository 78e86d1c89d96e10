pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

pub const DEFAULT_ENROLLMENT_PATH: &str = "owner.jpg";

pub const DEFAULT_CAPTURE_WIDTH: u32 = 1920;
pub const DEFAULT_CAPTURE_HEIGHT: u32 = 1080;

/// Analysis runs on a quarter-resolution copy of each capture.
pub const DEFAULT_DOWNSCALE_FACTOR: f64 = 0.25;

/// Matcher tolerance for 128-d face encodings. Encoders with another metric
/// publish their own calibrated value.
pub const REFERENCE_TOLERANCE: f64 = 0.5;

/// Pause after a failed capture before trying again.
pub const DEFAULT_RETRY_DELAY_MS: u64 = 10;

pub const DEFAULT_PANEL_WIDTH: u32 = 640;
pub const DEFAULT_PANEL_HEIGHT: u32 = 480;

pub const DEFAULT_QUIT_KEY: char = 'q';

pub const STATUS_WINDOW: &str = "Status Screen";
pub const CAMERA_WINDOW: &str = "Camera Feed";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
