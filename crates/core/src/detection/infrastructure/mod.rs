pub mod math;
pub mod model_resolver;
pub mod onnx_face_analyzer;
pub mod onnx_face_detector;
pub mod onnx_face_encoder;
