/// YOLO face detector using ONNX Runtime via `ort`.
///
/// Letterboxes the frame to the model's square input, filters raw
/// detections by confidence, and applies greedy NMS. Keypoint columns the
/// pose variant emits are ignored.
use std::path::Path;

use crate::shared::face_region::FaceRegion;
use crate::shared::frame::Frame;

use super::math::{nms, ScoredBox};

/// Fallback YOLO model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for face detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Letterbox padding value (YOLO convention).
const PAD_VALUE: f32 = 114.0 / 255.0;

pub struct OnnxFaceDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxFaceDetector {
    /// Load a YOLO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's NCHW input shape,
    /// falling back to 640 when dynamic.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?.commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| match input.dtype() {
                ort::value::ValueType::Tensor { ref shape, .. }
                    if shape.len() >= 4 && shape[2] > 0 =>
                {
                    Some(shape[2] as u32)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::debug!("Face detector input size: {input_size}");
        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }

    /// Runs the model and returns face boxes in frame coordinates.
    pub fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        let (input_tensor, geometry) = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let mut boxes = parse_detections(data, &shape, self.confidence, &geometry)?;
        let kept = nms(&mut boxes, NMS_IOU_THRESH);

        Ok(kept
            .into_iter()
            .map(|b| FaceRegion::from_corners(b.bbox, frame.width(), frame.height()))
            .filter(|r| !r.is_empty())
            .collect())
    }
}

/// How a frame was fitted into the square model input.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Letterbox {
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

impl Letterbox {
    fn to_frame(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.pad_x as f64) / self.scale,
            (y - self.pad_y as f64) / self.scale,
        )
    }
}

/// Letterbox-resize a frame to `target_size` × `target_size` as an NCHW
/// float32 tensor in [0, 1].
fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, Letterbox) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let mut tensor = ndarray::Array4::<f32>::from_elem(
        (1, 3, target_size as usize, target_size as usize),
        PAD_VALUE,
    );

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x,
            pad_y,
        },
    )
}

/// Decodes `[cx, cy, w, h, conf, ...]` rows into frame-space boxes.
///
/// YOLO exports either `[1, features, detections]` or
/// `[1, detections, features]`; the smaller axis is taken as features.
fn parse_detections(
    data: &[f32],
    shape: &[usize],
    confidence: f64,
    geometry: &Letterbox,
) -> Result<Vec<ScoredBox>, Box<dyn std::error::Error>> {
    if shape.len() != 3 {
        return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
    }
    let transposed = shape[1] < shape[2];
    let (num_dets, num_feats) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if num_feats < 5 {
        return Ok(Vec::new());
    }

    let value = |det: usize, feat: usize| -> f64 {
        let idx = if transposed {
            feat * num_dets + det
        } else {
            det * num_feats + feat
        };
        data[idx] as f64
    };

    let mut boxes = Vec::new();
    for i in 0..num_dets {
        let conf = value(i, 4);
        if conf < confidence {
            continue;
        }
        let (cx, cy, w, h) = (value(i, 0), value(i, 1), value(i, 2), value(i, 3));
        let (x1, y1) = geometry.to_frame(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = geometry.to_frame(cx + w / 2.0, cy + h / 2.0);
        boxes.push(ScoredBox {
            bbox: [x1, y1, x2, y2],
            confidence: conf,
        });
    }
    Ok(boxes)
}
