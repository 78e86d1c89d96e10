/// ArcFace face encoder using ONNX Runtime.
///
/// Each face is cropped square around its region, resized to 112×112 and
/// embedded; the output vector is L2-normalized so Euclidean distances fall
/// in [0, 2].
use std::path::Path;

use crate::detection::domain::encoding::Encoding;
use crate::shared::face_region::FaceRegion;
use crate::shared::frame::{Frame, CHANNELS};

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

/// Owner tolerance calibrated for these embeddings. On unit vectors a
/// Euclidean distance of 1.1 is a cosine similarity of about 0.4.
pub const RECOMMENDED_TOLERANCE: f64 = 1.1;

pub struct OnnxFaceEncoder {
    session: ort::session::Session,
}

impl OnnxFaceEncoder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let intra_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_inter_threads(1)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(model_path)?;
        Ok(Self { session })
    }

    pub fn encode(
        &mut self,
        frame: &Frame,
        region: &FaceRegion,
    ) -> Result<Encoding, Box<dyn std::error::Error>> {
        let (crop, w, h) = square_crop(frame, region).ok_or("Face region lies outside the frame")?;
        let tensor = preprocess(&crop, w, h);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?;

        let mut embedding = embedding_slice.to_vec();
        l2_normalize(&mut embedding);
        Ok(Encoding::new(embedding))
    }
}

/// Square crop centered on the region, clamped to frame bounds.
///
/// Returns `None` when nothing of the crop lies inside the frame.
fn square_crop(frame: &Frame, region: &FaceRegion) -> Option<(Vec<u8>, usize, usize)> {
    let fw = frame.width() as i32;
    let fh = frame.height() as i32;

    let cx = (region.left + region.right) / 2;
    let cy = (region.top + region.bottom) / 2;
    let half = (region.width().max(region.height()) / 2).max(1);

    let x1 = (cx - half).max(0);
    let y1 = (cy - half).max(0);
    let x2 = (cx + half).min(fw);
    let y2 = (cy + half).min(fh);
    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    let (x1, y1, x2, y2) = (x1 as usize, y1 as usize, x2 as usize, y2 as usize);
    let row_stride = frame.width() as usize * CHANNELS;
    let data = frame.data();
    let mut crop = Vec::with_capacity((x2 - x1) * (y2 - y1) * CHANNELS);
    for row in y1..y2 {
        let start = row * row_stride + x1 * CHANNELS;
        crop.extend_from_slice(&data[start..start + (x2 - x1) * CHANNELS]);
    }
    Some((crop, x2 - x1, y2 - y1))
}

/// Resize crop to 112x112, normalize, NCHW layout.
fn preprocess(rgb_data: &[u8], src_w: usize, src_h: usize) -> ndarray::Array4<f32> {
    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));

    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x =
                (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            let offset = (src_y * src_w + src_x) * CHANNELS;
            for c in 0..3 {
                tensor[[0, c, y, x]] = (rgb_data[offset + c] as f32 - NORM_MEAN) / NORM_STD;
            }
        }
    }

    tensor
}

pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::domain::identity_matcher::IdentityMatcher;
    use crate::shared::frame::PixelOrder;

    /// Unit embedding at `cos` cosine similarity to `[1, 0]`.
    fn unit_at_cosine(cos: f32) -> Encoding {
        let mut v = vec![cos, (1.0 - cos * cos).sqrt()];
        l2_normalize(&mut v);
        Encoding::new(v)
    }

    #[test]
    fn test_l2_normalize_unit_vector() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_square_crop_centered_inside_frame() {
        let frame = Frame::filled(100, 100, [9, 9, 9]);
        // 20 wide, 40 tall → 40x40 square around (50, 50)
        let (crop, w, h) = square_crop(&frame, &FaceRegion::new(30, 60, 70, 40)).unwrap();
        assert_eq!((w, h), (40, 40));
        assert_eq!(crop.len(), 40 * 40 * 3);
    }

    #[test]
    fn test_square_crop_clamps_at_edges() {
        let frame = Frame::filled(50, 50, [0, 0, 0]);
        let (_, w, h) = square_crop(&frame, &FaceRegion::new(0, 20, 20, 0)).unwrap();
        assert_eq!((w, h), (20, 20));
        // 10x10 square around (45, 47) loses its bottom two rows
        let (_, w, h) = square_crop(&frame, &FaceRegion::new(45, 50, 50, 40)).unwrap();
        assert_eq!((w, h), (10, 8));
    }

    #[test]
    fn test_square_crop_copies_pixels_from_region() {
        let mut data = vec![0u8; 4 * 4 * 3];
        // pixel (2, 2) red
        let off = (2 * 4 + 2) * 3;
        data[off] = 255;
        let frame = Frame::new(data, 4, 4, PixelOrder::Rgb, 0);
        let (crop, w, _) = square_crop(&frame, &FaceRegion::new(1, 3, 3, 1)).unwrap();
        // crop spans x,y in [1, 3): pixel (2,2) is at crop (1,1)
        let idx = (w + 1) * 3;
        assert_eq!(&crop[idx..idx + 3], &[255, 0, 0]);
    }

    #[test]
    fn test_square_crop_outside_frame_is_none() {
        let frame = Frame::filled(10, 10, [0, 0, 0]);
        assert!(square_crop(&frame, &FaceRegion::new(50, 70, 70, 50)).is_none());
    }

    #[test]
    fn test_preprocess_shape_and_range() {
        let data = vec![255u8; 10 * 10 * 3];
        let tensor = preprocess(&data, 10, 10);
        assert_eq!(tensor.shape(), &[1, 3, 112, 112]);
        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < 0.01);

        let data = vec![0u8; 10 * 10 * 3];
        let tensor = preprocess(&data, 10, 10);
        assert!((tensor[[0, 2, 111, 111]] + 1.0).abs() < 0.01);
    }

    #[test]
    fn test_recommended_tolerance_accepts_same_person_similarity() {
        let owner = unit_at_cosine(1.0);
        let matcher = IdentityMatcher::new(RECOMMENDED_TOLERANCE);

        assert!(matcher.matches(&owner, &unit_at_cosine(0.5)));
        assert!(matcher.matches(&owner, &unit_at_cosine(0.45)));
        assert!(!matcher.matches(&owner, &unit_at_cosine(0.2)));
        assert!(!matcher.matches(&owner, &unit_at_cosine(0.0)));
    }

    #[test]
    fn test_reference_tolerance_is_too_strict_for_unit_embeddings() {
        let owner = unit_at_cosine(1.0);
        // Typical same-person similarity
        let same_person = unit_at_cosine(0.5);
        assert!(!IdentityMatcher::default().matches(&owner, &same_person));
        assert!(RECOMMENDED_TOLERANCE > IdentityMatcher::default().tolerance());
    }
}
