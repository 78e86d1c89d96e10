//! Bounding-box geometry shared by the ONNX backends.

/// A candidate face box `[x1, y1, x2, y2]` with its detector confidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredBox {
    pub bbox: [f64; 4],
    pub confidence: f64,
}

/// IoU between two bounding boxes represented as `[x1, y1, x2, y2]`.
pub fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }

    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

/// Greedy NMS: highest confidence first, dropping any box whose IoU with
/// an already-kept box exceeds `iou_thresh`.
pub fn nms(boxes: &mut [ScoredBox], iou_thresh: f64) -> Vec<ScoredBox> {
    boxes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<ScoredBox> = Vec::with_capacity(boxes.len());
    for candidate in boxes.iter() {
        let suppressed = keep
            .iter()
            .any(|k| bbox_iou(&k.bbox, &candidate.bbox) > iou_thresh);
        if !suppressed {
            keep.push(*candidate);
        }
    }
    keep
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(bbox: [f64; 4], confidence: f64) -> ScoredBox {
        ScoredBox { bbox, confidence }
    }

    #[test]
    fn test_bbox_iou_no_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [20.0, 20.0, 30.0, 30.0];
        assert_eq!(bbox_iou(&a, &b), 0.0);
    }

    #[test]
    fn test_bbox_iou_perfect_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        assert!((bbox_iou(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_iou_partial_overlap() {
        let a = [0.0, 0.0, 10.0, 10.0];
        let b = [5.0, 5.0, 15.0, 15.0];
        let expected = 25.0 / 175.0;
        assert!((bbox_iou(&a, &b) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_nms_suppresses_overlapping() {
        let mut boxes = vec![
            scored([0.0, 0.0, 100.0, 100.0], 0.9),
            scored([5.0, 5.0, 105.0, 105.0], 0.8),
        ];
        let kept = nms(&mut boxes, 0.3);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_nms_keeps_non_overlapping() {
        let mut boxes = vec![
            scored([0.0, 0.0, 50.0, 50.0], 0.9),
            scored([200.0, 200.0, 250.0, 250.0], 0.8),
        ];
        assert_eq!(nms(&mut boxes, 0.3).len(), 2);
    }

    #[test]
    fn test_nms_prefers_higher_confidence() {
        let mut boxes = vec![
            scored([0.0, 0.0, 100.0, 100.0], 0.5),
            scored([2.0, 2.0, 102.0, 102.0], 0.9),
        ];
        let kept = nms(&mut boxes, 0.3);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox, [2.0, 2.0, 102.0, 102.0]);
    }

    #[test]
    fn test_nms_empty_input() {
        let mut boxes: Vec<ScoredBox> = Vec::new();
        assert!(nms(&mut boxes, 0.3).is_empty());
    }
}
