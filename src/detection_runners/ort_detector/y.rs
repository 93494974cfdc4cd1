use crate::common::BvrDetection;
use crate::detection_runners::ort_detector::nms::Nms;

/// Inference results for one image.
#[derive(Clone, PartialEq, Default)]
pub struct Y {
    detections: Option<Vec<BvrDetection>>,
}

impl std::fmt::Debug for Y {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut f = f.debug_struct("Y");
        if let Some(x) = &self.detections {
            if !x.is_empty() {
                f.field("BvrDetections", &x);
            }
        }
        f.finish()
    }
}

impl Y {
    pub fn with_detections(mut self, detections: &[BvrDetection]) -> Self {
        self.detections = Some(detections.to_vec());
        self
    }

    pub fn detections(&self) -> Option<&Vec<BvrDetection>> {
        self.detections.as_ref()
    }

    /// Takes the detections, leaving an empty list behind.
    pub fn into_detections(self) -> Vec<BvrDetection> {
        self.detections.unwrap_or_default()
    }

    pub fn apply_nms(mut self, iou_threshold: f32) -> Self {
        if let Some(bboxes) = &mut self.detections {
            Self::nms(bboxes, iou_threshold);
        }
        self
    }

    /// Greedy non-maximum suppression. Survivors are left sorted by descending confidence.
    pub fn nms<T: Nms>(boxes: &mut Vec<T>, iou_threshold: f32) {
        boxes.sort_by(|b1, b2| {
            b2.confidence()
                .partial_cmp(&b1.confidence())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut current_index = 0;
        for index in 0..boxes.len() {
            let mut drop = false;
            for prev_index in 0..current_index {
                let iou = boxes[prev_index].iou(&boxes[index]);
                if iou > iou_threshold {
                    drop = true;
                    break;
                }
            }
            if !drop {
                boxes.swap(current_index, index);
                current_index += 1;
            }
        }
        boxes.truncate(current_index);
    }
}
