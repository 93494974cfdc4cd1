use serde::{Deserialize, Serialize};
use crate::common::BvrBox;
use crate::detection_runners::ort_detector::nms::Nms;

/// A raw detection as reported by a detector, before confidence filtering.
#[derive(Default, Debug, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct BvrDetection {
    pub class_id: isize,
    pub bbox: BvrBox,
    pub label: Option<String>,
    pub confidence: f32,
}

impl Nms for BvrDetection {
    /// Computes the intersection over union (IoU) between this bounding box and another.
    fn iou(&self, other: &Self) -> f32 {
        let union = self.bbox.union(&other.bbox);
        if union <= 0. {
            return 0.;
        }
        self.bbox.intersect(&other.bbox) / union
    }

    /// Returns the confidence score of the bounding box.
    fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl BvrDetection {
    pub fn new(class_id: isize, bbox: BvrBox, label: Option<String>, confidence: f32) -> Self {
        Self {
            class_id,
            bbox,
            label,
            confidence,
        }
    }

    /// Sets the bounding box's coordinates using `(x1, y1, x2, y2)` and calculates width and height.
    pub fn with_x1y1_x2y2(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = BvrBox::default().with_x1y1_x2y2(x1, y1, x2, y2);
        self
    }

    /// Sets the bounding box's coordinates and dimensions using `(x, y, w, h)`.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = BvrBox::default().with_x1y1_wh(x, y, w, h);
        self
    }

    pub fn with_confidence(mut self, conf: f32) -> Self {
        self.confidence = conf;
        self
    }

    pub fn with_class_id(mut self, class_id: isize) -> Self {
        self.class_id = class_id;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}
