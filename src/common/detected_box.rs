use serde::{Deserialize, Serialize};
use crate::common::BvrDetection;

/// An integer pixel box that survived confidence filtering.
///
/// The corners always satisfy `x1 < x2` and `y1 < y2`; [`DetectedBox::new`] refuses anything
/// else, so widths and heights taken from a `DetectedBox` are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDetectedBox")]
pub struct DetectedBox {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    confidence: f32,
    class_id: isize,
}

/// Unchecked wire form of a [`DetectedBox`].
#[derive(Deserialize)]
struct RawDetectedBox {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    confidence: f32,
    class_id: isize,
}

impl TryFrom<RawDetectedBox> for DetectedBox {
    type Error = String;

    fn try_from(raw: RawDetectedBox) -> Result<Self, Self::Error> {
        Self::new(raw.x1, raw.y1, raw.x2, raw.y2, raw.confidence, raw.class_id).ok_or_else(|| {
            format!("degenerate box ({}, {}) - ({}, {})", raw.x1, raw.y1, raw.x2, raw.y2)
        })
    }
}

impl DetectedBox {
    /// Returns `None` for degenerate (zero or negative area) geometry.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32, confidence: f32, class_id: isize) -> Option<Self> {
        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        Some(Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
            class_id,
        })
    }

    /// Converts a raw detection, truncating its float corners toward zero.
    pub fn from_detection(detection: &BvrDetection) -> Option<Self> {
        let (x1, y1, x2, y2) = detection.bbox.as_x1y1_x2y2_i32();
        Self::new(x1, y1, x2, y2, detection.confidence, detection.class_id)
    }

    pub fn x1(&self) -> i32 {
        self.x1
    }

    pub fn y1(&self) -> i32 {
        self.y1
    }

    pub fn x2(&self) -> i32 {
        self.x2
    }

    pub fn y2(&self) -> i32 {
        self.y2
    }

    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn class_id(&self) -> isize {
        self.class_id
    }

    /// Width in pixels, always at least 1.
    pub fn width_px(&self) -> u32 {
        self.x2.abs_diff(self.x1)
    }

    /// Height in pixels, always at least 1.
    pub fn height_px(&self) -> u32 {
        self.y2.abs_diff(self.y1)
    }

    pub fn as_x1y1_x2y2(&self) -> (i32, i32, i32, i32) {
        (self.x1, self.y1, self.x2, self.y2)
    }
}
