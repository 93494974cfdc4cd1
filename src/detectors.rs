use std::time::{Duration, Instant};
use crate::common::{BvrDetection, BvrImage, DetectedBox};
use crate::data::CONFIDENCE_THRESHOLD;
use crate::utils;

/// Anything that can look at a frame and report candidate regions.
pub trait Detector {
    fn detect(&mut self, frame: &BvrImage) -> anyhow::Result<Vec<BvrDetection>>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&mut self, frame: &BvrImage) -> anyhow::Result<Vec<BvrDetection>> {
        (**self).detect(frame)
    }
}

/// Runs a [`Detector`] and turns its raw output into [`DetectedBox`]es the engine can measure.
#[derive(Debug)]
pub struct DetectionAdapter<D> {
    detector: D,
    threshold: f32,
}

impl<D: Detector> DetectionAdapter<D> {
    pub fn new(detector: D) -> Self {
        Self::with_threshold(detector, CONFIDENCE_THRESHOLD)
    }

    pub fn with_threshold(detector: D, threshold: f32) -> Self {
        Self {
            detector,
            threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Runs the detector once on `frame`. Box order is the detector's order.
    pub fn detect(&mut self, frame: &BvrImage) -> anyhow::Result<Vec<DetectedBox>> {
        let detect_time = Instant::now();

        let raw = self.detector.detect(frame)?;
        let detect_elapsed = utils::trace("TIME", "Detector", detect_time, Duration::ZERO);

        let boxes = normalize_detections(&raw, self.threshold);
        utils::trace("TIME", "Normalize", detect_time, detect_elapsed);

        log::debug!("Frame {}: {} raw detections, {} kept", frame.frame_index, raw.len(), boxes.len());
        Ok(boxes)
    }
}

/// Drops detections below `threshold` (the threshold itself is kept) and degenerate boxes,
/// preserving the order of the survivors.
pub fn normalize_detections(raw: &[BvrDetection], threshold: f32) -> Vec<DetectedBox> {
    raw.iter()
        .filter(|detection| detection.confidence >= threshold)
        .filter_map(|detection| {
            let detected = DetectedBox::from_detection(detection);
            if detected.is_none() {
                log::debug!("Dropping degenerate detection {:?}", detection.bbox);
            }
            detected
        })
        .collect()
}
