mod utils;
pub mod common;
pub mod data;
pub mod detection_runners;
pub mod detectors;
pub mod display;
pub mod frame_sources;
pub mod measure_engine;
pub mod rendering;
pub mod session;

use std::time::Instant;
use crate::common::{BvrImage, DetectedBox, ModelConfig};
use crate::data::ConfigOrt;
use crate::detection_runners::inference_process::InferenceProcess;
use crate::detection_runners::OrtYOLO;
use crate::detectors::DetectionAdapter;

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

/// Builds the ONNX detector described by `model_details`, warm-up runs included.
pub fn init_detector(model_details: &ModelConfig) -> Result<OrtYOLO> {
    log::info!("Initializing ORT session with ({}) execution provider", model_details.inference_device);
    let ort_options = ConfigOrt::from_model_config(model_details)?
        .with_trt_fp16(false)
        .with_profile(false);

    OrtYOLO::new(ort_options)
}

/// One-shot detection through the adapter, for callers that do not run a full session.
pub fn run_detection(adapter: &mut DetectionAdapter<OrtYOLO>, bvr_image: &BvrImage) -> Result<Vec<DetectedBox>> {
    let now = Instant::now();

    let detections = adapter.detect(bvr_image)?;

    log::debug!("Processing time: {:?}", now.elapsed());
    Ok(detections)
}
