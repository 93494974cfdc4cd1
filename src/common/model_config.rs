use std::fmt;
use crate::common::inference_device::InferenceDevice;
use crate::common::model_version::ModelVersion;

/// Default confidence the detector itself applies before results reach the adapter.
pub const DETECTOR_CONF_THRESHOLD: f32 = 0.25;
pub const DETECTOR_IOU_THRESHOLD: f32 = 0.7;
pub const DETECTOR_INPUT_SIZE: u32 = 640;

#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub weights_path: String,
    pub ort_lib_path: String,
    pub inference_device: InferenceDevice,
    pub model_version: ModelVersion,
    pub conf_threshold: f32,
    pub iou_threshold: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_path: String::new(),
            ort_lib_path: String::new(),
            inference_device: InferenceDevice::default(),
            model_version: ModelVersion::default(),
            conf_threshold: DETECTOR_CONF_THRESHOLD,
            iou_threshold: DETECTOR_IOU_THRESHOLD,
            width: DETECTOR_INPUT_SIZE,
            height: DETECTOR_INPUT_SIZE,
        }
    }
}

impl ModelConfig {
    pub fn new(weights_path: String, ort_lib_path: String,
               inference_device: InferenceDevice, model_version: ModelVersion) -> Self {
        Self {
            weights_path,
            ort_lib_path,
            inference_device,
            model_version,
            ..Default::default()
        }
    }

    pub fn set_device_type(&mut self, device_type: InferenceDevice) {
        self.inference_device = device_type;
    }

    pub fn get_threshold(&self) -> f32 {
        self.conf_threshold
    }
}

impl fmt::Display for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weights File Path: {}\n\
        OnnxRuntime Lib Path: {}\n\
        Inference Device: {:?}\n\
        Model Version: {}\n\
        Model Input Resolution: {}x{}\n\
        Detection Threshold: {}\n\
        IoU Threshold: {}",
               self.weights_path, self.ort_lib_path,
               self.inference_device, self.model_version.name(),
               self.width, self.height, self.conf_threshold, self.iou_threshold)
    }
}
