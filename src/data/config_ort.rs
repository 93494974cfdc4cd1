//! Options for building the ONNX Runtime YOLO detector.

use anyhow::Result;
use crate::common::{InferenceDevice, ModelConfig, ModelVersion, DETECTOR_CONF_THRESHOLD, DETECTOR_INPUT_SIZE, DETECTOR_IOU_THRESHOLD};

#[derive(Debug, Clone)]
pub struct ConfigOrt {
    pub onnx_path: String,
    pub ort_lib_path: String,
    pub device: InferenceDevice,
    pub model_width: u32,
    pub model_height: u32,
    pub profile: bool,
    pub num_dry_run: usize,

    // trt related
    pub trt_engine_cache_enable: bool,
    pub trt_fp16_enable: bool,

    pub nc: Option<usize>,
    pub conf: f32,
    pub iou: f32,
    pub names: Option<Vec<String>>,
    pub yolo_version: Option<ModelVersion>,
}

impl Default for ConfigOrt {
    fn default() -> Self {
        Self {
            onnx_path: String::new(),
            ort_lib_path: String::new(),
            device: InferenceDevice::CPU,
            model_width: DETECTOR_INPUT_SIZE,
            model_height: DETECTOR_INPUT_SIZE,
            profile: false,
            num_dry_run: 1,

            trt_engine_cache_enable: true,
            trt_fp16_enable: false,

            nc: Some(80), // Default COCO class number
            conf: DETECTOR_CONF_THRESHOLD,
            iou: DETECTOR_IOU_THRESHOLD,
            names: None,
            yolo_version: None,
        }
    }
}

impl ConfigOrt {
    pub fn new() -> Self {
        Default::default()
    }

    /// Builder seeded from a [`ModelConfig`].
    pub fn from_model_config(model_details: &ModelConfig) -> Result<Self> {
        Ok(Self::new()
            .with_model(&model_details.weights_path)?
            .with_ort_lib_path(&model_details.ort_lib_path)?
            .with_device(model_details.inference_device)
            .with_yolo_version(model_details.model_version)
            .with_model_width(model_details.width)
            .with_model_height(model_details.height)
            .with_conf(model_details.conf_threshold)
            .with_iou(model_details.iou_threshold))
    }

    pub fn with_model(mut self, onnx_path: &str) -> Result<Self> {
        if onnx_path.is_empty() {
            anyhow::bail!("No ONNX model path given");
        }
        self.onnx_path = onnx_path.to_string();
        Ok(self)
    }

    pub fn with_ort_lib_path(mut self, ort_lib_path: &str) -> Result<Self> {
        self.ort_lib_path = ort_lib_path.to_string();
        Ok(self)
    }

    pub fn with_model_width(mut self, n: u32) -> Self {
        self.model_width = n;
        self
    }

    pub fn with_model_height(mut self, n: u32) -> Self {
        self.model_height = n;
        self
    }

    pub fn with_dry_run(mut self, n: usize) -> Self {
        self.num_dry_run = n;
        self
    }

    pub fn with_device(mut self, device_type: InferenceDevice) -> Self {
        self.device = device_type;
        self
    }

    pub fn with_trt_fp16(mut self, x: bool) -> Self {
        self.trt_fp16_enable = x;
        self
    }

    pub fn with_yolo_version(mut self, x: ModelVersion) -> Self {
        self.yolo_version = Some(x);
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = Some(names.iter().map(|x| x.to_string()).collect::<Vec<String>>());
        self
    }

    pub fn with_nc(mut self, nc: usize) -> Self {
        self.nc = Some(nc);
        self
    }

    pub fn with_iou(mut self, x: f32) -> Self {
        self.iou = x;
        self
    }

    pub fn with_conf(mut self, x: f32) -> Self {
        self.conf = x;
        self
    }
}
