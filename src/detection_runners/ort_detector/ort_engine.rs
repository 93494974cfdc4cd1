use anyhow::Result;
use ort::{
    execution_providers::{CPUExecutionProvider,
                          CUDAExecutionProvider,
                          CoreMLExecutionProvider,
                          ExecutionProviderDispatch,
                          TensorRTExecutionProvider},
    session::builder::GraphOptimizationLevel,
    session::Session,
    value::{Tensor, ValueType},
};
use crate::common::InferenceDevice;
use crate::data::{ConfigOrt, Xs, X};

/// ONNXRuntime Backend
pub struct OrtEngine {
    session: Session,
    device: InferenceDevice,
    input_names: Vec<String>,
    output_names: Vec<String>,
    model_width: u32,
    model_height: u32,
}

impl std::fmt::Debug for OrtEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtEngine")
            .field("device", &self.device)
            .field("inputs", &self.input_names)
            .field("outputs", &self.output_names)
            .field("model_width", &self.model_width)
            .field("model_height", &self.model_height)
            .finish()
    }
}

impl OrtEngine {
    pub fn new(config: &ConfigOrt) -> Result<Self> {
        // Dynamically load the library from given path, otherwise ORT_DYLIB_PATH decides
        if !config.ort_lib_path.is_empty() {
            if let Err(e) = ort::init_from(&config.ort_lib_path).commit() {
                return Err(anyhow::anyhow!("Failed to commit ORT from {}: {:?}", config.ort_lib_path, e));
            }
        }

        let (session, device) = Self::build_session(config, config.device)?;

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        if input_names.is_empty() || output_names.is_empty() {
            anyhow::bail!("Model {} has no inputs or no outputs", config.onnx_path);
        }

        // NCHW input; dynamic axes come back as -1 and fall back to the configured size
        let (mut model_height, mut model_width) = (config.model_height, config.model_width);
        if let ValueType::Tensor { dimensions, .. } = &session.inputs[0].input_type {
            if dimensions.len() == 4 {
                if dimensions[2] > 0 {
                    model_height = dimensions[2] as u32;
                }
                if dimensions[3] > 0 {
                    model_width = dimensions[3] as u32;
                }
            }
        }

        log::info!(
            "Backend: ONNXRuntime | Device: {:?} | Input: {}x{} | Model: {}",
            device,
            model_width,
            model_height,
            config.onnx_path,
        );

        Ok(Self {
            session,
            device,
            input_names,
            output_names,
            model_width,
            model_height,
        })
    }

    fn build_session(config: &ConfigOrt, device: InferenceDevice) -> Result<(Session, InferenceDevice)> {
        let provider: ExecutionProviderDispatch = match device {
            InferenceDevice::CPU => CPUExecutionProvider::default().build(),
            InferenceDevice::CUDA(device_id) => CUDAExecutionProvider::default()
                .with_device_id(device_id as i32)
                .build()
                .error_on_failure(),
            InferenceDevice::TensorRT(device_id) => TensorRTExecutionProvider::default()
                .with_device_id(device_id as i32)
                .with_fp16(config.trt_fp16_enable)
                .with_engine_cache(config.trt_engine_cache_enable)
                .build()
                .error_on_failure(),
            InferenceDevice::CoreML(_) => CoreMLExecutionProvider::default()
                .build()
                .error_on_failure(),
        };

        let builder = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?;

        let builder = match builder.with_execution_providers([provider]) {
            Ok(builder) => builder,
            Err(err) if device != InferenceDevice::CPU => {
                log::warn!("{} device failed to register ({err}), Using cpu", device.str());
                return Self::build_session(config, InferenceDevice::CPU);
            }
            Err(err) => return Err(err.into()),
        };

        let session = builder.commit_from_file(&config.onnx_path)?;
        Ok((session, device))
    }

    /// Runs the first input tensor through the session and returns every output as `f32`.
    pub fn run(&mut self, xs: Xs) -> Result<Xs> {
        let input = xs
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No input tensor to run"))?;
        let tensor = Tensor::from_array(input.into_inner())?;
        let outputs = self.session.run(ort::inputs![self.input_names[0].as_str() => tensor]?)?;

        let mut ys = Vec::with_capacity(self.output_names.len());
        for name in self.output_names.iter() {
            let y = outputs[name.as_str()].try_extract_tensor::<f32>()?.into_owned();
            ys.push(X::from(y));
        }

        Ok(Xs::from(ys))
    }

    /// Reads a custom metadata entry embedded in the model, such as `names`.
    pub fn try_fetch(&self, key: &str) -> Option<String> {
        match self.session.metadata() {
            Err(_) => None,
            Ok(metadata) => metadata.custom(key).unwrap_or_default(),
        }
    }

    pub fn device(&self) -> InferenceDevice {
        self.device
    }

    pub fn width(&self) -> u32 {
        self.model_width
    }

    pub fn height(&self) -> u32 {
        self.model_height
    }
}
