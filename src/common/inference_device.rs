#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InferenceDevice {
    #[default] CPU,
    CUDA(usize),
    TensorRT(usize),
    CoreML(usize),
}

// Hardcoded device names. Storing the "proper" spelling and the lowercase version.
const CPU: [&str; 2] = ["CPU","cpu"];
const CUDA: [&str; 2] = ["CUDA","cuda"];
const TENSOR_RT: [&str; 2] = ["TensorRT","tensorrt"];
const CORE_ML: [&str; 2] = ["CoreML","coreml"];

impl InferenceDevice {
    pub fn from_str(device: &str, device_id: usize) -> Option<Self> {
        match device.to_lowercase().as_str() {
            "cpu" => Some(InferenceDevice::CPU),
            "cuda" => Some(InferenceDevice::CUDA(device_id)),
            "tensorrt" => Some(InferenceDevice::TensorRT(device_id)),
            "coreml" => Some(InferenceDevice::CoreML(device_id)),
            _ => None,
        }
    }

    pub fn str(&self) -> &'static str {
        match self {
            InferenceDevice::CPU => CPU[0],
            InferenceDevice::CUDA(_) => CUDA[0],
            InferenceDevice::TensorRT(_) => TENSOR_RT[0],
            InferenceDevice::CoreML(_) => CORE_ML[0],
        }
    }

    pub fn str_lowercase(&self) -> &'static str {
        match self {
            InferenceDevice::CPU => CPU[1],
            InferenceDevice::CUDA(_) => CUDA[1],
            InferenceDevice::TensorRT(_) => TENSOR_RT[1],
            InferenceDevice::CoreML(_) => CORE_ML[1],
        }
    }

    pub fn all_inference_devices() -> Vec<String> {
        vec![
            InferenceDevice::CPU.str_lowercase().to_string(),
            InferenceDevice::CUDA(0).str_lowercase().to_string(),
            InferenceDevice::TensorRT(0).str_lowercase().to_string(),
            InferenceDevice::CoreML(0).str_lowercase().to_string(),
        ]
    }

    pub fn is_valid_inference_device(inference_device: &str) -> bool {
        InferenceDevice::from_str(inference_device, 0).is_some()
    }
}

impl std::fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceDevice::CPU => write!(f, "{}", self.str()),
            InferenceDevice::CUDA(id) | InferenceDevice::TensorRT(id) | InferenceDevice::CoreML(id) => {
                write!(f, "{}:{}", self.str(), id)
            }
        }
    }
}
