mod annotation;
mod bvr_box;
mod bvr_detection;
mod bvr_image;
mod calibration;
mod detected_box;
mod inference_device;
mod model_config;
mod model_version;

pub use annotation::*;
pub use bvr_box::*;
pub use bvr_detection::*;
pub use bvr_image::*;
pub use calibration::*;
pub use detected_box::*;
pub use inference_device::*;
pub use model_config::*;
pub use model_version::*;
