mod config_ort;
mod filesystem_access;
mod measure_config;
mod time_calc;

pub use config_ort::ConfigOrt;
pub use measure_config::*;

pub use crate::detection_runners::ort_detector::input_wrapper::{X, Xs};
pub use crate::detection_runners::ort_detector::y::Y;

pub use filesystem_access::FsAccess;
pub use time_calc::TimeCalc;
