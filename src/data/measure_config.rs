/// Detections below this confidence never reach the measurement engine.
pub const CONFIDENCE_THRESHOLD: f32 = 0.3;
/// Physical width, in centimetres, assumed for the reference object.
pub const REFERENCE_WIDTH_CM: f64 = 5.0;
pub const CAPTURE_WIDTH: u32 = 1280;
pub const CAPTURE_HEIGHT: u32 = 720;
pub const WINDOW_TITLE: &str = "Object Dimensions";

/// Fixed settings of the measuring loop.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureConfig {
    pub confidence_threshold: f32,
    pub reference_width_cm: f64,
    pub capture_width: u32,
    pub capture_height: u32,
    /// Flip frames left to right before detection, like a mirror.
    pub mirror: bool,
    /// Stop after this many frames, if set.
    pub max_frames: Option<u64>,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: CONFIDENCE_THRESHOLD,
            reference_width_cm: REFERENCE_WIDTH_CM,
            capture_width: CAPTURE_WIDTH,
            capture_height: CAPTURE_HEIGHT,
            mirror: true,
            max_frames: None,
        }
    }
}

impl MeasureConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }
}
