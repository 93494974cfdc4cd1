use crate::common::{measurement_label, AnnotationInstruction, AnnotationKind, CalibrationState, DetectedBox, PixelRect, TextMeasure, MEASURED_COLOUR, REFERENCE_COLOUR, REFERENCE_LABEL};
use crate::data::REFERENCE_WIDTH_CM;

/// Commands delivered to the engine between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    /// Forget the reference; the next detected box becomes the new one.
    ResetCalibration,
}

/// Turns one frame's boxes into drawing instructions, capturing the reference on the way.
///
/// Boxes are processed in order with `calibration` threaded through the loop, so a reference
/// captured from the first box already applies to the second box of the same frame. An empty
/// frame yields the single "no detections" notice and leaves `calibration` untouched.
pub fn annotate(boxes: &[DetectedBox], calibration: &mut CalibrationState, text: &impl TextMeasure) -> Vec<AnnotationInstruction> {
    if boxes.is_empty() {
        return vec![AnnotationInstruction::no_detections(text)];
    }

    boxes
        .iter()
        .filter_map(|detected| annotate_box(detected, calibration, text))
        .collect()
}

fn annotate_box(detected: &DetectedBox, calibration: &mut CalibrationState, text: &impl TextMeasure) -> Option<AnnotationInstruction> {
    let (x1, y1, x2, y2) = detected.as_x1y1_x2y2();
    let rect = PixelRect::new(x1, y1, x2, y2);
    let width_px = detected.width_px();

    if calibration.capture(width_px) {
        return Some(AnnotationInstruction::boxed(
            AnnotationKind::Reference { width_px },
            rect,
            REFERENCE_COLOUR,
            REFERENCE_LABEL.to_string(),
            text,
        ));
    }

    match calibration.measure(width_px, detected.height_px()) {
        Some((width_cm, height_cm)) => Some(AnnotationInstruction::boxed(
            AnnotationKind::Measured { width_cm, height_cm },
            rect,
            MEASURED_COLOUR,
            measurement_label(width_cm, height_cm),
            text,
        )),
        None => {
            log::warn!("Skipping box {:?}: no reference and it cannot become one", detected.as_x1y1_x2y2());
            None
        }
    }
}

/// Owns the calibration for a session and applies [`EngineCommand`]s to it.
#[derive(Debug, Clone)]
pub struct MeasureEngine<M> {
    calibration: CalibrationState,
    text: M,
}

impl<M: TextMeasure> MeasureEngine<M> {
    pub fn new(text: M) -> Self {
        Self::with_reference_width(text, REFERENCE_WIDTH_CM)
    }

    pub fn with_reference_width(text: M, reference_width_cm: f64) -> Self {
        Self {
            calibration: CalibrationState::new(reference_width_cm),
            text,
        }
    }

    pub fn calibration(&self) -> &CalibrationState {
        &self.calibration
    }

    pub fn text_measure(&self) -> &M {
        &self.text
    }

    pub fn annotate(&mut self, boxes: &[DetectedBox]) -> Vec<AnnotationInstruction> {
        let was_set = self.calibration.is_set();
        let instructions = annotate(boxes, &mut self.calibration, &self.text);

        if !was_set {
            if let Some(width) = self.calibration.reference_pixel_width() {
                log::info!(
                    "Reference set: {}px = {}cm (epoch {})",
                    width,
                    self.calibration.reference_physical_width(),
                    self.calibration.epoch()
                );
            }
        }

        instructions
    }

    pub fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::ResetCalibration => {
                self.calibration.reset();
                log::info!("Reference object reset. Next detected object will become reference.");
            }
        }
    }
}
