use serde::{Deserialize, Serialize};

/// RGB triple.
pub type Colour = [u8; 3];

pub const REFERENCE_COLOUR: Colour = [0, 255, 0];
pub const MEASURED_COLOUR: Colour = [0, 0, 255];
pub const WARNING_COLOUR: Colour = [255, 0, 0];
pub const LABEL_BACKGROUND_COLOUR: Colour = [255, 255, 255];
pub const LABEL_TEXT_COLOUR: Colour = [0, 0, 0];

pub const REFERENCE_LABEL: &str = "Reference";
pub const NO_DETECTIONS_LABEL: &str = "No objects detected";

/// Baseline of the "no detections" notice.
pub const NO_DETECTIONS_ORIGIN: (i32, i32) = (10, 30);

/// Extra width and height added around label text by its background.
pub const LABEL_PADDING: i32 = 10;
/// Offset of label text from the background's left and top edges.
pub const LABEL_INSET: i32 = 5;

/// Reports the pixel extent `(width, height)` a piece of label text will occupy when drawn.
pub trait TextMeasure {
    fn text_size(&self, text: &str) -> (u32, u32);
}

/// Text extent from a fixed per-character advance, for when no font is loaded.
///
/// The defaults approximate a 0.7 scale simplex font at 2px thickness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub advance: u32,
    pub height: u32,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        Self {
            advance: 13,
            height: 15,
        }
    }
}

impl TextMeasure for FixedAdvance {
    fn text_size(&self, text: &str) -> (u32, u32) {
        (text.chars().count() as u32 * self.advance, self.height)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_size(&self, text: &str) -> (u32, u32) {
        (**self).text_size(text)
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for Box<T> {
    fn text_size(&self, text: &str) -> (u32, u32) {
        (**self).text_size(text)
    }
}

/// Inclusive-exclusive pixel rectangle, `x1 <= x < x2`, `y1 <= y < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl PixelRect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2.saturating_sub(self.x1).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        self.y2.saturating_sub(self.y1).max(0) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotationKind {
    Reference { width_px: u32 },
    Measured { width_cm: f64, height_cm: f64 },
    NoDetections,
}

/// A single drawing directive: an optional box outline, and a label with an optional filled
/// background behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationInstruction {
    pub kind: AnnotationKind,
    pub rect: Option<PixelRect>,
    pub rect_colour: Colour,
    pub label: String,
    /// Top-left corner of the label text.
    pub label_origin: (i32, i32),
    pub label_colour: Colour,
    pub label_background: Option<PixelRect>,
    pub label_background_colour: Colour,
}

impl AnnotationInstruction {
    /// Box outline plus a label sitting on the box's top edge.
    pub fn boxed(kind: AnnotationKind, rect: PixelRect, colour: Colour, label: String, text: &impl TextMeasure) -> Self {
        let (text_w, text_h) = text.text_size(&label);
        let (text_w, text_h) = (text_w as i32, text_h as i32);

        let background = PixelRect::new(
            rect.x1,
            rect.y1 - text_h - LABEL_PADDING,
            rect.x1 + text_w + LABEL_PADDING,
            rect.y1,
        );

        Self {
            kind,
            rect: Some(rect),
            rect_colour: colour,
            label,
            label_origin: (background.x1 + LABEL_INSET, background.y1 + LABEL_INSET),
            label_colour: LABEL_TEXT_COLOUR,
            label_background: Some(background),
            label_background_colour: LABEL_BACKGROUND_COLOUR,
        }
    }

    /// The frame-wide notice shown when nothing was detected.
    pub fn no_detections(text: &impl TextMeasure) -> Self {
        let (_, text_h) = text.text_size(NO_DETECTIONS_LABEL);
        let (x, baseline) = NO_DETECTIONS_ORIGIN;

        Self {
            kind: AnnotationKind::NoDetections,
            rect: None,
            rect_colour: WARNING_COLOUR,
            label: NO_DETECTIONS_LABEL.to_string(),
            label_origin: (x, baseline - text_h as i32),
            label_colour: WARNING_COLOUR,
            label_background: None,
            label_background_colour: LABEL_BACKGROUND_COLOUR,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self.kind, AnnotationKind::Reference { .. })
    }

    pub fn is_measured(&self) -> bool {
        matches!(self.kind, AnnotationKind::Measured { .. })
    }
}

/// Formats a measurement the way labels show it, one decimal place per axis.
pub fn measurement_label(width_cm: f64, height_cm: f64) -> String {
    format!("{:.1}cm x {:.1}cm", width_cm, height_cm)
}
