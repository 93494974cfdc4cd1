use std::path::{Path, PathBuf};
use ab_glyph::{FontArc, PxScale};
use anyhow::Context;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use crate::common::{AnnotationInstruction, PixelRect, TextMeasure};

/// Label glyph height in pixels.
pub const LABEL_SCALE: f32 = 22.0;
/// Outline thickness of detection boxes.
pub const BOX_THICKNESS: u32 = 2;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
];

const USER_FONT_CANDIDATES: &[&str] = &["DejaVuSansMono.ttf", "DejaVuSans.ttf"];

/// First well-known font present on this machine, user fonts before system-wide ones.
pub fn find_system_font() -> Option<PathBuf> {
    let user_fonts = dirs::font_dir()
        .into_iter()
        .flat_map(|dir| USER_FONT_CANDIDATES.iter().map(move |name| dir.join(name)));

    user_fonts
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from))
        .find(|path| path.is_file())
}

/// Measures label text with the same font and scale the renderer draws it with.
#[derive(Clone)]
pub struct FontMeasure {
    font: FontArc,
    scale: PxScale,
}

impl std::fmt::Debug for FontMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMeasure").field("scale", &self.scale).finish()
    }
}

impl FontMeasure {
    pub fn new(font: FontArc, scale: f32) -> Self {
        Self {
            font,
            scale: PxScale::from(scale),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse font {}: {}", path.display(), e))?;
        Ok(Self::new(font, LABEL_SCALE))
    }
}

impl TextMeasure for FontMeasure {
    fn text_size(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }
}

/// Draws annotation instructions onto frames.
///
/// Without a font, outlines and label backgrounds are still drawn but label text is skipped.
#[derive(Debug)]
pub struct FrameRenderer {
    font: Option<FontMeasure>,
    warned_no_font: bool,
}

impl FrameRenderer {
    pub fn new(font: Option<FontMeasure>) -> Self {
        Self {
            font,
            warned_no_font: false,
        }
    }

    pub fn font(&self) -> Option<&FontMeasure> {
        self.font.as_ref()
    }

    /// Returns an annotated copy of `frame`; the frame itself is left untouched.
    pub fn render(&mut self, frame: &RgbImage, instructions: &[AnnotationInstruction]) -> RgbImage {
        let mut canvas = frame.clone();
        self.draw(&mut canvas, instructions);
        canvas
    }

    /// Applies each instruction in order; later instructions paint over earlier ones.
    pub fn draw(&mut self, canvas: &mut RgbImage, instructions: &[AnnotationInstruction]) {
        for instruction in instructions {
            if let Some(rect) = &instruction.rect {
                draw_outline(canvas, rect, Rgb(instruction.rect_colour), BOX_THICKNESS);
            }

            if let Some(background) = instruction.label_background.as_ref().and_then(to_rect) {
                draw_filled_rect_mut(canvas, background, Rgb(instruction.label_background_colour));
            }

            self.draw_label(canvas, instruction);
        }
    }

    fn draw_label(&mut self, canvas: &mut RgbImage, instruction: &AnnotationInstruction) {
        match &self.font {
            Some(font) => {
                let (x, y) = instruction.label_origin;
                draw_text_mut(canvas, Rgb(instruction.label_colour), x, y, font.scale, &font.font, &instruction.label);
            }
            None => {
                if !self.warned_no_font {
                    log::warn!("No font loaded, label text will not be drawn");
                    self.warned_no_font = true;
                }
            }
        }
    }
}

fn to_rect(rect: &PixelRect) -> Option<Rect> {
    let (w, h) = (rect.width(), rect.height());
    if w == 0 || h == 0 {
        return None;
    }
    Some(Rect::at(rect.x1, rect.y1).of_size(w, h))
}

/// Outline drawn inward from the rectangle's edges, `thickness` pixels wide.
fn draw_outline(canvas: &mut RgbImage, rect: &PixelRect, colour: Rgb<u8>, thickness: u32) {
    for t in 0..thickness as i32 {
        let inset = PixelRect::new(rect.x1 + t, rect.y1 + t, rect.x2 - t, rect.y2 - t);
        if let Some(r) = to_rect(&inset) {
            draw_hollow_rect_mut(canvas, r, colour);
        }
    }
}
