use std::num::NonZeroU32;
use serde::{Deserialize, Serialize};

/// One-point calibration: the pixel width of the reference object and the physical width it is
/// assumed to have.
///
/// The reference is either unset, or a positive pixel width captured once and held until
/// [`CalibrationState::reset`]. Every reset starts a new calibration epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationState {
    reference_pixel_width: Option<NonZeroU32>,
    reference_physical_width: f64,
    epoch: u64,
}

impl CalibrationState {
    pub fn new(reference_physical_width: f64) -> Self {
        Self {
            reference_pixel_width: None,
            reference_physical_width,
            epoch: 0,
        }
    }

    pub fn is_set(&self) -> bool {
        self.reference_pixel_width.is_some()
    }

    pub fn reference_pixel_width(&self) -> Option<u32> {
        self.reference_pixel_width.map(NonZeroU32::get)
    }

    pub fn reference_physical_width(&self) -> f64 {
        self.reference_physical_width
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Captures `width_px` as the reference if none is held yet.
    ///
    /// Returns `true` when the width was captured. A held reference is never overwritten, and a
    /// zero width is never captured.
    pub fn capture(&mut self, width_px: u32) -> bool {
        if self.reference_pixel_width.is_some() {
            return false;
        }

        match NonZeroU32::new(width_px) {
            Some(width) => {
                self.reference_pixel_width = Some(width);
                log::debug!("Calibration epoch {}: reference captured at {}px", self.epoch, width);
                true
            }
            None => false,
        }
    }

    /// Clears the reference. Resetting an unset calibration leaves it unset.
    pub fn reset(&mut self) {
        self.reference_pixel_width = None;
        self.epoch += 1;
    }

    /// Physical units per pixel, if a reference is held.
    pub fn scale(&self) -> Option<f64> {
        self.reference_pixel_width
            .map(|px| self.reference_physical_width / px.get() as f64)
    }

    /// Converts a pixel extent into physical units as `(width, height)`.
    pub fn measure(&self, width_px: u32, height_px: u32) -> Option<(f64, f64)> {
        let reference = self.reference_pixel_width?.get() as f64;
        Some((
            width_px as f64 * self.reference_physical_width / reference,
            height_px as f64 * self.reference_physical_width / reference,
        ))
    }
}
