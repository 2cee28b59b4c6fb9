// src/distance.rs
//
// Monocular range from apparent width (inverse pinhole projection).
// Accuracy depends on the object matching the configured reference width.

use crate::types::CalibrationConfig;

#[derive(Debug, Clone, Copy)]
pub struct DistanceEstimator {
    reference_width_m: f64,
    focal_length_px: f64,
}

impl DistanceEstimator {
    pub fn new(calibration: &CalibrationConfig) -> Self {
        Self {
            reference_width_m: calibration.reference_width_m,
            focal_length_px: calibration.focal_length_px,
        }
    }

    /// Distance in meters to an object spanning `pixel_width` pixels.
    ///
    /// Only defined for `pixel_width > 0`; callers drop degenerate boxes first.
    pub fn estimate(&self, pixel_width: f64) -> f64 {
        (self.reference_width_m * self.focal_length_px) / pixel_width
    }
}
