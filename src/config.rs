// src/config.rs

use crate::error::DecisionError;
use crate::types::{
    CalibrationConfig, ClassesConfig, Config, LoggingConfig, ReplayConfig, SafetyConfig,
    TrackingConfig,
};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject calibration values that would make distances or averages meaningless.
    pub fn validate(&self) -> std::result::Result<(), DecisionError> {
        let cal = &self.calibration;
        if !(cal.reference_width_m.is_finite() && cal.reference_width_m > 0.0) {
            return Err(DecisionError::InvalidConfig(format!(
                "calibration.reference_width_m must be positive, got {}",
                cal.reference_width_m
            )));
        }
        if !(cal.focal_length_px.is_finite() && cal.focal_length_px > 0.0) {
            return Err(DecisionError::InvalidConfig(format!(
                "calibration.focal_length_px must be positive, got {}",
                cal.focal_length_px
            )));
        }
        if self.tracking.window_size == 0 {
            return Err(DecisionError::InvalidConfig(
                "tracking.window_size must be at least 1".to_string(),
            ));
        }
        let safety = self.safety.safety_distance_m;
        if !(safety.is_finite() && safety > 0.0) {
            return Err(DecisionError::InvalidConfig(format!(
                "safety.safety_distance_m must be positive, got {}",
                safety
            )));
        }
        if self.replay.max_parallel_streams == 0 {
            return Err(DecisionError::InvalidConfig(
                "replay.max_parallel_streams must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            reference_width_m: 1.95, // average car width
            focal_length_px: 700.0,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            stale_after_frames: None,
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            safety_distance_m: 70.0,
            unknown_is_surpassable: true,
        }
    }
}

impl Default for ClassesConfig {
    fn default() -> Self {
        let names = [
            (1, "bicycle"),
            (2, "car"),
            (3, "motorcycle"),
            (4, "airplane"),
            (5, "bus"),
            (6, "train"),
            (7, "truck"),
            (15, "cat"),
            (16, "dog"),
            (17, "horse"),
            (18, "sheep"),
            (19, "cow"),
        ]
        .into_iter()
        .map(|(id, name)| (id, name.to_string()))
        .collect::<BTreeMap<u32, String>>();

        Self {
            filter_enabled: true,
            names,
        }
    }
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            input_dir: "replays".to_string(),
            output_dir: "output".to_string(),
            max_parallel_streams: 4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
