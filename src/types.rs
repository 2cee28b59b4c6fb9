// src/types.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calibration: CalibrationConfig,
    pub tracking: TrackingConfig,
    pub safety: SafetyConfig,
    pub classes: ClassesConfig,
    pub replay: ReplayConfig,
    pub logging: LoggingConfig,
}

/// Pinhole camera calibration used for monocular distance estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Assumed real-world width of a tracked object, in meters
    pub reference_width_m: f64,
    /// Camera focal length in pixel units
    pub focal_length_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Number of area samples kept per tracker id (N)
    pub window_size: usize,
    /// Drop tracker ids unseen for more than this many frames. `None` keeps them forever.
    pub stale_after_frames: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Receding objects closer than this are not surpassable
    pub safety_distance_m: f64,
    /// Verdict given to tracks whose direction is still unknown
    pub unknown_is_surpassable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassesConfig {
    /// When false every class reaches the pipeline
    pub filter_enabled: bool,
    pub names: BTreeMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub input_dir: String,
    pub output_dir: String,
    pub max_parallel_streams: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

/// A frame handed over by the video source. Pixel data is opaque to the core.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub timestamp_ms: f64,
}

/// Axis-aligned pixel rectangle `[x_min, y_min] .. [x_max, y_max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BoundingBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        (self.x_max - self.x_min) as f64
    }

    pub fn height(&self) -> f64 {
        (self.y_max - self.y_min) as f64
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

/// One tracked object in one frame, as produced by the detector + tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub class_id: u32,
    pub tracker_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Approaching,
    Receding,
    Unknown,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Approaching => "Approaching",
            Direction::Receding => "Receding",
            Direction::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-detection verdict for the renderer. Recomputed every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryLabel {
    pub tracker_id: u64,
    pub class_id: u32,
    pub direction: Direction,
    pub distance_m: f64,
    pub surpassable: bool,
    pub text: String,
}
