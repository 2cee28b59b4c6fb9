// src/interface.rs
//
// Boundaries to the model-backed collaborators. The decision core never runs
// inference itself; anything that can produce detections or a lane mask for a
// frame plugs in here (an ONNX session, a recorded replay, a test fake).

use crate::lane_clearance::LaneMask;
use crate::types::{Detection, Frame};
use anyhow::Result;

/// Object detector + multi-object tracker. Tracker ids must be stable per object.
pub trait Detector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>>;
}

/// Lane segmenter. The returned mask must match the frame's resolution.
pub trait Segmenter {
    fn segment(&mut self, frame: &Frame) -> Result<LaneMask>;
}
