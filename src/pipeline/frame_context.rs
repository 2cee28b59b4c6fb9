// src/pipeline/frame_context.rs
//
// Everything the external collaborators produced for one frame, and what the
// decision core hands back for the renderer.

use crate::interface::{Detector, Segmenter};
use crate::lane_clearance::LaneMask;
use crate::types::{AdvisoryLabel, Detection, Frame};
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct FrameContext {
    pub frame_id: u64,
    pub timestamp_ms: f64,
    pub frame_width: usize,
    pub frame_height: usize,
    pub detections: Vec<Detection>,
    pub lane_mask: Option<LaneMask>,
}

impl FrameContext {
    pub fn new(frame_id: u64, timestamp_ms: f64, frame_width: usize, frame_height: usize) -> Self {
        Self {
            frame_id,
            timestamp_ms,
            frame_width,
            frame_height,
            detections: Vec::new(),
            lane_mask: None,
        }
    }

    /// Run the collaborators on `frame`. The segmenter is optional; without it
    /// the frame carries no lane verdict.
    pub fn from_collaborators<D, S>(
        frame_id: u64,
        frame: &Frame,
        detector: &mut D,
        segmenter: Option<&mut S>,
    ) -> Result<Self>
    where
        D: Detector + ?Sized,
        S: Segmenter + ?Sized,
    {
        let mut ctx = Self::new(frame_id, frame.timestamp_ms, frame.width, frame.height);
        ctx.detections = detector
            .detect(frame)
            .with_context(|| format!("Detector failed on frame {}", frame_id))?;
        if let Some(segmenter) = segmenter {
            ctx.lane_mask = Some(
                segmenter
                    .segment(frame)
                    .with_context(|| format!("Segmenter failed on frame {}", frame_id))?,
            );
        }
        Ok(ctx)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameOutcome {
    pub frame_id: u64,
    pub timestamp_ms: f64,
    pub labels: Vec<AdvisoryLabel>,
    /// `None` when no mask was supplied or the mask violated the shape contract
    pub left_lane_clear: Option<bool>,
}

impl FrameOutcome {
    pub fn unsafe_count(&self) -> usize {
        self.labels.iter().filter(|l| !l.surpassable).count()
    }
}
