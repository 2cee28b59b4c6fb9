// src/pipeline/metrics.rs
//
// Counters for one stream's decision run. Cloning shares the counters, so a
// reporter can hold a handle while the stream's worker owns the orchestrator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    pub total_frames: Arc<AtomicU64>,
    pub total_detections: Arc<AtomicU64>,
    pub filtered_detections: Arc<AtomicU64>,
    pub degenerate_skipped: Arc<AtomicU64>,
    pub advisories: Arc<AtomicU64>,
    pub unsafe_advisories: Arc<AtomicU64>,
    pub unknown_direction: Arc<AtomicU64>,
    pub frames_with_mask: Arc<AtomicU64>,
    pub left_lane_clear_frames: Arc<AtomicU64>,
    pub mask_contract_violations: Arc<AtomicU64>,
    pub evicted_tracks: Arc<AtomicU64>,
    pub started_at: Instant,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self {
            total_frames: Arc::new(AtomicU64::new(0)),
            total_detections: Arc::new(AtomicU64::new(0)),
            filtered_detections: Arc::new(AtomicU64::new(0)),
            degenerate_skipped: Arc::new(AtomicU64::new(0)),
            advisories: Arc::new(AtomicU64::new(0)),
            unsafe_advisories: Arc::new(AtomicU64::new(0)),
            unknown_direction: Arc::new(AtomicU64::new(0)),
            frames_with_mask: Arc::new(AtomicU64::new(0)),
            left_lane_clear_frames: Arc::new(AtomicU64::new(0)),
            mask_contract_violations: Arc::new(AtomicU64::new(0)),
            evicted_tracks: Arc::new(AtomicU64::new(0)),
            started_at: Instant::now(),
        }
    }

    pub fn inc(&self, counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, counter: &AtomicU64, amount: u64) {
        counter.fetch_add(amount, Ordering::Relaxed);
    }

    pub fn fps(&self) -> f64 {
        let frames = self.total_frames.load(Ordering::Relaxed);
        let elapsed = self.started_at.elapsed().as_secs_f64();
        if elapsed > 0.01 {
            frames as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            total_frames: self.total_frames.load(Ordering::Relaxed),
            total_detections: self.total_detections.load(Ordering::Relaxed),
            filtered_detections: self.filtered_detections.load(Ordering::Relaxed),
            degenerate_skipped: self.degenerate_skipped.load(Ordering::Relaxed),
            advisories: self.advisories.load(Ordering::Relaxed),
            unsafe_advisories: self.unsafe_advisories.load(Ordering::Relaxed),
            unknown_direction: self.unknown_direction.load(Ordering::Relaxed),
            frames_with_mask: self.frames_with_mask.load(Ordering::Relaxed),
            left_lane_clear_frames: self.left_lane_clear_frames.load(Ordering::Relaxed),
            mask_contract_violations: self.mask_contract_violations.load(Ordering::Relaxed),
            evicted_tracks: self.evicted_tracks.load(Ordering::Relaxed),
            fps: self.fps(),
            elapsed_secs: self.started_at.elapsed().as_secs_f64(),
        }
    }
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub total_frames: u64,
    pub total_detections: u64,
    pub filtered_detections: u64,
    pub degenerate_skipped: u64,
    pub advisories: u64,
    pub unsafe_advisories: u64,
    pub unknown_direction: u64,
    pub frames_with_mask: u64,
    pub left_lane_clear_frames: u64,
    pub mask_contract_violations: u64,
    pub evicted_tracks: u64,
    pub fps: f64,
    pub elapsed_secs: f64,
}
