// src/pipeline/orchestrator.rs
//
// Owns one stream's track state. Streams never share an orchestrator; frames of
// a stream must arrive in increasing frame_id order or the sliding windows
// would mix past and future samples.

use super::frame_context::{FrameContext, FrameOutcome};
use super::frame_decision::FrameDecisionPipeline;
use super::metrics::PipelineMetrics;
use crate::classes::ClassFilter;
use crate::error::DecisionError;
use crate::interface::{Detector, Segmenter};
use crate::lane_clearance::LaneClearanceChecker;
use crate::track_history::TrackHistory;
use crate::types::{Config, Direction, Frame};
use anyhow::Result;
use tracing::{debug, warn};

pub struct StreamOrchestrator {
    stream: String,
    pipeline: FrameDecisionPipeline,
    history: TrackHistory,
    class_filter: ClassFilter,
    stale_after_frames: Option<u64>,
    metrics: PipelineMetrics,
    last_frame_id: Option<u64>,
}

impl StreamOrchestrator {
    pub fn new(stream: impl Into<String>, config: &Config) -> Self {
        Self {
            stream: stream.into(),
            pipeline: FrameDecisionPipeline::new(config),
            history: TrackHistory::new(config.tracking.window_size),
            class_filter: ClassFilter::new(&config.classes),
            stale_after_frames: config.tracking.stale_after_frames,
            metrics: PipelineMetrics::new(),
            last_frame_id: None,
        }
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    pub fn history(&self) -> &TrackHistory {
        &self.history
    }

    /// Decide one frame. Rejects frames that do not advance the stream.
    pub fn process_frame(&mut self, ctx: FrameContext) -> Result<FrameOutcome, DecisionError> {
        if let Some(last) = self.last_frame_id {
            if ctx.frame_id <= last {
                warn!(
                    "[{}] Frame {} arrived after frame {}, rejecting",
                    self.stream, ctx.frame_id, last
                );
                return Err(DecisionError::OutOfOrderFrame {
                    frame_id: ctx.frame_id,
                    last_frame_id: last,
                });
            }
        }
        self.last_frame_id = Some(ctx.frame_id);
        self.history.begin_frame(ctx.frame_id);

        let m = &self.metrics;
        m.inc(&m.total_frames);
        m.add(&m.total_detections, ctx.detections.len() as u64);

        let before_filter = ctx.detections.len();
        let detections = self.class_filter.retain(ctx.detections);
        m.add(&m.filtered_detections, (before_filter - detections.len()) as u64);

        let labels = self.pipeline.process(&detections, &mut self.history);
        m.add(&m.degenerate_skipped, (detections.len() - labels.len()) as u64);
        m.add(&m.advisories, labels.len() as u64);
        for label in &labels {
            if !label.surpassable {
                m.inc(&m.unsafe_advisories);
            }
            if label.direction == Direction::Unknown {
                m.inc(&m.unknown_direction);
            }
        }

        let left_lane_clear = ctx.lane_mask.as_ref().and_then(|mask| {
            m.inc(&m.frames_with_mask);
            match LaneClearanceChecker::check_frame(mask, ctx.frame_width, ctx.frame_height) {
                Ok(clear) => {
                    if clear {
                        m.inc(&m.left_lane_clear_frames);
                    }
                    Some(clear)
                }
                Err(e) => {
                    warn!("[{}] Frame {}: {}", self.stream, ctx.frame_id, e);
                    m.inc(&m.mask_contract_violations);
                    None
                }
            }
        });

        if let Some(max_age) = self.stale_after_frames {
            let evicted = self.history.evict_stale(ctx.frame_id, max_age);
            if evicted > 0 {
                debug!("[{}] Evicted {} stale track(s)", self.stream, evicted);
                m.add(&m.evicted_tracks, evicted as u64);
            }
        }

        Ok(FrameOutcome {
            frame_id: ctx.frame_id,
            timestamp_ms: ctx.timestamp_ms,
            labels,
            left_lane_clear,
        })
    }

    /// Pull detections (and optionally a lane mask) from the collaborators for
    /// `frame`, then decide it.
    pub fn run_frame<D, S>(
        &mut self,
        frame_id: u64,
        frame: &Frame,
        detector: &mut D,
        segmenter: Option<&mut S>,
    ) -> Result<FrameOutcome>
    where
        D: Detector + ?Sized,
        S: Segmenter + ?Sized,
    {
        let ctx = FrameContext::from_collaborators(frame_id, frame, detector, segmenter)?;
        Ok(self.process_frame(ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lane_clearance::LaneMask;
    use crate::types::{BoundingBox, Detection};

    struct ScriptedDetector {
        frames: Vec<Vec<Detection>>,
        calls: usize,
    }

    impl Detector for ScriptedDetector {
        fn detect(&mut self, _frame: &Frame) -> anyhow::Result<Vec<Detection>> {
            let dets = self.frames.get(self.calls).cloned().unwrap_or_default();
            self.calls += 1;
            Ok(dets)
        }
    }

    struct FixedSegmenter {
        mask: LaneMask,
    }

    impl Segmenter for FixedSegmenter {
        fn segment(&mut self, _frame: &Frame) -> anyhow::Result<LaneMask> {
            Ok(self.mask.clone())
        }
    }

    struct FailingSegmenter;

    impl Segmenter for FailingSegmenter {
        fn segment(&mut self, _frame: &Frame) -> anyhow::Result<LaneMask> {
            anyhow::bail!("model not loaded")
        }
    }

    fn det(tracker_id: u64, class_id: u32, x_min: f32, x_max: f32) -> Detection {
        Detection {
            bbox: BoundingBox::new(x_min, 100.0, x_max, 140.0),
            confidence: 0.8,
            class_id,
            tracker_id,
        }
    }

    fn ctx(frame_id: u64, detections: Vec<Detection>) -> FrameContext {
        let mut ctx = FrameContext::new(frame_id, frame_id as f64 * 33.3, 60, 30);
        ctx.detections = detections;
        ctx
    }

    fn frame(width: usize, height: usize) -> Frame {
        Frame {
            data: Vec::new(),
            width,
            height,
            timestamp_ms: 0.0,
        }
    }

    #[test]
    fn test_class_filter_and_degenerate_counts() {
        let mut orch = StreamOrchestrator::new("cam0", &Config::default());
        let outcome = orch
            .process_frame(ctx(
                1,
                vec![det(1, 2, 0.0, 50.0), det(2, 0, 0.0, 50.0), det(3, 7, 10.0, 10.0)],
            ))
            .unwrap();

        assert_eq!(outcome.labels.len(), 1);
        assert_eq!(outcome.labels[0].tracker_id, 1);
        assert_eq!(outcome.left_lane_clear, None);

        let summary = orch.metrics().summary();
        assert_eq!(summary.total_frames, 1);
        assert_eq!(summary.total_detections, 3);
        assert_eq!(summary.filtered_detections, 1);
        assert_eq!(summary.degenerate_skipped, 1);
        assert_eq!(summary.advisories, 1);
        assert_eq!(summary.unknown_direction, 1);
    }

    #[test]
    fn test_out_of_order_frame_is_rejected() {
        let mut orch = StreamOrchestrator::new("cam0", &Config::default());
        orch.process_frame(ctx(5, vec![det(1, 2, 0.0, 50.0)])).unwrap();

        let err = orch.process_frame(ctx(5, vec![det(1, 2, 0.0, 50.0)])).unwrap_err();
        assert_eq!(
            err,
            DecisionError::OutOfOrderFrame {
                frame_id: 5,
                last_frame_id: 5
            }
        );
        assert!(orch.process_frame(ctx(3, vec![])).is_err());
        // the rejected frames never touched the window
        assert_eq!(orch.history().get(1).unwrap().len(), 1);
        assert!(orch.process_frame(ctx(6, vec![])).is_ok());
    }

    #[test]
    fn test_lane_mask_verdicts() {
        let mut orch = StreamOrchestrator::new("cam0", &Config::default());

        let mut c = ctx(1, vec![]);
        c.lane_mask = Some(LaneMask::zeros(60, 30));
        assert_eq!(orch.process_frame(c).unwrap().left_lane_clear, Some(true));

        let mut blocked = LaneMask::zeros(60, 30);
        blocked.set(3, 12, 1);
        let mut c = ctx(2, vec![]);
        c.lane_mask = Some(blocked);
        assert_eq!(orch.process_frame(c).unwrap().left_lane_clear, Some(false));

        let mut c = ctx(3, vec![]);
        c.lane_mask = Some(LaneMask::zeros(30, 15));
        assert_eq!(orch.process_frame(c).unwrap().left_lane_clear, None);

        let summary = orch.metrics().summary();
        assert_eq!(summary.frames_with_mask, 3);
        assert_eq!(summary.left_lane_clear_frames, 1);
        assert_eq!(summary.mask_contract_violations, 1);
    }

    #[test]
    fn test_stale_tracks_are_evicted_when_configured() {
        let mut config = Config::default();
        config.tracking.stale_after_frames = Some(2);
        let mut orch = StreamOrchestrator::new("cam0", &config);

        orch.process_frame(ctx(1, vec![det(1, 2, 0.0, 50.0), det(2, 2, 0.0, 40.0)]))
            .unwrap();
        orch.process_frame(ctx(2, vec![det(2, 2, 0.0, 40.0)])).unwrap();
        orch.process_frame(ctx(3, vec![det(2, 2, 0.0, 40.0)])).unwrap();
        assert!(orch.history().get(1).is_some());

        orch.process_frame(ctx(4, vec![det(2, 2, 0.0, 40.0)])).unwrap();
        assert!(orch.history().get(1).is_none());
        assert_eq!(orch.history().get(2).unwrap().len(), 4);
        assert_eq!(orch.metrics().summary().evicted_tracks, 1);
    }

    #[test]
    fn test_tracks_persist_without_eviction_policy() {
        let mut orch = StreamOrchestrator::new("cam0", &Config::default());
        orch.process_frame(ctx(1, vec![det(1, 2, 0.0, 50.0)])).unwrap();
        for frame_id in 2..200 {
            orch.process_frame(ctx(frame_id, vec![])).unwrap();
        }
        assert!(orch.history().get(1).is_some());
    }

    #[test]
    fn test_run_frame_with_collaborators() {
        let mut orch = StreamOrchestrator::new("cam0", &Config::default());
        let mut detector = ScriptedDetector {
            frames: (0..11)
                .map(|i| vec![det(5, 2, 0.0, 50.0 + i as f32)])
                .collect(),
            calls: 0,
        };
        let mut segmenter = FixedSegmenter {
            mask: LaneMask::zeros(1280, 720),
        };
        let f = frame(1280, 720);

        let mut last = None;
        for frame_id in 0..11 {
            last = Some(
                orch.run_frame(frame_id, &f, &mut detector, Some(&mut segmenter))
                    .unwrap(),
            );
        }
        let outcome = last.unwrap();
        // widening box with constant height: area grows past the window mean
        assert_eq!(outcome.labels[0].direction, Direction::Receding);
        assert!(!outcome.labels[0].surpassable);
        assert_eq!(outcome.left_lane_clear, Some(true));
        assert_eq!(outcome.unsafe_count(), 1);
    }

    #[test]
    fn test_run_frame_surfaces_collaborator_errors() {
        let mut orch = StreamOrchestrator::new("cam0", &Config::default());
        let mut detector = ScriptedDetector {
            frames: vec![],
            calls: 0,
        };
        let result = orch.run_frame(0, &frame(10, 10), &mut detector, Some(&mut FailingSegmenter));
        assert!(result.is_err());
    }

    #[test]
    fn test_independent_streams_do_not_share_state() {
        let config = Config::default();
        let mut a = StreamOrchestrator::new("a", &config);
        let mut b = StreamOrchestrator::new("b", &config);
        for frame_id in 0..10 {
            a.process_frame(ctx(frame_id, vec![det(1, 2, 0.0, 50.0)])).unwrap();
        }
        let outcome = b.process_frame(ctx(0, vec![det(1, 2, 0.0, 50.0)])).unwrap();
        assert_eq!(outcome.labels[0].direction, Direction::Unknown);
        assert_eq!(a.history().get(1).unwrap().len(), 10);
    }
}
