// src/pipeline/frame_decision.rs
//
// Per-frame advisory pass over a detection list. Stateless apart from the
// track store passed in, which must be fed frames in temporal order.

use crate::direction::DirectionClassifier;
use crate::distance::DistanceEstimator;
use crate::safety::SafetyAdvisor;
use crate::track_history::TrackHistory;
use crate::types::{AdvisoryLabel, Config, Detection};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct FrameDecisionPipeline {
    estimator: DistanceEstimator,
    classifier: DirectionClassifier,
    advisor: SafetyAdvisor,
}

impl FrameDecisionPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            estimator: DistanceEstimator::new(&config.calibration),
            classifier: DirectionClassifier::new(config.tracking.window_size),
            advisor: SafetyAdvisor::new(&config.safety),
        }
    }

    /// One label per usable detection, in input order. Boxes with no positive
    /// finite width produce nothing and leave the track store untouched.
    pub fn process(
        &self,
        detections: &[Detection],
        track_store: &mut TrackHistory,
    ) -> Vec<AdvisoryLabel> {
        let mut labels = Vec::with_capacity(detections.len());

        for det in detections {
            let pixel_width = det.bbox.width();
            if !(pixel_width.is_finite() && pixel_width > 0.0) {
                debug!(
                    "Skipping track {}: degenerate box width {:.2}",
                    det.tracker_id, pixel_width
                );
                continue;
            }

            let area = pixel_width * det.bbox.height();
            let record = track_store.record(det.tracker_id, area);
            let direction = self.classifier.classify(record.areas(), area);
            let distance_m = self.estimator.estimate(pixel_width);
            let (surpassable, text) = self.advisor.advise(distance_m, direction);
            track_store.store_last_box(det.tracker_id, det.bbox);

            debug!("Track {}: {}", det.tracker_id, text);

            labels.push(AdvisoryLabel {
                tracker_id: det.tracker_id,
                class_id: det.class_id,
                direction,
                distance_m,
                surpassable,
                text,
            });
        }

        labels
    }
}
