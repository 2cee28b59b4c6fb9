// src/lib.rs
//
// Per-frame overtaking advisories.
//
// Signal flow:
//   Detector + tracker → Detection list → FrameDecisionPipeline ─┐
//     (distance, size-trend direction, safety verdict)           ├→ FrameOutcome
//   Segmenter → LaneMask → LaneClearanceChecker ─────────────────┘
//
// Orchestrated per stream by pipeline::StreamOrchestrator.

pub mod classes;
pub mod config;
pub mod direction;
pub mod distance;
pub mod error;
pub mod interface;
pub mod lane_clearance;
pub mod pipeline;
pub mod replay;
pub mod safety;
pub mod track_history;
pub mod types;

pub use classes::ClassFilter;
pub use direction::DirectionClassifier;
pub use distance::DistanceEstimator;
pub use error::DecisionError;
pub use interface::{Detector, Segmenter};
pub use lane_clearance::{LaneClearanceChecker, LaneMask};
pub use pipeline::{FrameContext, FrameDecisionPipeline, FrameOutcome, StreamOrchestrator};
pub use safety::SafetyAdvisor;
pub use track_history::{TrackHistory, TrackRecord};
pub use types::{AdvisoryLabel, BoundingBox, Config, Detection, Direction, Frame};
