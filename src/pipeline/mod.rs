// src/pipeline/mod.rs

pub mod frame_context;
pub mod frame_decision;
pub mod metrics;
pub mod orchestrator;

pub use frame_context::{FrameContext, FrameOutcome};
pub use frame_decision::FrameDecisionPipeline;
pub use metrics::{MetricsSummary, PipelineMetrics};
pub use orchestrator::StreamOrchestrator;
