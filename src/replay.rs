// src/replay.rs
//
// Drives the decision core from recorded detector/segmenter output.
// Input: one JSON object per line (FrameRecord). Output: one FrameOutcome per line.

use crate::error::DecisionError;
use crate::interface::{Detector, Segmenter};
use crate::lane_clearance::LaneMask;
use crate::pipeline::{MetricsSummary, StreamOrchestrator};
use crate::types::{Config, Detection, Frame, ReplayConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const REPLAY_EXTENSIONS: [&str; 2] = ["jsonl", "JSONL"];

/// Collaborator output captured for one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_id: u64,
    #[serde(default)]
    pub timestamp_ms: f64,
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub detections: Vec<Detection>,
    #[serde(default)]
    pub lane_mask: Option<LaneMask>,
}

/// Recorded detector output for one frame.
pub struct RecordedDetections(Vec<Detection>);

/// Recorded segmenter output for one frame.
pub struct RecordedMask(Option<LaneMask>);

impl FrameRecord {
    /// Split into the frame and the collaborators that replay its recorded output.
    pub fn into_parts(self) -> (Frame, RecordedDetections, Option<RecordedMask>) {
        let frame = Frame {
            data: Vec::new(),
            width: self.width,
            height: self.height,
            timestamp_ms: self.timestamp_ms,
        };
        let mask = self.lane_mask.map(|m| RecordedMask(Some(m)));
        (frame, RecordedDetections(self.detections), mask)
    }
}

impl Detector for RecordedDetections {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>> {
        Ok(std::mem::take(&mut self.0))
    }
}

impl Segmenter for RecordedMask {
    fn segment(&mut self, _frame: &Frame) -> Result<LaneMask> {
        self.0
            .take()
            .context("Recorded lane mask was already consumed")
    }
}

pub struct ReplaySource {
    config: ReplayConfig,
}

impl ReplaySource {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn find_replay_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.config.input_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if REPLAY_EXTENSIONS.contains(&ext) {
                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        info!("Found {} replay file(s)", files.len());
        Ok(files)
    }

    pub fn output_path(&self, input_path: &Path) -> PathBuf {
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "stream".to_string());
        PathBuf::from(&self.config.output_dir).join(format!("{}_advisories.jsonl", stem))
    }
}

pub struct ReplayReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl ReplayReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open replay {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }

    /// Next frame, skipping blank lines. `Ok(None)` at end of stream.
    pub fn next_frame(&mut self) -> Result<Option<FrameRecord>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = line.with_context(|| {
                format!("Failed to read {}:{}", self.path.display(), self.line_no)
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).with_context(|| {
                format!("Malformed frame at {}:{}", self.path.display(), self.line_no)
            })?;
            return Ok(Some(record));
        }
        Ok(None)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamReport {
    pub stream: String,
    pub output_path: PathBuf,
    pub tracked_ids: usize,
    /// Frames dropped because they did not advance the stream
    pub rejected_frames: usize,
    pub metrics: MetricsSummary,
}

/// Replay one recorded stream through its own orchestrator and write the outcomes.
pub fn replay_stream(input_path: &Path, config: &Config) -> Result<StreamReport> {
    let source = ReplaySource::new(config.replay.clone());
    let output_path = source.output_path(input_path);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let stream = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input_path.display().to_string());
    info!("▶ Replaying {} → {}", input_path.display(), output_path.display());

    let mut reader = ReplayReader::open(input_path)?;
    let mut writer = BufWriter::new(
        File::create(&output_path)
            .with_context(|| format!("Failed to create {}", output_path.display()))?,
    );
    let mut orchestrator = StreamOrchestrator::new(stream.clone(), config);
    let mut rejected_frames = 0usize;

    while let Some(record) = reader.next_frame()? {
        let frame_id = record.frame_id;
        let (frame, mut detector, mut segmenter) = record.into_parts();
        let outcome =
            match orchestrator.run_frame(frame_id, &frame, &mut detector, segmenter.as_mut()) {
                Ok(outcome) => outcome,
                Err(e) => match e.downcast_ref::<DecisionError>() {
                    Some(DecisionError::OutOfOrderFrame { .. }) => {
                        warn!("[{}] Skipping frame: {}", stream, e);
                        rejected_frames += 1;
                        continue;
                    }
                    _ => return Err(e),
                },
            };

        if outcome.unsafe_count() > 0 {
            debug!(
                "[{}] Frame {}: {} unsafe advisory(ies)",
                stream,
                frame_id,
                outcome.unsafe_count()
            );
        }

        serde_json::to_writer(&mut writer, &outcome)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    let metrics = orchestrator.metrics().summary();
    info!(
        "✓ [{}] {} frames, {} advisories ({} unsafe), {} degenerate box(es) skipped",
        stream,
        metrics.total_frames,
        metrics.advisories,
        metrics.unsafe_advisories,
        metrics.degenerate_skipped
    );

    Ok(StreamReport {
        stream,
        output_path,
        tracked_ids: orchestrator.history().len(),
        rejected_frames,
        metrics,
    })
}
