// src/track_history.rs
//
// Per-tracker-id sliding window of bounding-box areas.
// Records are created on first sighting and only removed by `evict_stale`.

use crate::types::BoundingBox;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TrackRecord {
    pub tracker_id: u64,
    areas: VecDeque<f64>,
    last_box: Option<BoundingBox>,
    last_seen_frame: u64,
}

impl TrackRecord {
    fn new(tracker_id: u64, window_size: usize, frame_id: u64) -> Self {
        Self {
            tracker_id,
            areas: VecDeque::with_capacity(window_size),
            last_box: None,
            last_seen_frame: frame_id,
        }
    }

    /// Most recent areas, oldest first.
    pub fn areas(&self) -> &VecDeque<f64> {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn mean_area(&self) -> Option<f64> {
        if self.areas.is_empty() {
            return None;
        }
        Some(self.areas.iter().sum::<f64>() / self.areas.len() as f64)
    }

    pub fn last_box(&self) -> Option<BoundingBox> {
        self.last_box
    }

    pub fn last_seen_frame(&self) -> u64 {
        self.last_seen_frame
    }
}

pub struct TrackHistory {
    records: HashMap<u64, TrackRecord>,
    window_size: usize,
    current_frame: u64,
}

impl TrackHistory {
    pub fn new(window_size: usize) -> Self {
        Self {
            records: HashMap::new(),
            window_size,
            current_frame: 0,
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Mark the frame that subsequent `record` / `store_last_box` calls belong to.
    pub fn begin_frame(&mut self, frame_id: u64) {
        self.current_frame = frame_id;
    }

    /// Append `area` to the id's window, evicting the oldest sample once it holds N.
    pub fn record(&mut self, tracker_id: u64, area: f64) -> &TrackRecord {
        let window_size = self.window_size;
        let frame_id = self.current_frame;
        let record = self
            .records
            .entry(tracker_id)
            .or_insert_with(|| TrackRecord::new(tracker_id, window_size, frame_id));

        record.areas.push_back(area);
        if record.areas.len() > window_size {
            record.areas.pop_front();
        }
        record.last_seen_frame = frame_id;
        record
    }

    pub fn store_last_box(&mut self, tracker_id: u64, bbox: BoundingBox) {
        let window_size = self.window_size;
        let frame_id = self.current_frame;
        let record = self
            .records
            .entry(tracker_id)
            .or_insert_with(|| TrackRecord::new(tracker_id, window_size, frame_id));
        record.last_box = Some(bbox);
        record.last_seen_frame = frame_id;
    }

    pub fn get(&self, tracker_id: u64) -> Option<&TrackRecord> {
        self.records.get(&tracker_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop ids not seen for more than `max_age_frames` frames before `current_frame`.
    /// Returns how many records were removed.
    pub fn evict_stale(&mut self, current_frame: u64, max_age_frames: u64) -> usize {
        let before = self.records.len();
        self.records.retain(|id, record| {
            let age = current_frame.saturating_sub(record.last_seen_frame);
            let keep = age <= max_age_frames;
            if !keep {
                debug!("Evicting track {} (unseen for {} frames)", id, age);
            }
            keep
        });
        before - self.records.len()
    }
}
