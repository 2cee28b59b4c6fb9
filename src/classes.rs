// src/classes.rs

use crate::types::{ClassesConfig, Detection};
use std::collections::BTreeMap;
use tracing::debug;

/// Keeps only the road-user classes the advisories are meant for.
#[derive(Debug, Clone)]
pub struct ClassFilter {
    enabled: bool,
    names: BTreeMap<u32, String>,
}

impl ClassFilter {
    pub fn new(config: &ClassesConfig) -> Self {
        Self {
            enabled: config.filter_enabled,
            names: config.names.clone(),
        }
    }

    pub fn accepts(&self, class_id: u32) -> bool {
        !self.enabled || self.names.contains_key(&class_id)
    }

    pub fn name(&self, class_id: u32) -> Option<&str> {
        self.names.get(&class_id).map(String::as_str)
    }

    /// Drop detections of untracked classes, preserving input order.
    pub fn retain(&self, detections: Vec<Detection>) -> Vec<Detection> {
        let total = detections.len();
        let kept: Vec<Detection> = detections
            .into_iter()
            .filter(|d| self.accepts(d.class_id))
            .collect();
        if kept.len() < total {
            debug!("Class filter dropped {} detection(s)", total - kept.len());
        }
        kept
    }
}
