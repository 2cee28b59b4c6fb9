// src/safety.rs

use crate::types::{Direction, SafetyConfig};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct SafetyAdvisor {
    safety_distance_m: f64,
    unknown_is_surpassable: bool,
}

impl SafetyAdvisor {
    pub fn new(config: &SafetyConfig) -> Self {
        Self {
            safety_distance_m: config.safety_distance_m,
            unknown_is_surpassable: config.unknown_is_surpassable,
        }
    }

    /// Overtaking is refused only for receding objects inside the safety distance.
    ///
    /// Tracks with too little history (`Direction::Unknown`) get the configured
    /// default, which is "surpassable" unless `unknown_is_surpassable` is turned off.
    pub fn is_surpassable(&self, distance_m: f64, direction: Direction) -> bool {
        match direction {
            Direction::Receding => {
                let too_close = distance_m < self.safety_distance_m;
                !too_close
            }
            Direction::Approaching => true,
            Direction::Unknown => {
                debug!(
                    "Direction unknown at {:.2}m, defaulting to surpassable={}",
                    distance_m, self.unknown_is_surpassable
                );
                self.unknown_is_surpassable
            }
        }
    }

    pub fn advise(&self, distance_m: f64, direction: Direction) -> (bool, String) {
        let surpassable = self.is_surpassable(distance_m, direction);
        (surpassable, format_label(direction, distance_m, surpassable))
    }
}

/// `"<direction>, Distance: <m>m - (<Safe|Unsafe>)"`. Non-finite distances are
/// reported as unavailable instead of printing `NaN` or `inf`.
pub fn format_label(direction: Direction, distance_m: f64, surpassable: bool) -> String {
    let state = if surpassable { "Safe" } else { "Unsafe" };
    if distance_m.is_finite() {
        format!("{}, Distance: {:.2}m - ({})", direction, distance_m, state)
    } else {
        format!("{}, Distance: unavailable - ({})", direction, state)
    }
}
