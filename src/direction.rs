// src/direction.rs
//
// Size-trend motion label. The window average includes the current sample.
// An area above its own recent average is labelled Receding; this inverted
// convention is intentional and must not be flipped without re-deriving it.

use crate::types::Direction;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
pub struct DirectionClassifier {
    window_size: usize,
}

impl DirectionClassifier {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// `history` is the id's window after `current_area` was recorded.
    pub fn classify(&self, history: &VecDeque<f64>, current_area: f64) -> Direction {
        if history.len() < self.window_size {
            return Direction::Unknown;
        }

        let avg = history.iter().sum::<f64>() / history.len() as f64;
        if current_area > avg {
            Direction::Receding
        } else {
            Direction::Approaching
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(values: &[f64]) -> VecDeque<f64> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_unknown_until_window_full() {
        let classifier = DirectionClassifier::new(4);
        assert_eq!(classifier.classify(&window(&[]), 10.0), Direction::Unknown);
        assert_eq!(
            classifier.classify(&window(&[1.0, 2.0, 10.0]), 10.0),
            Direction::Unknown
        );
        assert_ne!(
            classifier.classify(&window(&[1.0, 2.0, 3.0, 10.0]), 10.0),
            Direction::Unknown
        );
    }

    #[test]
    fn test_growing_area_is_receding() {
        let classifier = DirectionClassifier::new(3);
        let history = window(&[100.0, 110.0, 150.0]);
        assert_eq!(classifier.classify(&history, 150.0), Direction::Receding);
    }

    #[test]
    fn test_shrinking_area_is_approaching() {
        let classifier = DirectionClassifier::new(3);
        let history = window(&[150.0, 110.0, 90.0]);
        assert_eq!(classifier.classify(&history, 90.0), Direction::Approaching);
    }

    #[test]
    fn test_tie_resolves_to_approaching() {
        let classifier = DirectionClassifier::new(3);
        let history = window(&[50.0, 50.0, 50.0]);
        assert_eq!(classifier.classify(&history, 50.0), Direction::Approaching);
    }

    #[test]
    fn test_deterministic() {
        let classifier = DirectionClassifier::new(3);
        let history = window(&[10.0, 30.0, 20.0]);
        let first = classifier.classify(&history, 20.0);
        for _ in 0..5 {
            assert_eq!(classifier.classify(&history, 20.0), first);
        }
    }
}
