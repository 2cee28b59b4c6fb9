// src/lane_clearance.rs
//
// Left-lane clearance from a binary lane-segmentation mask.
// The mask must already be upsampled to the detection frame's resolution.

use crate::error::DecisionError;
use serde::{Deserialize, Serialize};

/// Row-major binary grid; nonzero marks lane-marking pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLaneMask")]
pub struct LaneMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

#[derive(Deserialize)]
struct RawLaneMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl TryFrom<RawLaneMask> for LaneMask {
    type Error = DecisionError;

    fn try_from(raw: RawLaneMask) -> Result<Self, Self::Error> {
        LaneMask::new(raw.width, raw.height, raw.data)
    }
}

impl LaneMask {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DecisionError> {
        let expected = width
            .checked_mul(height)
            .ok_or(DecisionError::MaskTooLarge { width, height })?;
        if data.len() != expected {
            return Err(DecisionError::MaskBufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }
}

pub struct LaneClearanceChecker;

impl LaneClearanceChecker {
    /// True when no pixel in columns `0 .. width / 3` is set.
    pub fn is_clear(mask: &LaneMask) -> bool {
        let left_cols = mask.width() / 3;
        (0..mask.height()).all(|y| mask.row(y)[..left_cols].iter().all(|&px| px == 0))
    }

    /// `is_clear` with the shape contract enforced against the frame the detections
    /// came from. A mismatched mask is an error, never a guessed answer.
    pub fn check_frame(
        mask: &LaneMask,
        frame_width: usize,
        frame_height: usize,
    ) -> Result<bool, DecisionError> {
        if mask.width() != frame_width || mask.height() != frame_height {
            return Err(DecisionError::MaskShapeMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                frame_width,
                frame_height,
            });
        }
        Ok(Self::is_clear(mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_zero_mask_is_clear() {
        assert!(LaneClearanceChecker::is_clear(&LaneMask::zeros(30, 20)));
    }

    #[test]
    fn test_marking_in_first_column_blocks() {
        let mut mask = LaneMask::zeros(30, 20);
        mask.set(0, 19, 1);
        assert_eq!(mask.get(0, 19), Some(1));
        assert!(!LaneClearanceChecker::is_clear(&mask));
    }

    #[test]
    fn test_left_third_boundary() {
        // width 30 -> left third is columns 0..=9
        let mut mask = LaneMask::zeros(30, 4);
        mask.set(29, 2, 1);
        mask.set(10, 0, 1);
        assert!(LaneClearanceChecker::is_clear(&mask));

        mask.set(9, 3, 1);
        assert!(!LaneClearanceChecker::is_clear(&mask));
    }

    #[test]
    fn test_any_nonzero_value_counts() {
        let mut mask = LaneMask::zeros(9, 1);
        mask.set(2, 0, 255);
        assert!(!LaneClearanceChecker::is_clear(&mask));
    }

    #[test]
    fn test_buffer_size_is_validated() {
        let err = LaneMask::new(10, 10, vec![0; 99]).unwrap_err();
        assert_eq!(
            err,
            DecisionError::MaskBufferSize {
                width: 10,
                height: 10,
                expected: 100,
                actual: 99,
            }
        );
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let mask = LaneMask::zeros(640, 360);
        assert!(matches!(
            LaneClearanceChecker::check_frame(&mask, 1280, 720),
            Err(DecisionError::MaskShapeMismatch { .. })
        ));
        assert_eq!(LaneClearanceChecker::check_frame(&mask, 640, 360), Ok(true));
    }

    #[test]
    fn test_deserialize_validates_buffer() {
        let ok: LaneMask =
            serde_json::from_str(r#"{"width":3,"height":1,"data":[1,0,0]}"#).unwrap();
        assert!(!LaneClearanceChecker::is_clear(&ok));

        let bad = serde_json::from_str::<LaneMask>(r#"{"width":3,"height":2,"data":[0,0,0]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_overflowing_dimensions_are_rejected() {
        let err = LaneMask::new(usize::MAX, 2, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            DecisionError::MaskTooLarge {
                width: usize::MAX,
                height: 2,
            }
        );

        let bad = serde_json::from_str::<LaneMask>(
            r#"{"width":9223372036854775808,"height":2,"data":[]}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_get_and_set_stay_in_bounds() {
        let mut mask = LaneMask::zeros(4, 2);
        mask.set(3, 1, 7);
        mask.set(4, 0, 9); // ignored
        assert_eq!(mask.get(3, 1), Some(7));
        assert_eq!(mask.get(0, 0), Some(0));
        assert_eq!(mask.get(4, 0), None);
        assert_eq!(mask.get(0, 2), None);
    }
}
