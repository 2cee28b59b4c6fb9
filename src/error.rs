//! Error types for the decision core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error(
        "Lane mask is {mask_width}x{mask_height} but frame is {frame_width}x{frame_height}"
    )]
    MaskShapeMismatch {
        mask_width: usize,
        mask_height: usize,
        frame_width: usize,
        frame_height: usize,
    },

    #[error("Lane mask buffer holds {actual} pixels, expected {expected} ({width}x{height})")]
    MaskBufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Lane mask dimensions {width}x{height} overflow the pixel count")]
    MaskTooLarge { width: usize, height: usize },

    #[error("Frame {frame_id} arrived after frame {last_frame_id}")]
    OutOfOrderFrame { frame_id: u64, last_frame_id: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
