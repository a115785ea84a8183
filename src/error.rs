use thiserror::Error;
use vision_core::{DecodeError, FrameSize, FrameSizeError, ParseVisionError, SkipRateError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Frame precondition violated for {size}: {source}")]
    Precondition {
        size: FrameSize,
        #[source]
        source: DecodeError,
    },

    #[error("No capture device attached")]
    NotAttached,

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Cannot {action} a capture session that is {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("Truncated frame: got {got} of {expected} bytes")]
    TruncatedFrame { got: usize, expected: usize },

    #[error("Invalid frame size: {0}")]
    FrameSize(#[from] FrameSizeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid skip rate: {0}")]
    SkipRate(#[from] SkipRateError),

    #[error("Invalid capture size: {0}")]
    FrameSize(#[from] FrameSizeError),

    #[error("Invalid vision: {0}")]
    Vision(#[from] ParseVisionError),

    #[error("Settings watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
