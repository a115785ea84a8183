pub mod capture;
pub mod controller;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod settings_watcher;

pub use capture::{CaptureDevice, RawFileCapture, TestPatternCapture};
pub use controller::VisionController;
pub use pipeline::{FrameOutcome, FramePipeline, PipelineStats};
pub use render::{DrawGuard, RenderTarget};
pub use session::{CaptureSession, SessionState};
pub use settings_watcher::{SettingsChanged, SettingsWatcher};
