pub mod settings;

pub use settings::{CaptureSettings, RawSkipRate, Settings, ThrottleSettings};
