//! Simulated vision variants and the selection cycle over them

mod cycle;
mod transform;

pub use cycle::VisionCycle;
pub use transform::{CaptureHint, ParseVisionError, Vision};
