//! Common test infrastructure for Impaired Vision integration tests.
//!
//! Each test file compiles its own copy of this module, so items may appear
//! unused from the perspective of a single test file even though they're
//! used elsewhere.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod doubles;
pub mod fixtures;

pub use doubles::{DeviceEvent, DeviceLog, DrawnFrame, RecordingTarget, ScriptedCapture};
pub use fixtures::*;
