#![allow(clippy::excessive_precision, clippy::unreadable_literal)]

//! vision-core: per-frame color pipeline for simulated vision impairments
//!
//! This library turns raw camera preview frames into displayable RGB and
//! supplies the color filters that simulate color vision deficiencies.
//!
//! # Quick Start
//!
//! ```
//! use vision_core::{decode, FrameSize, FrameThrottle, RgbBuffer, VisionCycle};
//!
//! let size = FrameSize::new(4, 2).unwrap();
//! let mut rgb = RgbBuffer::new(size);
//! let mut throttle = FrameThrottle::new();
//! let cycle = VisionCycle::new();
//!
//! let raw = vec![128u8; size.frame_len()];
//! if throttle.should_process() {
//!     decode(&raw, rgb.pixels_mut(), size);
//!     let filter = cycle.advance(5).color_matrix();
//!     let shown: Vec<u32> = rgb.pixels().iter().map(|&px| filter.apply(px)).collect();
//!     assert_eq!(shown.len(), 8);
//! }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! NV21 bytes (capture)
//!     |
//! [FrameThrottle]        skip or process this frame
//!     |
//! [decode]               fixed-point BT.601, into a reused RgbBuffer
//!     |
//! [Vision::color_matrix] filter applied by the renderer at draw time
//! ```
//!
//! # Vision Variants
//!
//! [`Vision`] is a closed set, presented by [`VisionCycle`] in this order:
//!
//! - Normal: identity filter
//! - Myopia: identity filter, asks the camera for macro focus
//! - Protanopia, Deuteranopia, Tritanopia: LMS cone-space projections
//!   (see [`color::lms`])
//! - Achromatopsia: gray from `0.299 R + 0.587 G + 0.114 B`
//! - Achromatopsia + Myopia: the gray filter with macro focus
//!
//! # Frame Throttling
//!
//! [`FrameThrottle`] bounds CPU cost by skipping a configured share of
//! frames. The exact skip pattern is documented on the [`throttle`] module.

pub mod color;
pub mod throttle;
pub mod vision;
pub mod yuv;


pub use color::ColorMatrix;
pub use throttle::{FrameThrottle, SkipRate, SkipRateError};
pub use vision::{CaptureHint, ParseVisionError, Vision, VisionCycle};
pub use yuv::{decode, encode_nv21, try_decode, DecodeError, FrameSize, FrameSizeError, RgbBuffer};
