//! Color filters
//!
//! A [`ColorMatrix`] is the value handed to the renderer with every frame.
//! The [`lms`] module derives dichromat simulation matrices from cone
//! response space.
//!
//! # Example
//!
//! ```
//! use vision_core::color::{lms, ColorMatrix};
//!
//! let protan = ColorMatrix::from_rgb3(lms::dichromat_matrix(lms::Cone::Long));
//! // white stays white
//! assert_eq!(protan.apply(0x00FF_FFFF), 0x00FF_FFFF);
//! ```

pub mod lms;
mod matrix;

pub use matrix::ColorMatrix;
