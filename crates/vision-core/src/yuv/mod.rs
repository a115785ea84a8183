//! YUV 4:2:0 semi-planar frames
//!
//! Camera previews arrive as NV21: a full-resolution luma plane followed by
//! an interleaved `V, U` chroma plane at half resolution in both directions.
//! This module sizes those frames, decodes them into a reusable
//! [`RgbBuffer`], and encodes RGB back into NV21 for synthetic sources.

mod decoder;
mod encoder;
mod frame;
mod lut;

pub use decoder::{check_lengths, decode, try_decode, DecodeError};
pub use encoder::encode_nv21;
pub use frame::{pack_rgb, unpack_rgb, FrameSize, FrameSizeError, RgbBuffer};
