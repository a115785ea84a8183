//! NV21 frame fixtures.

use vision_core::{encode_nv21, FrameSize};

/// Smallest valid frame: 4x2, one row of chroma pairs
pub fn small() -> FrameSize {
    FrameSize::new(4, 2).unwrap()
}

/// Uniform gray frame with neutral chroma
pub fn neutral_frame(size: FrameSize, luma: u8) -> Vec<u8> {
    let mut raw = vec![luma; size.luma_len()];
    raw.resize(size.frame_len(), 128);
    raw
}

pub fn white_frame(size: FrameSize) -> Vec<u8> {
    neutral_frame(size, 255)
}

/// Uniform frame of one packed color
pub fn solid_frame(size: FrameSize, rgb: u32) -> Vec<u8> {
    encode_nv21(&vec![rgb; size.pixel_count()], size)
}

/// A frame two bytes too short for `size`
pub fn short_frame(size: FrameSize) -> Vec<u8> {
    vec![128; size.frame_len() - 2]
}
