//! Packed RGB to NV21 encoding
//!
//! The inverse of the decoder, used to synthesize camera frames (test
//! patterns, fixtures). Full-range BT.601; chroma is averaged over each
//! 2x2 block.

use super::frame::{unpack_rgb, FrameSize};

/// Encode packed `0x00RRGGBB` pixels as an NV21 frame.
///
/// # Panics
/// Panics if `rgb` does not hold exactly `size.pixel_count()` pixels.
pub fn encode_nv21(rgb: &[u32], size: FrameSize) -> Vec<u8> {
    assert_eq!(
        rgb.len(),
        size.pixel_count(),
        "encode_nv21: {} pixels for a {size} frame",
        rgb.len()
    );

    let width = size.width() as usize;
    let mut raw = Vec::with_capacity(size.frame_len());

    raw.extend(rgb.iter().map(|&px| {
        let [r, g, b] = unpack_rgb(px);
        to_byte(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
    }));

    for pair in rgb.chunks_exact(width * 2) {
        let (top, bottom) = pair.split_at(width);
        for x in (0..width).step_by(2) {
            let (mut r, mut g, mut b) = (0.0f32, 0.0f32, 0.0f32);
            for px in [top[x], top[x + 1], bottom[x], bottom[x + 1]] {
                let [pr, pg, pb] = unpack_rgb(px);
                r += pr as f32;
                g += pg as f32;
                b += pb as f32;
            }
            let (r, g, b) = (r / 4.0, g / 4.0, b / 4.0);
            let v = 0.5 * r - 0.418688 * g - 0.081312 * b + 128.0;
            let u = -0.168736 * r - 0.331264 * g + 0.5 * b + 128.0;
            raw.push(to_byte(v));
            raw.push(to_byte(u));
        }
    }

    raw
}

#[inline]
fn to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yuv::decoder::decode;
    use crate::yuv::frame::pack_rgb;

    #[test]
    fn test_encode_layout() {
        let size = FrameSize::new(4, 2).unwrap();
        let raw = encode_nv21(&[0x00FF_FFFF; 8], size);
        assert_eq!(raw.len(), size.frame_len());
        assert!(raw[..8].iter().all(|&y| y == 255));
        assert_eq!(&raw[8..], &[128, 128, 128, 128]);
    }

    #[test]
    fn test_encode_decode_primaries() {
        let size = FrameSize::new(2, 2).unwrap();
        let mut out = vec![0u32; 4];
        for (r, g, b) in [(255, 0, 0), (0, 255, 0), (0, 0, 255), (200, 120, 40)] {
            let raw = encode_nv21(&[pack_rgb(r, g, b); 4], size);
            decode(&raw, &mut out, size);
            let [dr, dg, db] = unpack_rgb(out[0]);
            // Decoder coefficients differ slightly from the JFIF encoder's.
            assert!((dr as i32 - r as i32).abs() <= 8, "red {dr} for {r},{g},{b}");
            assert!((dg as i32 - g as i32).abs() <= 8, "green {dg} for {r},{g},{b}");
            assert!((db as i32 - b as i32).abs() <= 8, "blue {db} for {r},{g},{b}");
        }
    }
}
