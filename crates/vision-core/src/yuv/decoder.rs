//! NV21 to packed RGB decoding
//!
//! The luma plane holds one byte per pixel, row-major. It is followed by a
//! half-resolution chroma plane in which every 2x2 luma block shares one
//! interleaved `V, U` byte pair (NV21, the default camera preview layout).
//!
//! Conversion uses full-range luma and BT.601 chroma coefficients:
//!
//! ```text
//! R = Y + 1.370705 * V
//! G = Y - 0.698001 * V - 0.337633 * U
//! B = Y + 1.732446 * U
//! ```
//!
//! with `U` and `V` centered at zero. Each channel is truncated and clamped
//! to `0..=255`.

use std::fmt;

use super::frame::{pack_rgb, FrameSize};
use super::lut::{channel, B_U, G_U, G_V, R_V};

/// Error returned by [`try_decode`] when buffers do not match the frame size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Raw frame has the wrong number of bytes
    FrameLength {
        /// Bytes required for the frame size
        expected: usize,
        /// Bytes received
        actual: usize,
    },
    /// Output buffer has the wrong number of pixels
    BufferLength {
        /// Pixels required for the frame size
        expected: usize,
        /// Pixels available
        actual: usize,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::FrameLength { expected, actual } => {
                write!(f, "raw frame is {} bytes, expected {}", actual, expected)
            }
            DecodeError::BufferLength { expected, actual } => {
                write!(f, "output buffer holds {} pixels, expected {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Check decode preconditions without touching either buffer.
pub fn check_lengths(raw: &[u8], out: &[u32], size: FrameSize) -> Result<(), DecodeError> {
    if raw.len() != size.frame_len() {
        return Err(DecodeError::FrameLength {
            expected: size.frame_len(),
            actual: raw.len(),
        });
    }
    if out.len() != size.pixel_count() {
        return Err(DecodeError::BufferLength {
            expected: size.pixel_count(),
            actual: out.len(),
        });
    }
    Ok(())
}

/// Decode one NV21 frame into `out`, overwriting every pixel.
///
/// # Panics
/// Panics if `raw` or `out` do not match `size`. A mismatch means the
/// capture side was configured for different dimensions, which is a
/// programming error. Use [`try_decode`] where the caller must survive it.
///
/// # Example
/// ```
/// use vision_core::{decode, FrameSize};
///
/// let size = FrameSize::new(2, 2).unwrap();
/// // four white luma samples followed by one neutral V, U pair
/// let raw = [255, 255, 255, 255, 128, 128];
/// let mut out = [0u32; 4];
/// decode(&raw, &mut out, size);
/// assert_eq!(out, [0x00FF_FFFF; 4]);
/// ```
pub fn decode(raw: &[u8], out: &mut [u32], size: FrameSize) {
    if let Err(e) = check_lengths(raw, out, size) {
        panic!("decode precondition violated for {size}: {e}");
    }
    decode_unchecked(raw, out, size);
}

/// Decode one NV21 frame into `out`, reporting length mismatches as errors.
///
/// On error `out` is left untouched.
pub fn try_decode(raw: &[u8], out: &mut [u32], size: FrameSize) -> Result<(), DecodeError> {
    check_lengths(raw, out, size)?;
    decode_unchecked(raw, out, size);
    Ok(())
}

fn decode_unchecked(raw: &[u8], out: &mut [u32], size: FrameSize) {
    let width = size.width() as usize;
    let (luma, chroma) = raw.split_at(size.luma_len());

    let rows = luma.chunks_exact(width).zip(out.chunks_exact_mut(width));
    for (row, (y_row, out_row)) in rows.enumerate() {
        // Two luma rows share one chroma row.
        let start = (row / 2) * width;
        let vu_row = &chroma[start..start + width];

        let blocks = y_row
            .chunks_exact(2)
            .zip(out_row.chunks_exact_mut(2))
            .zip(vu_row.chunks_exact(2));
        for ((y_pair, out_pair), vu) in blocks {
            let v = vu[0] as usize;
            let u = vu[1] as usize;
            let r = R_V[v];
            let g = -(G_V[v] + G_U[u]);
            let b = B_U[u];

            for (&y, px) in y_pair.iter().zip(out_pair.iter_mut()) {
                let y = y as i32;
                *px = pack_rgb(channel(y, r), channel(y, g), channel(y, b));
            }
        }
    }
}
