//! 4x5 color matrix filter
//!
//! The layout follows the familiar canvas color-matrix convention: four
//! rows (R, G, B, A) of five columns (r, g, b, a, offset), with the offset
//! expressed in 0..255 channel units:
//!
//! ```text
//! R' = m[0]*R  + m[1]*G  + m[2]*B  + m[3]*A  + m[4]
//! G' = m[5]*R  + m[6]*G  + m[7]*B  + m[8]*A  + m[9]
//! B' = m[10]*R + m[11]*G + m[12]*B + m[13]*A + m[14]
//! A' = m[15]*R + m[16]*G + m[17]*B + m[18]*A + m[19]
//! ```
//!
//! Camera pixels carry no alpha, so `A` is taken as fully opaque on input
//! and the alpha row is not written back.

use crate::yuv::{pack_rgb, unpack_rgb};

/// An affine per-pixel color transform applied at render time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    m: [f32; 20],
}

const IDENTITY: [f32; 20] = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0, //
];

impl ColorMatrix {
    /// Wrap a raw row-major 4x5 matrix.
    #[inline]
    pub const fn new(m: [f32; 20]) -> Self {
        Self { m }
    }

    /// The matrix that leaves every pixel unchanged.
    #[inline]
    pub const fn identity() -> Self {
        Self { m: IDENTITY }
    }

    /// Build from a 3x3 RGB mixing matrix (no offsets, alpha untouched).
    pub const fn from_rgb3(rgb: [[f32; 3]; 3]) -> Self {
        let [r, g, b] = rgb;
        Self {
            m: [
                r[0], r[1], r[2], 0.0, 0.0, //
                g[0], g[1], g[2], 0.0, 0.0, //
                b[0], b[1], b[2], 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, 0.0, //
            ],
        }
    }

    /// Collapse color to a single weighted gray replicated into R, G and B.
    pub const fn luminance(wr: f32, wg: f32, wb: f32) -> Self {
        let row = [wr, wg, wb];
        Self::from_rgb3([row, row, row])
    }

    /// Raw row-major coefficients, for renderers that take the matrix as is.
    #[inline]
    pub fn as_array(&self) -> &[f32; 20] {
        &self.m
    }

    pub fn is_identity(&self) -> bool {
        self.m == IDENTITY
    }

    /// Compose two filters: the result applies `inner` first, then `self`.
    ///
    /// # Example
    /// ```
    /// use vision_core::ColorMatrix;
    ///
    /// let gray = ColorMatrix::luminance(0.299, 0.587, 0.114);
    /// assert_eq!(gray.concat(&ColorMatrix::identity()), gray);
    /// ```
    pub fn concat(&self, inner: &ColorMatrix) -> ColorMatrix {
        let a = &self.m;
        let b = &inner.m;
        let mut out = [0.0f32; 20];
        for row in 0..4 {
            for col in 0..5 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += a[row * 5 + k] * b[k * 5 + col];
                }
                if col == 4 {
                    sum += a[row * 5 + 4];
                }
                out[row * 5 + col] = sum;
            }
        }
        ColorMatrix { m: out }
    }

    /// Transform a single `0x00RRGGBB` pixel.
    ///
    /// Channels are rounded and clamped to `0..=255`; the top byte of the
    /// result is always zero.
    #[inline]
    pub fn apply(&self, pixel: u32) -> u32 {
        let [r, g, b] = unpack_rgb(pixel);
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let m = &self.m;
        let row = |i: usize| -> u32 {
            let v = m[i] * r + m[i + 1] * g + m[i + 2] * b + m[i + 3] * 255.0 + m[i + 4];
            v.round().clamp(0.0, 255.0) as u32
        };
        pack_rgb(row(0), row(5), row(10))
    }

    /// Transform every pixel of `pixels` in place.
    pub fn apply_in_place(&self, pixels: &mut [u32]) {
        if self.is_identity() {
            return;
        }
        for px in pixels.iter_mut() {
            *px = self.apply(*px);
        }
    }

    /// Transform `src` into `dst`, leaving `src` untouched.
    ///
    /// # Panics
    /// Panics if the slices differ in length.
    pub fn apply_to(&self, src: &[u32], dst: &mut [u32]) {
        assert_eq!(src.len(), dst.len(), "apply_to: source and destination lengths differ");
        if self.is_identity() {
            dst.copy_from_slice(src);
            return;
        }
        for (out, &px) in dst.iter_mut().zip(src) {
            *out = self.apply(px);
        }
    }
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
