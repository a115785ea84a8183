pub mod png_sequence;

pub use png_sequence::{rgb_png_bytes, PngCanvas, PngSequenceTarget};
