//! PNG output for rendered frames

use crate::error::RenderError;
use crate::services::RenderTarget;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use vision_core::yuv::unpack_rgb;
use vision_core::{ColorMatrix, FrameSize};

/// Writes every presented frame to `dir` as `frame_NNNNNN.png`.
pub struct PngSequenceTarget {
    dir: PathBuf,
    next_index: u64,
    scratch: Vec<u32>,
    written: u64,
}

/// Canvas handed out by [`PngSequenceTarget`]
pub struct PngCanvas {
    pixels: Vec<u32>,
    size: Option<FrameSize>,
}

impl PngSequenceTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_index: 0,
            scratch: Vec::new(),
            written: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl RenderTarget for PngSequenceTarget {
    type Canvas = PngCanvas;

    fn acquire(&mut self) -> Option<PngCanvas> {
        if !self.dir.is_dir() {
            tracing::debug!(dir = %self.dir.display(), "Output directory unavailable");
            return None;
        }
        Some(PngCanvas {
            pixels: std::mem::take(&mut self.scratch),
            size: None,
        })
    }

    fn draw_pixels(
        &mut self,
        canvas: &mut PngCanvas,
        pixels: &[u32],
        size: FrameSize,
        filter: &ColorMatrix,
    ) {
        canvas.pixels.resize(pixels.len(), 0);
        filter.apply_to(pixels, &mut canvas.pixels);
        canvas.size = Some(size);
    }

    fn release(&mut self, canvas: PngCanvas) -> Result<(), RenderError> {
        let result = match canvas.size {
            Some(size) => {
                // numbered on presentation so undrawn canvases leave no gap
                let path = self.frame_path(self.next_index);
                self.next_index += 1;
                encode_png(&canvas.pixels, size)
                    .and_then(|png| fs::write(&path, png).map_err(RenderError::from))
                    .map(|()| {
                        self.written += 1;
                        tracing::trace!(path = %path.display(), "Wrote frame");
                    })
            }
            None => Ok(()),
        };
        self.scratch = canvas.pixels;
        result
    }
}

/// Encode packed pixels through `filter` as an 8-bit RGB PNG
pub fn rgb_png_bytes(
    pixels: &[u32],
    size: FrameSize,
    filter: &ColorMatrix,
) -> Result<Vec<u8>, RenderError> {
    let mut filtered = vec![0; pixels.len()];
    filter.apply_to(pixels, &mut filtered);
    encode_png(&filtered, size)
}

fn encode_png(pixels: &[u32], size: FrameSize) -> Result<Vec<u8>, RenderError> {
    if pixels.len() != size.pixel_count() {
        return Err(RenderError::PngEncode(format!(
            "{} pixels for a {size} frame",
            pixels.len()
        )));
    }
    let data: Vec<u8> = pixels.iter().flat_map(|&px| unpack_rgb(px)).collect();

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, size.width(), size.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
