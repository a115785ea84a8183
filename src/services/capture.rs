//! Frame sources
//!
//! A [`CaptureDevice`] produces NV21 preview frames of a fixed size and
//! accepts focus configuration. Session ordering is enforced one level up
//! by [`CaptureSession`](super::CaptureSession).

use crate::error::CaptureError;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use vision_core::yuv::{pack_rgb, unpack_rgb};
use vision_core::{encode_nv21, CaptureHint, FrameSize};

/// A camera-like source of NV21 frames.
pub trait CaptureDevice {
    /// Size of every frame this device delivers
    fn frame_size(&self) -> FrameSize;

    /// Request a focus mode. `None` restores the device default.
    fn set_focus_hint(&mut self, _hint: Option<CaptureHint>) -> Result<(), CaptureError> {
        Ok(())
    }

    /// Run one auto-focus pass with the current focus mode
    fn auto_focus(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    /// Hand the next frame to `on_frame`. Returns `Ok(false)` once the
    /// source is exhausted.
    fn next_frame(&mut self, on_frame: &mut dyn FnMut(&[u8])) -> Result<bool, CaptureError>;

    fn release(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }
}

impl<D: CaptureDevice + ?Sized> CaptureDevice for Box<D> {
    fn frame_size(&self) -> FrameSize {
        (**self).frame_size()
    }

    fn set_focus_hint(&mut self, hint: Option<CaptureHint>) -> Result<(), CaptureError> {
        (**self).set_focus_hint(hint)
    }

    fn auto_focus(&mut self) -> Result<(), CaptureError> {
        (**self).auto_focus()
    }

    fn start_preview(&mut self) -> Result<(), CaptureError> {
        (**self).start_preview()
    }

    fn stop_preview(&mut self) -> Result<(), CaptureError> {
        (**self).stop_preview()
    }

    fn next_frame(&mut self, on_frame: &mut dyn FnMut(&[u8])) -> Result<bool, CaptureError> {
        (**self).next_frame(on_frame)
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        (**self).release()
    }
}

/// Concatenated raw NV21 frames read from any byte stream.
pub struct RawFileCapture<R> {
    reader: R,
    size: FrameSize,
    frame: Vec<u8>,
    frames_read: u64,
    focus: Option<CaptureHint>,
}

impl RawFileCapture<BufReader<File>> {
    /// Open a recording on disk
    pub fn open(path: impl AsRef<Path>, size: FrameSize) -> Result<Self, CaptureError> {
        let file = File::open(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), %size, "Opened raw frame file");
        Ok(Self::new(BufReader::new(file), size))
    }
}

impl<R: Read> RawFileCapture<R> {
    pub fn new(reader: R, size: FrameSize) -> Self {
        Self {
            reader,
            size,
            frame: vec![0; size.frame_len()],
            frames_read: 0,
            focus: None,
        }
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Focus mode last requested; a recording cannot refocus
    pub fn focus_hint(&self) -> Option<CaptureHint> {
        self.focus
    }

    /// Fill the frame buffer, returning how many bytes were read.
    fn fill(&mut self) -> Result<usize, CaptureError> {
        let mut filled = 0;
        while filled < self.frame.len() {
            match self.reader.read(&mut self.frame[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> CaptureDevice for RawFileCapture<R> {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn set_focus_hint(&mut self, hint: Option<CaptureHint>) -> Result<(), CaptureError> {
        self.focus = hint;
        Ok(())
    }

    fn next_frame(&mut self, on_frame: &mut dyn FnMut(&[u8])) -> Result<bool, CaptureError> {
        match self.fill()? {
            0 => Ok(false),
            n if n < self.frame.len() => Err(CaptureError::TruncatedFrame {
                got: n,
                expected: self.frame.len(),
            }),
            _ => {
                self.frames_read += 1;
                on_frame(&self.frame);
                Ok(true)
            }
        }
    }
}

const BARS: [u32; 8] = [
    0x00FF_FFFF, // white
    0x00FF_FF00, // yellow
    0x0000_FFFF, // cyan
    0x0000_FF00, // green
    0x00FF_00FF, // magenta
    0x00FF_0000, // red
    0x0000_00FF, // blue
    0x0000_0000, // black
];

/// Synthetic source of color bars that scroll a few pixels per frame.
pub struct TestPatternCapture {
    size: FrameSize,
    limit: Option<u64>,
    produced: u64,
    focus: Option<CaptureHint>,
    focus_passes: u32,
}

impl TestPatternCapture {
    /// A pattern source delivering at most `limit` frames (`None` is endless)
    pub fn new(size: FrameSize, limit: Option<u64>) -> Self {
        Self {
            size,
            limit,
            produced: 0,
            focus: None,
            focus_passes: 0,
        }
    }

    pub fn frames_produced(&self) -> u64 {
        self.produced
    }

    pub fn focus_hint(&self) -> Option<CaptureHint> {
        self.focus
    }

    pub fn focus_passes(&self) -> u32 {
        self.focus_passes
    }

    /// Packed RGB of frame number `index`, before NV21 encoding
    pub fn bars(size: FrameSize, index: u64) -> Vec<u32> {
        let width = size.width() as u64;
        let shift = (index * 4) % width;
        let mut row = Vec::with_capacity(size.width() as usize);
        for x in 0..width {
            row.push(BARS[(((x + shift) % width) * BARS.len() as u64 / width) as usize]);
        }
        let mut rgb = Vec::with_capacity(size.pixel_count());
        for y in 0..size.height() {
            // darken the bottom quarter so vertical order is visible
            if y >= size.height() * 3 / 4 {
                rgb.extend(row.iter().map(|&px| {
                    let [r, g, b] = unpack_rgb(px);
                    pack_rgb(r as u32 / 2, g as u32 / 2, b as u32 / 2)
                }));
            } else {
                rgb.extend_from_slice(&row);
            }
        }
        rgb
    }
}

impl CaptureDevice for TestPatternCapture {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn set_focus_hint(&mut self, hint: Option<CaptureHint>) -> Result<(), CaptureError> {
        self.focus = hint;
        Ok(())
    }

    fn auto_focus(&mut self) -> Result<(), CaptureError> {
        self.focus_passes += 1;
        Ok(())
    }

    fn next_frame(&mut self, on_frame: &mut dyn FnMut(&[u8])) -> Result<bool, CaptureError> {
        if self.limit.is_some_and(|limit| self.produced >= limit) {
            return Ok(false);
        }
        let raw = encode_nv21(&Self::bars(self.size, self.produced), self.size);
        self.produced += 1;
        on_frame(&raw);
        Ok(true)
    }
}
