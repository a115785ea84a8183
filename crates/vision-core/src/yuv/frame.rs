//! Frame geometry and the reusable RGB output buffer

use std::fmt;

/// Dimensions of a capture session's frames.
///
/// Both sides are positive and even: a 4:2:0 frame stores one chroma pair
/// per 2x2 luma block, so odd sizes have no well-defined chroma plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    /// Create a validated frame size.
    ///
    /// # Example
    /// ```
    /// use vision_core::FrameSize;
    ///
    /// let size = FrameSize::new(640, 480).unwrap();
    /// assert_eq!(size.frame_len(), 640 * 480 * 3 / 2);
    /// assert!(FrameSize::new(641, 480).is_err());
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self, FrameSizeError> {
        if width == 0 || height == 0 {
            return Err(FrameSizeError::Empty { width, height });
        }
        if width % 2 != 0 || height % 2 != 0 {
            return Err(FrameSizeError::Odd { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (and luma bytes) in a frame.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length of the luma plane in bytes.
    #[inline]
    pub fn luma_len(&self) -> usize {
        self.pixel_count()
    }

    /// Length of a complete 4:2:0 semi-planar frame in bytes.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.pixel_count() + self.pixel_count() / 2
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error returned when frame dimensions cannot describe a 4:2:0 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSizeError {
    /// One of the sides is zero
    Empty { width: u32, height: u32 },
    /// One of the sides is odd
    Odd { width: u32, height: u32 },
}

impl fmt::Display for FrameSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameSizeError::Empty { width, height } => {
                write!(f, "frame size {}x{} has an empty side", width, height)
            }
            FrameSizeError::Odd { width, height } => {
                write!(f, "frame size {}x{} must have even sides", width, height)
            }
        }
    }
}

impl std::error::Error for FrameSizeError {}

/// Packed RGB pixels for one decoded frame.
///
/// Each pixel is stored as `0x00RRGGBB`. The buffer is allocated once per
/// frame size and overwritten in place for every frame; its length never
/// changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbBuffer {
    size: FrameSize,
    pixels: Vec<u32>,
}

impl RgbBuffer {
    /// Allocate a zeroed buffer for frames of `size`.
    pub fn new(size: FrameSize) -> Self {
        Self {
            size,
            pixels: vec![0; size.pixel_count()],
        }
    }

    #[inline]
    pub fn size(&self) -> FrameSize {
        self.size
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Pixel at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinate lies outside the frame.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.size.width && y < self.size.height, "pixel ({x}, {y}) outside {}", self.size);
        self.pixels[y as usize * self.size.width as usize + x as usize]
    }
}

/// Pack 8-bit channels into a `0x00RRGGBB` pixel.
#[inline(always)]
pub fn pack_rgb(r: u32, g: u32, b: u32) -> u32 {
    (r << 16) | (g << 8) | b
}

/// Split a `0x00RRGGBB` pixel into its channels.
#[inline(always)]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}
