//! Per-frame work: throttle, decode into the reused buffer, draw.

use super::render::{DrawGuard, RenderTarget};
use crate::error::PipelineError;
use std::fmt;
use vision_core::{try_decode, ColorMatrix, FrameSize, FrameThrottle, RgbBuffer, SkipRate};

/// What happened to one incoming frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Rendered,
    /// Throttled before any work was done
    Skipped,
    /// No canvas was available
    Dropped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub received: u64,
    pub rendered: u64,
    pub skipped: u64,
    pub dropped: u64,
    pub failed: u64,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} received, {} rendered, {} skipped, {} dropped, {} failed",
            self.received, self.rendered, self.skipped, self.dropped, self.failed
        )
    }
}

pub struct FramePipeline {
    rgb: RgbBuffer,
    throttle: FrameThrottle,
    filter: ColorMatrix,
    stats: PipelineStats,
}

impl FramePipeline {
    pub fn new(size: FrameSize) -> Self {
        Self::with_buffer(RgbBuffer::new(size))
    }

    /// Reuse an existing buffer; its size fixes the accepted frame length
    pub fn with_buffer(rgb: RgbBuffer) -> Self {
        Self {
            rgb,
            throttle: FrameThrottle::new(),
            filter: ColorMatrix::identity(),
            stats: PipelineStats::default(),
        }
    }

    pub fn size(&self) -> FrameSize {
        self.rgb.size()
    }

    pub fn buffer(&self) -> &RgbBuffer {
        &self.rgb
    }

    pub fn into_buffer(self) -> RgbBuffer {
        self.rgb
    }

    pub fn filter(&self) -> &ColorMatrix {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: ColorMatrix) {
        self.filter = filter;
    }

    pub fn throttle(&self) -> &FrameThrottle {
        &self.throttle
    }

    pub fn configure_throttle(&mut self, enabled: bool, rate: SkipRate) {
        self.throttle.configure(enabled, rate);
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Return the counters and start over from zero
    pub fn take_stats(&mut self) -> PipelineStats {
        std::mem::take(&mut self.stats)
    }

    /// Process one raw NV21 frame.
    ///
    /// A frame of the wrong length is a precondition violation: it is
    /// reported as an error, the canvas is released undrawn and the buffer
    /// keeps its length.
    pub fn on_frame<R: RenderTarget>(
        &mut self,
        raw: &[u8],
        target: &mut R,
    ) -> Result<FrameOutcome, PipelineError> {
        self.stats.received += 1;

        if !self.throttle.should_process() {
            self.stats.skipped += 1;
            return Ok(FrameOutcome::Skipped);
        }

        let Some(mut guard) = DrawGuard::acquire(target) else {
            tracing::debug!(frame = self.stats.received, "No canvas available, dropping frame");
            self.stats.dropped += 1;
            return Ok(FrameOutcome::Dropped);
        };

        let size = self.rgb.size();
        if let Err(source) = try_decode(raw, self.rgb.pixels_mut(), size) {
            self.stats.failed += 1;
            return Err(PipelineError::Precondition { size, source });
        }

        guard.draw(self.rgb.pixels(), size, &self.filter);
        if let Err(e) = guard.finish() {
            self.stats.failed += 1;
            return Err(e.into());
        }

        self.stats.rendered += 1;
        Ok(FrameOutcome::Rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;

    /// Keeps the last drawn frame, filter applied
    #[derive(Default)]
    struct LastFrame {
        unavailable: bool,
        pixels: Vec<u32>,
        releases: u32,
    }

    impl RenderTarget for LastFrame {
        type Canvas = Vec<u32>;

        fn acquire(&mut self) -> Option<Vec<u32>> {
            (!self.unavailable).then(Vec::new)
        }

        fn draw_pixels(&mut self, canvas: &mut Vec<u32>, pixels: &[u32], _: FrameSize, filter: &ColorMatrix) {
            canvas.resize(pixels.len(), 0);
            filter.apply_to(pixels, canvas);
        }

        fn release(&mut self, canvas: Vec<u32>) -> Result<(), RenderError> {
            self.releases += 1;
            if !canvas.is_empty() {
                self.pixels = canvas;
            }
            Ok(())
        }
    }

    fn size() -> FrameSize {
        FrameSize::new(4, 2).unwrap()
    }

    fn white() -> Vec<u8> {
        let mut raw = vec![255u8; 8];
        raw.extend([128u8; 4]);
        raw
    }

    #[test]
    fn test_renders_decoded_frame() {
        let mut pipeline = FramePipeline::new(size());
        let mut target = LastFrame::default();

        assert_eq!(pipeline.on_frame(&white(), &mut target).unwrap(), FrameOutcome::Rendered);
        assert_eq!(target.pixels, vec![0x00FF_FFFF; 8]);
        assert_eq!(pipeline.stats().rendered, 1);
    }

    #[test]
    fn test_filter_does_not_touch_buffer() {
        let mut pipeline = FramePipeline::new(size());
        pipeline.set_filter(ColorMatrix::new([0.0; 20]));
        let mut target = LastFrame::default();

        pipeline.on_frame(&white(), &mut target).unwrap();
        assert_eq!(target.pixels, vec![0; 8]);
        assert!(pipeline.buffer().pixels().iter().all(|&px| px == 0x00FF_FFFF));
    }

    #[test]
    fn test_missing_canvas_drops_frame() {
        let mut pipeline = FramePipeline::new(size());
        let mut target = LastFrame {
            unavailable: true,
            ..Default::default()
        };
        assert_eq!(pipeline.on_frame(&white(), &mut target).unwrap(), FrameOutcome::Dropped);
        assert_eq!(pipeline.stats().dropped, 1);
        assert_eq!(target.releases, 0);
    }

    #[test]
    fn test_short_frame_is_rejected_and_canvas_released() {
        let mut pipeline = FramePipeline::new(size());
        let mut target = LastFrame::default();

        let err = pipeline.on_frame(&[0u8; 10], &mut target).unwrap_err();
        assert!(matches!(err, PipelineError::Precondition { .. }));
        assert_eq!(target.releases, 1);
        assert!(target.pixels.is_empty());
        assert_eq!(pipeline.buffer().pixels().len(), 8);
        assert_eq!(pipeline.stats().failed, 1);
    }

    #[test]
    fn test_throttled_frames_skip_all_work() {
        let mut pipeline = FramePipeline::new(size());
        pipeline.configure_throttle(true, SkipRate::new(100).unwrap());
        let mut target = LastFrame::default();

        for _ in 0..5 {
            assert_eq!(pipeline.on_frame(&white(), &mut target).unwrap(), FrameOutcome::Skipped);
        }
        assert_eq!(target.releases, 0);
        assert_eq!(pipeline.take_stats().skipped, 5);
        assert_eq!(pipeline.stats(), PipelineStats::default());
    }
}
