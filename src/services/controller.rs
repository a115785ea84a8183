//! The pipeline driver
//!
//! [`VisionController`] ties a capture session, the frame pipeline and a
//! render target to the shared [`VisionCycle`]. The cycle may be advanced
//! from any thread through [`VisionController::cycle`]; the controller
//! picks the change up before the next frame.

use super::capture::CaptureDevice;
use super::pipeline::{FrameOutcome, FramePipeline, PipelineStats};
use super::render::RenderTarget;
use super::session::CaptureSession;
use crate::assets::SettingsLoader;
use crate::error::{PipelineError, SettingsError};
use crate::models::{Settings, ThrottleSettings};
use std::sync::Arc;
use vision_core::{RgbBuffer, SkipRate, SkipRateError, Vision, VisionCycle};

pub struct VisionController<D: CaptureDevice, R: RenderTarget> {
    cycle: Arc<VisionCycle>,
    session: Option<CaptureSession<D>>,
    pipeline: Option<FramePipeline>,
    renderer: R,
    /// Vision whose filter and hint are currently in effect
    applied: Option<Vision>,
    skip_frames: bool,
    skip_rate: SkipRate,
}

impl<D: CaptureDevice, R: RenderTarget> VisionController<D, R> {
    pub fn new(renderer: R) -> Self {
        Self::with_cycle(renderer, Arc::new(VisionCycle::new()))
    }

    pub fn with_cycle(renderer: R, cycle: Arc<VisionCycle>) -> Self {
        Self {
            cycle,
            session: None,
            pipeline: None,
            renderer,
            applied: None,
            skip_frames: false,
            skip_rate: SkipRate::DEFAULT,
        }
    }

    /// Shared selection handle
    pub fn cycle(&self) -> Arc<VisionCycle> {
        Arc::clone(&self.cycle)
    }

    pub fn current(&self) -> Vision {
        self.cycle.current()
    }

    /// Vision currently applied to frames, if attached
    pub fn applied(&self) -> Option<Vision> {
        self.applied
    }

    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CaptureSession<D>> {
        self.session.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn pipeline(&self) -> Option<&FramePipeline> {
        self.pipeline.as_ref()
    }

    /// Open a session on `device` and start its preview. A session that is
    /// already attached is detached first. The RGB buffer is kept when the
    /// new device has the same frame size.
    pub fn attach(&mut self, device: D) -> Result<(), PipelineError> {
        if self.session.is_some() {
            self.detach()?;
        }

        let size = device.frame_size();
        let rgb = match self.pipeline.take() {
            Some(pipeline) if pipeline.size() == size => pipeline.into_buffer(),
            _ => RgbBuffer::new(size),
        };
        let mut pipeline = FramePipeline::with_buffer(rgb);
        pipeline.configure_throttle(self.skip_frames, self.skip_rate);
        self.pipeline = Some(pipeline);

        let mut session = CaptureSession::open(device);
        session.start_preview()?;
        self.session = Some(session);

        self.applied = None;
        self.sync_selection()
    }

    /// Release the session, then return the counters collected since attach.
    pub fn detach(&mut self) -> Result<PipelineStats, PipelineError> {
        let Some(mut session) = self.session.take() else {
            return Err(PipelineError::NotAttached);
        };
        self.applied = None;
        session.release()?;

        let stats = self
            .pipeline
            .as_mut()
            .map(FramePipeline::take_stats)
            .unwrap_or_default();
        tracing::info!(%stats, "Capture detached");
        Ok(stats)
    }

    /// Move the selection by `delta` and apply it if attached
    pub fn advance(&mut self, delta: isize) -> Result<Vision, PipelineError> {
        let vision = self.cycle.advance(delta);
        self.sync_selection()?;
        Ok(vision)
    }

    /// Apply the cycle's current vision if it differs from the one in
    /// effect. Does nothing while detached.
    pub fn sync_selection(&mut self) -> Result<(), PipelineError> {
        let (Some(session), Some(pipeline)) = (self.session.as_mut(), self.pipeline.as_mut()) else {
            return Ok(());
        };
        let vision = self.cycle.current();
        if self.applied == Some(vision) {
            return Ok(());
        }

        session.apply_hint(vision.capture_hint())?;
        pipeline.set_filter(vision.color_matrix());
        self.applied = Some(vision);
        match vision.capture_hint() {
            Some(hint) => tracing::info!(vision = %vision, %hint, "Switched vision"),
            None => tracing::info!(vision = %vision, "Switched vision"),
        }
        Ok(())
    }

    /// Sync before a frame. A failed hint push leaves the previous vision
    /// in effect and is retried before the next frame.
    fn sync_before_frame(&mut self) {
        if let Err(e) = self.sync_selection() {
            tracing::warn!(error = %e, vision = %self.cycle.current(), "Vision switch deferred");
        }
    }

    /// Reconfigure frame skipping. An invalid rate is rejected and the
    /// previous configuration stays in effect.
    pub fn apply_settings(&mut self, settings: &ThrottleSettings) -> Result<SkipRate, SkipRateError> {
        let rate = match settings.skip_rate() {
            Ok(rate) => rate,
            Err(e) => {
                tracing::warn!(error = %e, keep = %self.skip_rate, "Rejected skip rate");
                return Err(e);
            }
        };
        self.skip_frames = settings.skip_frames;
        self.skip_rate = rate;
        if let Some(pipeline) = self.pipeline.as_mut() {
            pipeline.configure_throttle(self.skip_frames, rate);
        }
        tracing::info!(skip_frames = self.skip_frames, skip_rate = %rate, "Throttle configured");
        Ok(rate)
    }

    /// Re-read the settings and re-derive the throttle. On any read, parse
    /// or range error the previous configuration stays in effect.
    pub fn reload_settings(&mut self, loader: &SettingsLoader) -> Result<SkipRate, SettingsError> {
        let settings = loader
            .read_settings_string()
            .map_err(SettingsError::from)
            .and_then(|content| Settings::from_yaml(&content));
        match settings {
            Ok(settings) => Ok(self.apply_settings(&settings.throttle)?),
            Err(e) => {
                tracing::warn!(error = %e, "Keeping previous settings");
                Err(e)
            }
        }
    }

    /// Feed one raw frame through the pipeline
    pub fn on_frame(&mut self, raw: &[u8]) -> Result<FrameOutcome, PipelineError> {
        self.sync_before_frame();
        let pipeline = self.pipeline.as_mut().ok_or(PipelineError::NotAttached)?;
        if self.session.is_none() {
            return Err(PipelineError::NotAttached);
        }
        pipeline.on_frame(raw, &mut self.renderer)
    }

    /// Pull one frame from the session. `Ok(None)` once the device is
    /// exhausted.
    pub fn pump(&mut self) -> Result<Option<FrameOutcome>, PipelineError> {
        self.sync_before_frame();
        let (Some(session), Some(pipeline)) = (self.session.as_mut(), self.pipeline.as_mut()) else {
            return Err(PipelineError::NotAttached);
        };
        let renderer = &mut self.renderer;

        let mut outcome = None;
        let delivered = session.next_frame(&mut |raw| {
            outcome = Some(pipeline.on_frame(raw, renderer));
        })?;
        match outcome {
            Some(result) if delivered => result.map(Some),
            _ => Ok(None),
        }
    }

    /// Pump frames until the device is exhausted or `max_frames` frames
    /// were received. `between` runs after every frame and may advance the
    /// selection or reconfigure the controller. Frames that fail to decode
    /// or render are logged and do not stop the loop.
    pub fn run(
        &mut self,
        max_frames: Option<u64>,
        mut between: impl FnMut(&mut Self),
    ) -> Result<PipelineStats, PipelineError> {
        let mut frames = 0u64;
        while max_frames.is_none_or(|max| frames < max) {
            match self.pump() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(e @ (PipelineError::Precondition { .. } | PipelineError::Render(_))) => {
                    tracing::warn!(error = %e, "Discarded frame");
                }
                Err(e) => return Err(e),
            }
            frames += 1;
            between(self);
        }
        Ok(self.stats())
    }

    pub fn stats(&self) -> PipelineStats {
        self.pipeline
            .as_ref()
            .map(FramePipeline::stats)
            .unwrap_or_default()
    }
}
