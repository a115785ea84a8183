//! Draw surfaces
//!
//! A [`RenderTarget`] lends out a canvas per frame. [`DrawGuard`] keeps the
//! acquire/release pairing intact on every exit path.

use crate::error::RenderError;
use vision_core::{ColorMatrix, FrameSize};

pub trait RenderTarget {
    /// Exclusive drawing handle for one frame
    type Canvas;

    /// Lock a canvas, or `None` if the surface is unavailable right now
    fn acquire(&mut self) -> Option<Self::Canvas>;

    /// Draw `pixels` through `filter`. The source pixels are never modified.
    fn draw_pixels(
        &mut self,
        canvas: &mut Self::Canvas,
        pixels: &[u32],
        size: FrameSize,
        filter: &ColorMatrix,
    );

    /// Unlock the canvas and present whatever was drawn
    fn release(&mut self, canvas: Self::Canvas) -> Result<(), RenderError>;
}

/// A canvas borrowed from a [`RenderTarget`], released on drop.
pub struct DrawGuard<'a, R: RenderTarget> {
    target: &'a mut R,
    canvas: Option<R::Canvas>,
}

impl<'a, R: RenderTarget> DrawGuard<'a, R> {
    pub fn acquire(target: &'a mut R) -> Option<Self> {
        let canvas = target.acquire()?;
        Some(Self {
            target,
            canvas: Some(canvas),
        })
    }

    pub fn draw(&mut self, pixels: &[u32], size: FrameSize, filter: &ColorMatrix) {
        if let Some(canvas) = self.canvas.as_mut() {
            self.target.draw_pixels(canvas, pixels, size, filter);
        }
    }

    /// Release now and report the outcome
    pub fn finish(mut self) -> Result<(), RenderError> {
        match self.canvas.take() {
            Some(canvas) => self.target.release(canvas),
            None => Ok(()),
        }
    }
}

impl<R: RenderTarget> Drop for DrawGuard<'_, R> {
    fn drop(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            if let Err(e) = self.target.release(canvas) {
                tracing::warn!(error = %e, "Failed to release canvas");
            }
        }
    }
}
