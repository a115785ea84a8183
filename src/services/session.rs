//! Owned capture session lifecycle
//!
//! ```text
//! open -> Opened -> start_preview -> Previewing <-> Stopped
//!                                         \           /
//!                                          -> release -> Released
//! ```
//!
//! Releasing stops a running preview first, so the device delivers no
//! frame after its session is gone.

use super::capture::CaptureDevice;
use crate::error::CaptureError;
use std::fmt;
use vision_core::{CaptureHint, FrameSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Opened,
    Previewing,
    Stopped,
    Released,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Opened => "opened",
            SessionState::Previewing => "previewing",
            SessionState::Stopped => "stopped",
            SessionState::Released => "released",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exclusive use of one capture device, from open to release.
pub struct CaptureSession<D: CaptureDevice> {
    device: D,
    size: FrameSize,
    state: SessionState,
}

impl<D: CaptureDevice> CaptureSession<D> {
    pub fn open(device: D) -> Self {
        let size = device.frame_size();
        tracing::info!(%size, "Capture session opened");
        Self {
            device,
            size,
            state: SessionState::Opened,
        }
    }

    pub fn frame_size(&self) -> FrameSize {
        self.size
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn start_preview(&mut self) -> Result<(), CaptureError> {
        match self.state {
            SessionState::Opened | SessionState::Stopped => {
                self.device.start_preview()?;
                self.state = SessionState::Previewing;
                tracing::debug!("Preview started");
                Ok(())
            }
            state => Err(invalid("start preview on", state)),
        }
    }

    pub fn stop_preview(&mut self) -> Result<(), CaptureError> {
        match self.state {
            SessionState::Previewing => {
                self.device.stop_preview()?;
                self.state = SessionState::Stopped;
                tracing::debug!("Preview stopped");
                Ok(())
            }
            state => Err(invalid("stop preview on", state)),
        }
    }

    /// Push a vision's capture configuration. A concrete hint also triggers
    /// an auto-focus pass; `None` restores the default focus mode.
    pub fn apply_hint(&mut self, hint: Option<CaptureHint>) -> Result<(), CaptureError> {
        if self.state == SessionState::Released {
            return Err(invalid("configure", self.state));
        }
        self.device.set_focus_hint(hint)?;
        if hint.is_some() {
            self.device.auto_focus()?;
        }
        Ok(())
    }

    /// Deliver the next preview frame to `on_frame`
    pub fn next_frame(&mut self, on_frame: &mut dyn FnMut(&[u8])) -> Result<bool, CaptureError> {
        match self.state {
            SessionState::Previewing => self.device.next_frame(on_frame),
            state => Err(invalid("read a frame from", state)),
        }
    }

    /// Stop the preview if running, then hand the device back.
    pub fn release(&mut self) -> Result<(), CaptureError> {
        if self.state == SessionState::Released {
            return Err(invalid("release", self.state));
        }
        if self.state == SessionState::Previewing {
            if let Err(e) = self.stop_preview() {
                tracing::warn!(error = %e, "Failed to stop preview before release");
            }
        }
        self.state = SessionState::Released;
        self.device.release()?;
        tracing::info!("Capture session released");
        Ok(())
    }
}

impl<D: CaptureDevice> Drop for CaptureSession<D> {
    fn drop(&mut self) {
        if self.state != SessionState::Released {
            if let Err(e) = self.release() {
                tracing::warn!(error = %e, "Failed to release capture session");
            }
        }
    }
}

fn invalid(action: &'static str, state: SessionState) -> CaptureError {
    CaptureError::InvalidState {
        action,
        state: state.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::TestPatternCapture;

    fn session() -> CaptureSession<TestPatternCapture> {
        CaptureSession::open(TestPatternCapture::new(FrameSize::new(4, 2).unwrap(), None))
    }

    #[test]
    fn test_lifecycle() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Opened);
        session.start_preview().unwrap();
        assert!(session.next_frame(&mut |_| {}).unwrap());
        session.stop_preview().unwrap();
        session.start_preview().unwrap();
        session.release().unwrap();
        assert_eq!(session.state(), SessionState::Released);
    }

    #[test]
    fn test_frames_require_preview() {
        let mut session = session();
        let err = session.next_frame(&mut |_| {}).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot read a frame from a capture session that is opened"
        );
    }

    #[test]
    fn test_released_session_rejects_calls() {
        let mut session = session();
        session.release().unwrap();
        assert!(session.start_preview().is_err());
        assert!(session.apply_hint(None).is_err());
        assert!(session.release().is_err());
    }

    #[test]
    fn test_hint_triggers_auto_focus() {
        let mut session = session();
        session.apply_hint(Some(CaptureHint::MacroFocus)).unwrap();
        assert_eq!(session.device().focus_hint(), Some(CaptureHint::MacroFocus));
        assert_eq!(session.device().focus_passes(), 1);

        session.apply_hint(None).unwrap();
        assert_eq!(session.device().focus_hint(), None);
        assert_eq!(session.device().focus_passes(), 1);
    }
}
