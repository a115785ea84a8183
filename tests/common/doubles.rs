//! Recording capture device and render target.

use impaired_vision::error::{CaptureError, RenderError};
use impaired_vision::services::{CaptureDevice, RenderTarget};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use vision_core::{CaptureHint, ColorMatrix, FrameSize};

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    FocusHint(Option<CaptureHint>),
    AutoFocus,
    StartPreview,
    StopPreview,
    Frame,
    Release,
}

/// Calls seen by a [`ScriptedCapture`], shared so tests can inspect it
/// after the device has moved into a session.
#[derive(Debug, Default)]
pub struct DeviceLog {
    pub events: Vec<DeviceEvent>,
    /// Number of upcoming `set_focus_hint` calls that fail
    pub failing_hints: usize,
    /// Make `stop_preview` fail
    pub failing_stop: bool,
}

impl DeviceLog {
    pub fn hints(&self) -> Vec<Option<CaptureHint>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DeviceEvent::FocusHint(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, event: &DeviceEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

/// Delivers a fixed list of frames, byte for byte
pub struct ScriptedCapture {
    size: FrameSize,
    frames: VecDeque<Vec<u8>>,
    log: Arc<Mutex<DeviceLog>>,
}

impl ScriptedCapture {
    pub fn new(size: FrameSize, frames: Vec<Vec<u8>>) -> (Self, Arc<Mutex<DeviceLog>>) {
        let log = Arc::new(Mutex::new(DeviceLog::default()));
        let device = Self {
            size,
            frames: frames.into(),
            log: Arc::clone(&log),
        };
        (device, log)
    }

    fn record(&self, event: DeviceEvent) {
        self.log.lock().unwrap().events.push(event);
    }

    fn device_busy(what: &str) -> CaptureError {
        CaptureError::Io(io::Error::other(format!("{what}: device busy")))
    }
}

impl CaptureDevice for ScriptedCapture {
    fn frame_size(&self) -> FrameSize {
        self.size
    }

    fn set_focus_hint(&mut self, hint: Option<CaptureHint>) -> Result<(), CaptureError> {
        self.record(DeviceEvent::FocusHint(hint));
        let mut log = self.log.lock().unwrap();
        if log.failing_hints > 0 {
            log.failing_hints -= 1;
            return Err(Self::device_busy("focus"));
        }
        Ok(())
    }

    fn auto_focus(&mut self) -> Result<(), CaptureError> {
        self.record(DeviceEvent::AutoFocus);
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CaptureError> {
        self.record(DeviceEvent::StartPreview);
        Ok(())
    }

    fn stop_preview(&mut self) -> Result<(), CaptureError> {
        self.record(DeviceEvent::StopPreview);
        if self.log.lock().unwrap().failing_stop {
            return Err(Self::device_busy("stop preview"));
        }
        Ok(())
    }

    fn next_frame(&mut self, on_frame: &mut dyn FnMut(&[u8])) -> Result<bool, CaptureError> {
        match self.frames.pop_front() {
            Some(frame) => {
                self.record(DeviceEvent::Frame);
                on_frame(&frame);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        self.record(DeviceEvent::Release);
        Ok(())
    }
}

/// One presented frame: the filtered pixels and the filter used
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnFrame {
    pub pixels: Vec<u32>,
    pub filter: ColorMatrix,
}

/// Keeps every presented frame in memory
#[derive(Debug)]
pub struct RecordingTarget {
    pub available: bool,
    /// Number of upcoming releases that fail to present
    pub failing_releases: usize,
    pub frames: Vec<DrawnFrame>,
    pub acquired: usize,
    pub released: usize,
}

impl Default for RecordingTarget {
    fn default() -> Self {
        Self {
            available: true,
            failing_releases: 0,
            frames: Vec::new(),
            acquired: 0,
            released: 0,
        }
    }
}

impl RecordingTarget {
    pub fn last(&self) -> &DrawnFrame {
        self.frames.last().expect("no frame presented")
    }
}

impl RenderTarget for RecordingTarget {
    type Canvas = Option<DrawnFrame>;

    fn acquire(&mut self) -> Option<Option<DrawnFrame>> {
        if !self.available {
            return None;
        }
        self.acquired += 1;
        Some(None)
    }

    fn draw_pixels(
        &mut self,
        canvas: &mut Option<DrawnFrame>,
        pixels: &[u32],
        _size: FrameSize,
        filter: &ColorMatrix,
    ) {
        let mut out = vec![0; pixels.len()];
        filter.apply_to(pixels, &mut out);
        *canvas = Some(DrawnFrame {
            pixels: out,
            filter: *filter,
        });
    }

    fn release(&mut self, canvas: Option<DrawnFrame>) -> Result<(), RenderError> {
        self.released += 1;
        if self.failing_releases > 0 {
            self.failing_releases -= 1;
            return Err(RenderError::PngEncode("disk full".to_string()));
        }
        self.frames.extend(canvas);
        Ok(())
    }
}
