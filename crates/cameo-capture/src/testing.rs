//! In-memory doubles for the device, writer, preview and clock seams.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::device::{CaptureDevice, DeviceProperty};
use crate::error::CaptureError;
use crate::frame::Frame;
use crate::video::{VideoSpec, VideoWriter, VideoWriterFactory};
use crate::{CaptureResult, PreviewSink};

struct DeviceState {
    grab_ok: bool,
    decode_ok: bool,
    retrieves: usize,
    last_channel: Option<u32>,
}

/// Device producing a distinct BGR frame on every retrieve.
pub struct FakeDevice {
    width: u32,
    height: u32,
    fps: f64,
    state: Arc<Mutex<DeviceState>>,
}

/// Test-side view of a [`FakeDevice`].
#[derive(Clone)]
pub struct FakeDeviceHandle {
    width: u32,
    height: u32,
    state: Arc<Mutex<DeviceState>>,
}

impl FakeDevice {
    pub fn new(width: u32, height: u32, fps: f64) -> (Self, FakeDeviceHandle) {
        let state = Arc::new(Mutex::new(DeviceState {
            grab_ok: true,
            decode_ok: true,
            retrieves: 0,
            last_channel: None,
        }));
        let handle = FakeDeviceHandle {
            width,
            height,
            state: state.clone(),
        };
        (
            Self {
                width,
                height,
                fps,
                state,
            },
            handle,
        )
    }
}

fn numbered_frame(width: u32, height: u32, sequence: usize) -> Frame {
    let mut data = Vec::with_capacity(Frame::buffer_size(width, height, 3));
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, sequence as u8]);
        }
    }
    Frame::new(Bytes::from(data), width, height, 3).expect("numbered frame geometry")
}

impl CaptureDevice for FakeDevice {
    fn grab(&mut self) -> CaptureResult<bool> {
        Ok(self.state.lock().grab_ok)
    }

    fn retrieve(&mut self, channel: u32) -> CaptureResult<Option<Frame>> {
        let mut state = self.state.lock();
        state.retrieves += 1;
        state.last_channel = Some(channel);
        if !state.decode_ok {
            return Ok(None);
        }
        Ok(Some(numbered_frame(self.width, self.height, state.retrieves)))
    }

    fn get(&self, property: DeviceProperty) -> CaptureResult<f64> {
        Ok(match property {
            DeviceProperty::Fps => self.fps,
            DeviceProperty::FrameWidth => self.width as f64,
            DeviceProperty::FrameHeight => self.height as f64,
        })
    }
}

impl FakeDeviceHandle {
    pub fn set_grab_ok(&self, ok: bool) {
        self.state.lock().grab_ok = ok;
    }

    pub fn set_decode_ok(&self, ok: bool) {
        self.state.lock().decode_ok = ok;
    }

    pub fn retrieves(&self) -> usize {
        self.state.lock().retrieves
    }

    pub fn last_channel(&self) -> Option<u32> {
        self.state.lock().last_channel
    }

    /// The frame returned by the `sequence`-th retrieve (1-based).
    pub fn frame_for(&self, sequence: usize) -> Frame {
        numbered_frame(self.width, self.height, sequence)
    }
}

/// Everything the fake writers observed.
#[derive(Default)]
pub struct WriterLog {
    pub opened: Vec<VideoSpec>,
    pub frames: Vec<Frame>,
    pub released: usize,
    pub fail_open: bool,
}

pub struct FakeWriterFactory {
    log: Arc<Mutex<WriterLog>>,
}

impl FakeWriterFactory {
    pub fn new() -> (Self, Arc<Mutex<WriterLog>>) {
        let log = Arc::new(Mutex::new(WriterLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl VideoWriterFactory for FakeWriterFactory {
    fn open(&mut self, spec: &VideoSpec) -> CaptureResult<Box<dyn VideoWriter>> {
        let mut log = self.log.lock();
        if log.fail_open {
            return Err(CaptureError::VideoWrite("codec unavailable".into()));
        }
        log.opened.push(spec.clone());
        drop(log);
        Ok(Box::new(FakeWriter {
            log: self.log.clone(),
        }))
    }
}

struct FakeWriter {
    log: Arc<Mutex<WriterLog>>,
}

impl VideoWriter for FakeWriter {
    fn write(&mut self, frame: &Frame) -> CaptureResult<()> {
        self.log.lock().frames.push(frame.clone());
        Ok(())
    }

    fn release(&mut self) -> CaptureResult<()> {
        self.log.lock().released += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePreview {
    pub shown: Vec<Frame>,
    pub fail: bool,
}

impl PreviewSink for FakePreview {
    fn show(&mut self, frame: &Frame) -> CaptureResult<()> {
        if self.fail {
            return Err(CaptureError::Preview("surface gone".into()));
        }
        self.shown.push(frame.clone());
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}
