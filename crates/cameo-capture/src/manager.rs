//! Frame cycle management.
//!
//! One cycle is [`CaptureManager::enter_frame`] followed by
//! [`CaptureManager::exit_frame`]. Entering grabs a raw frame; the decode
//! is deferred until the frame is first read, and exiting fans the frame
//! out to the preview, a pending screenshot and an active recording.

use std::mem;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::device::{CaptureDevice, DeviceProperty};
use crate::error::CaptureError;
use crate::fps::FpsEstimator;
use crate::frame::Frame;
use crate::video::{FourCc, VideoSpec, VideoWriter, VideoWriterFactory};
use crate::{CaptureResult, PreviewSink, FPS_WARMUP_FRAMES};

/// Preview target shared between the capture manager and its owner.
pub type SharedPreview = Arc<Mutex<dyn PreviewSink>>;

/// Where the current cycle stands.
#[derive(Debug, Default)]
enum FrameState {
    /// No frame entered.
    #[default]
    Idle,

    /// A raw frame was grabbed but not decoded yet.
    Grabbed,

    /// The grabbed frame was decoded and is cached for this cycle.
    Retrieved(Frame),

    /// The grabbed frame could not be decoded.
    Undecodable,
}

impl FrameState {
    fn is_entered(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// An active recording. The writer opens once a frame rate is known.
struct Recording {
    path: PathBuf,
    fourcc: FourCc,
    writer: Option<Box<dyn VideoWriter>>,
}

/// Drives the capture device through grab/retrieve cycles.
pub struct CaptureManager {
    device: Box<dyn CaptureDevice>,
    writer_factory: Box<dyn VideoWriterFactory>,
    clock: Box<dyn Clock>,
    preview: Option<SharedPreview>,
    mirror_preview: bool,
    channel: u32,
    state: FrameState,
    fps: FpsEstimator,
    image_path: Option<PathBuf>,
    recording: Option<Recording>,
    dropped_recording_frames: u64,
}

impl CaptureManager {
    /// Create a manager around an opened device.
    pub fn new(
        device: Box<dyn CaptureDevice>,
        writer_factory: Box<dyn VideoWriterFactory>,
    ) -> Self {
        Self {
            device,
            writer_factory,
            clock: Box::new(SystemClock),
            preview: None,
            mirror_preview: true,
            channel: 0,
            state: FrameState::Idle,
            fps: FpsEstimator::new(),
            image_path: None,
            recording: None,
            dropped_recording_frames: 0,
        }
    }

    /// Attach a preview target.
    pub fn with_preview(mut self, preview: SharedPreview) -> Self {
        self.preview = Some(preview);
        self
    }

    /// Replace the time source used for the FPS estimate.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set or clear the preview target.
    pub fn set_preview(&mut self, preview: Option<SharedPreview>) {
        self.preview = preview;
    }

    /// Whether the preview shows a left-right flipped image.
    pub fn mirror_preview(&self) -> bool {
        self.mirror_preview
    }

    /// Enable or disable preview mirroring.
    pub fn set_mirror_preview(&mut self, mirror: bool) {
        self.mirror_preview = mirror;
    }

    /// Selected device channel.
    pub fn channel(&self) -> u32 {
        self.channel
    }

    /// Select a device channel. A frame already decoded this cycle is
    /// discarded so the next read decodes from the new channel.
    pub fn set_channel(&mut self, channel: u32) {
        if self.channel == channel {
            return;
        }

        self.channel = channel;
        if matches!(
            self.state,
            FrameState::Retrieved(_) | FrameState::Undecodable
        ) {
            self.state = FrameState::Grabbed;
        }
    }

    /// Returns true between a successful grab and the matching exit.
    pub fn is_entered(&self) -> bool {
        self.state.is_entered()
    }

    /// Returns true while a screenshot is pending.
    pub fn is_writing_image(&self) -> bool {
        self.image_path.is_some()
    }

    /// Returns true while frames are being recorded.
    pub fn is_writing_video(&self) -> bool {
        self.recording.is_some()
    }

    /// Running FPS estimate.
    pub fn fps_estimate(&self) -> Option<f64> {
        self.fps.estimate()
    }

    /// Frames exited with a decoded image.
    pub fn frames_elapsed(&self) -> u64 {
        self.fps.frames_elapsed()
    }

    /// Frames left out of recordings while waiting for a usable FPS.
    pub fn dropped_recording_frames(&self) -> u64 {
        self.dropped_recording_frames
    }

    /// Grab the next frame, if any.
    pub fn enter_frame(&mut self) -> CaptureResult<()> {
        if self.state.is_entered() {
            return Err(CaptureError::FrameAlreadyEntered);
        }

        if self.device.grab()? {
            self.state = FrameState::Grabbed;
        } else {
            trace!("Grab returned no frame");
        }

        Ok(())
    }

    /// The current frame, decoding it on first access within a cycle.
    pub fn frame(&mut self) -> CaptureResult<Option<&Frame>> {
        if matches!(self.state, FrameState::Grabbed) {
            self.state = match self.device.retrieve(self.channel)? {
                Some(frame) => FrameState::Retrieved(frame),
                None => {
                    trace!("Grabbed frame could not be decoded");
                    FrameState::Undecodable
                }
            };
        }

        match &self.state {
            FrameState::Retrieved(frame) => Ok(Some(frame)),
            _ => Ok(None),
        }
    }

    /// Finish the cycle: preview, screenshot, record, then release the
    /// frame. The manager is idle afterwards even when an error is
    /// returned.
    pub fn exit_frame(&mut self) -> CaptureResult<()> {
        let decoded = self.frame().map(|frame| frame.is_some());
        let state = mem::take(&mut self.state);

        if !decoded? {
            return Ok(());
        }

        match state {
            FrameState::Retrieved(frame) => self.process_frame(&frame),
            _ => Ok(()),
        }
    }

    /// Write the next exited frame to an image file.
    pub fn write_image(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        debug!(path = %path.display(), "Screenshot requested");
        self.image_path = Some(path);
    }

    /// Start writing exited frames to a video file.
    #[instrument(name = "start_recording", skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn start_writing_video(
        &mut self,
        path: impl AsRef<Path>,
        fourcc: FourCc,
    ) -> CaptureResult<()> {
        if self.recording.is_some() {
            warn!("Recording already active, finishing it first");
            self.stop_writing_video()?;
        }

        info!(%fourcc, "Recording requested");
        self.recording = Some(Recording {
            path: path.as_ref().to_path_buf(),
            fourcc,
            writer: None,
        });

        Ok(())
    }

    /// Stop writing exited frames to a video file.
    #[instrument(name = "stop_recording", skip(self))]
    pub fn stop_writing_video(&mut self) -> CaptureResult<()> {
        let Some(recording) = self.recording.take() else {
            return Ok(());
        };

        match recording.writer {
            Some(mut writer) => {
                writer.release()?;
                info!(path = %recording.path.display(), "Recording finished");
            }
            None => {
                info!(
                    path = %recording.path.display(),
                    "Recording stopped before the writer opened"
                );
            }
        }

        Ok(())
    }

    fn process_frame(&mut self, frame: &Frame) -> CaptureResult<()> {
        self.fps.record_frame(self.clock.now());

        if let Some(preview) = &self.preview {
            let mut preview = preview.lock();
            if self.mirror_preview {
                preview.show(&frame.mirrored())?;
            } else {
                preview.show(frame)?;
            }
        }

        if let Some(path) = self.image_path.take() {
            frame.save(&path)?;
            info!(path = %path.display(), "Screenshot written");
        }

        self.write_video_frame(frame)
    }

    fn write_video_frame(&mut self, frame: &Frame) -> CaptureResult<()> {
        let Some(recording) = self.recording.as_mut() else {
            return Ok(());
        };

        if recording.writer.is_none() {
            let mut fps = self.device.get(DeviceProperty::Fps)?;
            if fps == 0.0 {
                // Device rate unknown; wait for a stable estimate.
                match self.fps.estimate() {
                    Some(estimate) if self.fps.frames_elapsed() >= FPS_WARMUP_FRAMES => {
                        fps = estimate;
                    }
                    _ => {
                        self.dropped_recording_frames += 1;
                        trace!(
                            frames = self.fps.frames_elapsed(),
                            "Waiting for FPS estimate before recording"
                        );
                        return Ok(());
                    }
                }
            }

            let spec = VideoSpec {
                path: recording.path.clone(),
                fourcc: recording.fourcc,
                fps,
                width: self.device.get(DeviceProperty::FrameWidth)? as u32,
                height: self.device.get(DeviceProperty::FrameHeight)? as u32,
            };

            debug!(
                fps = spec.fps,
                width = spec.width,
                height = spec.height,
                "Opening video writer"
            );
            match self.writer_factory.open(&spec) {
                Ok(writer) => recording.writer = Some(writer),
                Err(e) => {
                    warn!(path = %spec.path.display(), "Failed to open video writer: {}", e);
                    self.recording = None;
                    return Err(e);
                }
            }
        }

        if let Some(writer) = recording.writer.as_mut() {
            writer.write(frame)?;
        }

        Ok(())
    }
}

impl Drop for CaptureManager {
    fn drop(&mut self) {
        if let Err(e) = self.stop_writing_video() {
            warn!("Failed to finish recording: {}", e);
        }
    }
}
