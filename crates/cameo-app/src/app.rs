//! The preview loop and its keyboard controls.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use cameo_capture::{CaptureDevice, CaptureManager, FourCc, VideoWriterFactory};
use cameo_window::{DisplaySurface, KeyCode, WindowManager};
use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;

/// Channel capacity for key presses (window -> loop).
pub const KEY_CHANNEL_CAPACITY: usize = 16;

/// Timestamp embedded in output file names.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Save the next frame as an image.
    Screenshot,

    /// Start recording, or stop the active recording.
    ToggleRecording,

    /// Close the window and leave the loop.
    Quit,
}

impl KeyAction {
    /// Map a key to its action, if any.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::SPACE => Some(Self::Screenshot),
            KeyCode::TAB => Some(Self::ToggleRecording),
            KeyCode::ESCAPE => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Camera preview with screenshot and recording controls.
pub struct Cameo {
    config: AppConfig,
    fourcc: FourCc,
    window: Arc<Mutex<WindowManager>>,
    capture: CaptureManager,
    key_rx: Receiver<KeyCode>,
}

impl Cameo {
    /// Wire a device, writer factory and display surface together.
    pub fn new(
        config: AppConfig,
        device: Box<dyn CaptureDevice>,
        writer_factory: Box<dyn VideoWriterFactory>,
        surface: Box<dyn DisplaySurface>,
    ) -> anyhow::Result<Self> {
        let fourcc = config.fourcc()?;
        let (key_tx, key_rx) = crossbeam_channel::bounded(KEY_CHANNEL_CAPACITY);

        let window = WindowManager::new(config.window_name.clone(), surface).with_key_callback(
            move |key| match key_tx.try_send(key) {
                Ok(()) => {}
                Err(TrySendError::Full(key)) => {
                    warn!(code = key.code(), "Key queue full, dropping key press");
                }
                Err(TrySendError::Disconnected(_)) => {}
            },
        );
        let window = Arc::new(Mutex::new(window));

        let mut capture =
            CaptureManager::new(device, writer_factory).with_preview(window.clone());
        capture.set_mirror_preview(config.mirror_preview);

        Ok(Self {
            config,
            fourcc,
            window,
            capture,
            key_rx,
        })
    }

    /// Returns true while the preview window is open.
    pub fn is_running(&self) -> bool {
        self.window.lock().is_window_created()
    }

    /// Run until the window is closed.
    #[instrument(name = "cameo_run", skip(self))]
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.window
            .lock()
            .create_window()
            .context("Failed to create preview window")?;

        info!("Preview running; space = screenshot, tab = record, esc = quit");
        while self.is_running() {
            self.step()?;
        }

        self.capture.stop_writing_video()?;
        info!(frames = self.capture.frames_elapsed(), "Preview closed");
        Ok(())
    }

    /// One loop iteration: capture a frame, then handle pending keys.
    pub fn step(&mut self) -> anyhow::Result<()> {
        self.capture.enter_frame()?;
        self.capture.exit_frame()?;
        self.window.lock().process_events()?;

        while let Ok(key) = self.key_rx.try_recv() {
            self.on_key_press(key)?;
        }

        Ok(())
    }

    fn on_key_press(&mut self, key: KeyCode) -> anyhow::Result<()> {
        let Some(action) = KeyAction::from_key(key) else {
            debug!(code = key.code(), "Unmapped key");
            return Ok(());
        };

        let now = Local::now();
        match action {
            KeyAction::Screenshot => {
                let path = self.screenshot_path(now);
                ensure_parent(&path)?;
                self.capture.write_image(path);
            }
            KeyAction::ToggleRecording => {
                if self.capture.is_writing_video() {
                    self.capture.stop_writing_video()?;
                } else {
                    let path = self.recording_path(now);
                    ensure_parent(&path)?;
                    self.capture.start_writing_video(&path, self.fourcc)?;
                }
            }
            KeyAction::Quit => {
                self.window.lock().destroy_window()?;
            }
        }

        Ok(())
    }

    fn screenshot_path(&self, now: DateTime<Local>) -> PathBuf {
        self.config.screenshot_dir.join(format!(
            "screenshot{}.{}",
            now.format(TIMESTAMP_FORMAT),
            self.config.screenshot_extension
        ))
    }

    fn recording_path(&self, now: DateTime<Local>) -> PathBuf {
        self.config.recording_dir.join(format!(
            "screen_record_{}.{}",
            now.format(TIMESTAMP_FORMAT),
            self.config.recording_extension
        ))
    }
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::Duration;

    use bytes::Bytes;
    use cameo_capture::{CaptureResult, DeviceProperty, Frame, VideoSpec, VideoWriter};
    use cameo_window::WindowResult;

    use super::*;

    struct StillCamera;

    impl CaptureDevice for StillCamera {
        fn grab(&mut self) -> CaptureResult<bool> {
            Ok(true)
        }

        fn retrieve(&mut self, _channel: u32) -> CaptureResult<Option<Frame>> {
            Frame::new(Bytes::from_static(&[0, 64, 128, 255, 255, 255]), 2, 1, 3).map(Some)
        }

        fn get(&self, property: DeviceProperty) -> CaptureResult<f64> {
            Ok(match property {
                DeviceProperty::Fps => 30.0,
                DeviceProperty::FrameWidth => 2.0,
                DeviceProperty::FrameHeight => 1.0,
            })
        }
    }

    #[derive(Default)]
    struct Recorded {
        opened: Vec<VideoSpec>,
        frames: usize,
        released: usize,
    }

    struct Writers(Arc<Mutex<Recorded>>);

    impl VideoWriterFactory for Writers {
        fn open(&mut self, spec: &VideoSpec) -> CaptureResult<Box<dyn VideoWriter>> {
            self.0.lock().opened.push(spec.clone());
            Ok(Box::new(Writer(self.0.clone())))
        }
    }

    struct Writer(Arc<Mutex<Recorded>>);

    impl VideoWriter for Writer {
        fn write(&mut self, _frame: &Frame) -> CaptureResult<()> {
            self.0.lock().frames += 1;
            Ok(())
        }

        fn release(&mut self) -> CaptureResult<()> {
            self.0.lock().released += 1;
            Ok(())
        }
    }

    /// Surface that replays a script of key presses, one per poll.
    struct ScriptedSurface {
        keys: VecDeque<Option<i32>>,
        shown: Arc<Mutex<usize>>,
    }

    impl DisplaySurface for ScriptedSurface {
        fn create(&mut self, _name: &str) -> WindowResult<()> {
            Ok(())
        }

        fn show(&mut self, _name: &str, _frame: &Frame) -> WindowResult<()> {
            *self.shown.lock() += 1;
            Ok(())
        }

        fn destroy(&mut self, _name: &str) -> WindowResult<()> {
            Ok(())
        }

        fn poll_key(&mut self, _timeout: Duration) -> WindowResult<Option<i32>> {
            Ok(self.keys.pop_front().flatten())
        }
    }

    struct Run {
        recorded: Arc<Mutex<Recorded>>,
        shown: Arc<Mutex<usize>>,
        config: AppConfig,
        _dir: tempfile::TempDir,
    }

    fn run_script(keys: &[Option<i32>]) -> Run {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            screenshot_dir: dir.path().join("shots"),
            recording_dir: dir.path().join("records"),
            ..Default::default()
        };
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let shown = Arc::new(Mutex::new(0));
        let surface = ScriptedSurface {
            keys: keys.iter().copied().collect(),
            shown: shown.clone(),
        };

        let mut app = Cameo::new(
            config.clone(),
            Box::new(StillCamera),
            Box::new(Writers(recorded.clone())),
            Box::new(surface),
        )
        .unwrap();
        app.run().unwrap();

        Run {
            recorded,
            shown,
            config,
            _dir: dir,
        }
    }

    fn files_in(dir: &Path) -> Vec<PathBuf> {
        match fs::read_dir(dir) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(
            KeyAction::from_key(KeyCode::SPACE),
            Some(KeyAction::Screenshot)
        );
        assert_eq!(
            KeyAction::from_key(KeyCode::TAB),
            Some(KeyAction::ToggleRecording)
        );
        assert_eq!(KeyAction::from_key(KeyCode::ESCAPE), Some(KeyAction::Quit));
        assert_eq!(KeyAction::from_key(KeyCode(b'q')), None);
    }

    #[test]
    fn test_escape_ends_loop() {
        let run = run_script(&[None, None, Some(27)]);

        assert_eq!(*run.shown.lock(), 3);
        assert!(run.recorded.lock().opened.is_empty());
    }

    #[test]
    fn test_space_writes_one_screenshot() {
        let run = run_script(&[Some(32), None, None, Some(27)]);

        let shots = files_in(&run.config.screenshot_dir);
        assert_eq!(shots.len(), 1);
        let name = shots[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("screenshot"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_tab_toggles_recording() {
        // Frames 2 and 3 are recorded between the two tab presses.
        let run = run_script(&[Some(9), None, Some(9), None, Some(27)]);

        let recorded = run.recorded.lock();
        assert_eq!(recorded.opened.len(), 1);
        assert_eq!(recorded.frames, 2);
        assert_eq!(recorded.released, 1);
        assert_eq!(recorded.opened[0].fourcc, FourCc::I420);
        assert!(recorded.opened[0]
            .path
            .starts_with(&run.config.recording_dir));
    }

    #[test]
    fn test_quit_finishes_active_recording() {
        let run = run_script(&[Some(9), None, Some(27)]);

        let recorded = run.recorded.lock();
        assert_eq!(recorded.frames, 2);
        assert_eq!(recorded.released, 1);
    }

    #[test]
    fn test_high_bits_are_ignored() {
        let run = run_script(&[Some(0x10_0000 | 27)]);

        assert_eq!(*run.shown.lock(), 1);
    }

    #[test]
    fn test_unmapped_key_is_ignored() {
        let run = run_script(&[Some(b'x' as i32), Some(27)]);

        assert_eq!(*run.shown.lock(), 2);
        assert!(files_in(&run.config.screenshot_dir).is_empty());
    }
}
