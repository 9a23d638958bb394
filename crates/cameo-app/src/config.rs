//! Application configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use cameo_capture::FourCc;
use serde::{Deserialize, Serialize};

/// Settings for a Cameo session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Camera index passed to the capture backend.
    pub camera_index: i32,

    /// Title of the preview window.
    pub window_name: String,

    /// Show the preview left-right flipped, like a mirror.
    pub mirror_preview: bool,

    /// Directory for screenshots.
    pub screenshot_dir: PathBuf,

    /// Directory for screen recordings.
    pub recording_dir: PathBuf,

    /// Four-character codec tag for recordings.
    pub video_fourcc: String,

    /// Screenshot file extension; selects the image format.
    pub screenshot_extension: String,

    /// Recording file extension; selects the container.
    pub recording_extension: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            window_name: "Cameo".to_string(),
            mirror_preview: true,
            screenshot_dir: PathBuf::from("media/screenshots"),
            recording_dir: PathBuf::from("media/screenrecords"),
            video_fourcc: FourCc::I420.to_string(),
            screenshot_extension: "png".to_string(),
            recording_extension: "avi".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Parsed recording codec tag.
    pub fn fourcc(&self) -> anyhow::Result<FourCc> {
        self.video_fourcc
            .parse()
            .with_context(|| format!("Invalid video_fourcc {:?}", self.video_fourcc))
    }
}
