use crate::assets::SettingsLoader;
use crate::error::SettingsError;
use serde::Deserialize;
use vision_core::{FrameSize, SkipRate, SkipRateError, Vision};

/// Application settings loaded from settings.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Preview frame geometry
    #[serde(default)]
    pub capture: CaptureSettings,

    /// Frame skipping
    #[serde(default)]
    pub throttle: ThrottleSettings,

    /// Vision selected when the session starts
    #[serde(default = "default_vision")]
    pub vision: String,
}

fn default_vision() -> String {
    Vision::Normal.slug().to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CaptureSettings {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    640
}

fn default_height() -> u32 {
    480
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Skip rate as written in the file: either `25` or `"25"`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawSkipRate {
    Number(i64),
    Text(String),
}

impl Default for RawSkipRate {
    fn default() -> Self {
        RawSkipRate::Text(SkipRate::DEFAULT.percent().to_string())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct ThrottleSettings {
    /// Whether frame skipping is enabled at all
    #[serde(default)]
    pub skip_frames: bool,

    #[serde(default)]
    pub skip_rate: RawSkipRate,
}

impl ThrottleSettings {
    /// Validate the configured skip rate
    pub fn skip_rate(&self) -> Result<SkipRate, SkipRateError> {
        match &self.skip_rate {
            RawSkipRate::Number(n) => SkipRate::try_from(*n),
            RawSkipRate::Text(s) => s.parse(),
        }
    }
}

impl Settings {
    /// Load settings from the loader, falling back to defaults on any error
    pub fn load_from_assets(loader: &SettingsLoader) -> Self {
        match loader.read_settings_string() {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(settings) => {
                    tracing::info!(
                        width = settings.capture.width,
                        height = settings.capture.height,
                        skip_frames = settings.throttle.skip_frames,
                        vision = %settings.vision,
                        "Loaded settings"
                    );
                    settings
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    /// Parse settings YAML. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn frame_size(&self) -> Result<FrameSize, SettingsError> {
        Ok(FrameSize::new(self.capture.width, self.capture.height)?)
    }

    pub fn initial_vision(&self) -> Result<Vision, SettingsError> {
        Ok(self.vision.parse()?)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capture: CaptureSettings::default(),
            throttle: ThrottleSettings::default(),
            vision: default_vision(),
        }
    }
}
