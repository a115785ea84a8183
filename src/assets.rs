//! Settings file loading with an embedded fallback
//!
//! - If no settings path is configured: use the embedded `settings.yaml`
//! - If a path is configured and the file exists: read it from disk
//! - If a path is configured but missing: fall back to the embedded copy

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming the settings file.
pub const SETTINGS_FILE_ENV: &str = "SETTINGS_FILE";

const SETTINGS_NAME: &str = "settings.yaml";

/// Embedded default settings
#[derive(RustEmbed)]
#[folder = "."]
#[include = "settings.yaml"]
struct EmbeddedSettings;

/// Where the effective settings come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// Read from this file
    File(PathBuf),
    /// Built-in defaults, no file configured
    Embedded,
    /// Built-in defaults because the configured file does not exist
    EmbeddedFallback(PathBuf),
}

/// Report of an init (extraction) operation
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Settings loader with optional filesystem override
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    settings_file: Option<PathBuf>,
}

impl SettingsLoader {
    /// Create a loader. `None` uses the embedded settings exclusively.
    pub fn new(settings_file: Option<PathBuf>) -> Self {
        Self { settings_file }
    }

    /// Create a loader from an explicit path, or the `SETTINGS_FILE` env var.
    pub fn from_env_or(explicit: Option<PathBuf>) -> Self {
        let settings_file =
            explicit.or_else(|| std::env::var(SETTINGS_FILE_ENV).ok().map(PathBuf::from));
        Self::new(settings_file)
    }

    /// The configured settings path, if any
    pub fn settings_file(&self) -> Option<&Path> {
        self.settings_file.as_deref()
    }

    pub fn source(&self) -> SettingsSource {
        match &self.settings_file {
            Some(path) if path.exists() => SettingsSource::File(path.clone()),
            Some(path) => SettingsSource::EmbeddedFallback(path.clone()),
            None => SettingsSource::Embedded,
        }
    }

    /// The embedded default settings
    pub fn embedded() -> io::Result<Cow<'static, [u8]>> {
        EmbeddedSettings::get(SETTINGS_NAME)
            .map(|f| f.data)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Embedded settings.yaml not found")
            })
    }

    /// Read the settings file
    pub fn read_settings(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.settings_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading settings from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        tracing::trace!("Loading settings from embedded assets");
        Self::embedded()
    }

    /// Read settings as a UTF-8 string
    pub fn read_settings_string(&self) -> io::Result<String> {
        let bytes = self.read_settings()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Write the embedded settings to `target` (or the configured path, or
    /// `./settings.yaml`). Existing files are kept unless `force` is set.
    pub fn init(&self, target: Option<&Path>, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();
        let path = target
            .map(Path::to_path_buf)
            .or_else(|| self.settings_file.clone())
            .unwrap_or_else(|| PathBuf::from(SETTINGS_NAME));

        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(report);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &*Self::embedded()?)?;
        report.written.push(path.display().to_string());
        Ok(report)
    }
}
