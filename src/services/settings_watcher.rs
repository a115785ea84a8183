//! Settings file watcher
//!
//! Watches the directory holding the settings file and reports changes to
//! that one file. The driver polls between frames; bursts of editor writes
//! collapse into a single event per poll.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Event sent when the settings file changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChanged {
    pub path: PathBuf,
}

pub struct SettingsWatcher {
    receiver: mpsc::Receiver<SettingsChanged>,
    /// Handle to the watcher (kept alive)
    _watcher: Option<RecommendedWatcher>,
    active: bool,
}

impl SettingsWatcher {
    /// Watch `settings_file`. With no path, or a path that does not exist,
    /// the watcher is inactive and never reports anything.
    pub fn new(settings_file: Option<&Path>) -> Self {
        let (sender, receiver) = mpsc::channel();

        let (watcher, active) = match settings_file {
            Some(path) if path.exists() => match Self::start_watcher(path, sender) {
                Ok(watcher) => {
                    tracing::info!(path = %path.display(), "Settings watcher started");
                    (Some(watcher), true)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to start settings watcher");
                    (None, false)
                }
            },
            Some(path) => {
                tracing::debug!(path = %path.display(), "Settings file does not exist, not watching");
                (None, false)
            }
            None => {
                tracing::debug!("No settings file configured, watching disabled");
                (None, false)
            }
        };

        Self {
            receiver,
            _watcher: watcher,
            active,
        }
    }

    fn start_watcher(
        path: &Path,
        sender: mpsc::Sender<SettingsChanged>,
    ) -> Result<RecommendedWatcher, notify::Error> {
        let name = path.file_name().map(OsString::from).unwrap_or_default();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    if let Some(path) = relevant_path(&event, &name) {
                        let _ = sender.send(SettingsChanged { path });
                    }
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(watcher)
    }

    /// Drain pending notifications, returning the latest if any arrived
    pub fn poll(&self) -> Option<SettingsChanged> {
        let latest = self.receiver.try_iter().last();
        if let Some(ref change) = latest {
            tracing::debug!(path = %change.path.display(), "Settings changed");
        }
        latest
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// The path in `event` naming the watched file, if it was written or created
fn relevant_path(event: &Event, name: &OsString) -> Option<PathBuf> {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return None;
    }
    event
        .paths
        .iter()
        .find(|p| p.file_name() == Some(name.as_os_str()))
        .cloned()
}
