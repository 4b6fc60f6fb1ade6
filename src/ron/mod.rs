//! Utilities for loading RON files and watching directories for changes.
//!
//! Settings live as RON files on disk. This module reads them and provides a
//! filesystem watcher resource that raises a shared flag when any of them is
//! modified, which drives key binding hot-reload.

use bevy::log::warn;
use bevy::prelude::Resource;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Why a settings file could not be used.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Resource)]
/// File-watcher resource for RON hot-reload.
pub struct RonWatcher {
    /// Set to `true` when a watched file changes.
    pub changed: Arc<Mutex<bool>>,
    _watcher: Option<RecommendedWatcher>,
}

impl RonWatcher {
    /// A watcher with no OS watch behind it; `changed` never flips.
    ///
    /// Used as a fallback when watcher creation fails.
    #[must_use]
    pub fn stub() -> Self {
        RonWatcher { changed: Arc::new(Mutex::new(false)), _watcher: None }
    }

    /// Return whether a change was flagged and clear the flag.
    pub fn take_changed(&self) -> bool {
        let mut flag = match self.changed.lock() {
            Ok(flag) => flag,
            Err(poisoned) => {
                warn!("ron watcher mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        std::mem::take(&mut *flag)
    }
}

/// Read and deserialize one RON file.
///
/// # Errors
/// [`SettingsError::Io`] if the file cannot be read, [`SettingsError::Parse`]
/// if its content is not a valid `T`.
pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T, SettingsError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })?;
    ron::from_str::<T>(&content).map_err(|source| SettingsError::Parse { path: path.to_path_buf(), source })
}

/// Load all `.ron` files from a directory and deserialize them into `T`.
///
/// Files are visited in name order. Files that fail to read or parse are
/// skipped with a warning.
#[must_use]
pub fn load_ron_files<T: DeserializeOwned>(path: &str) -> Vec<T> {
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();

    files
        .iter()
        .filter_map(|file| match load_ron_file(file) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("{e}");
                None
            }
        })
        .collect()
}

/// Create a `RonWatcher` that watches a directory for modifications.
///
/// # Errors
/// Returns a `notify::Error` if the underlying file-watcher cannot be
/// created or cannot be registered for `path`.
pub fn setup_ron_watcher(path: &str) -> Result<RonWatcher, notify::Error> {
    let changed = Arc::new(Mutex::new(false));
    let changed_clone = changed.clone();
    let watched_path: PathBuf = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if !matches!(event.kind, notify::EventKind::Modify(_)) {
                    return;
                }
                let relevant = event.paths.iter().any(|p| {
                    std::fs::canonicalize(p).unwrap_or_else(|_| p.clone()).starts_with(&watched_path)
                });
                if relevant {
                    match changed_clone.lock() {
                        Ok(mut flag) => *flag = true,
                        Err(poisoned) => *poisoned.into_inner() = true,
                    }
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
        Config::default(),
    )?;

    watcher.watch(Path::new(path), RecursiveMode::NonRecursive)?;
    Ok(RonWatcher { changed, _watcher: Some(watcher) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        value: u32,
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("topdown_controller_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_ron_files_in_name_order_and_skips_bad_ones() {
        let dir = scratch_dir("load");
        std::fs::write(dir.join("b.ron"), "(value: 2)").unwrap();
        std::fs::write(dir.join("a.ron"), "(value: 1)").unwrap();
        std::fs::write(dir.join("c.ron"), "(value: \"nope\")").unwrap();
        std::fs::write(dir.join("notes.txt"), "(value: 9)").unwrap();

        let items: Vec<Sample> = load_ron_files(dir.to_str().unwrap());
        assert_eq!(items, vec![Sample { value: 1 }, Sample { value: 2 }]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_directory_loads_nothing() {
        let items: Vec<Sample> = load_ron_files("/definitely/not/here");
        assert!(items.is_empty());
    }

    #[test]
    fn single_file_errors_are_typed() {
        let dir = scratch_dir("errors");
        let missing = load_ron_file::<Sample>(&dir.join("missing.ron"));
        assert!(matches!(missing, Err(SettingsError::Io { .. })));

        std::fs::write(dir.join("bad.ron"), "(value: -1)").unwrap();
        let bad = load_ron_file::<Sample>(&dir.join("bad.ron"));
        assert!(matches!(bad, Err(SettingsError::Parse { .. })));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn stub_watcher_flag_is_taken_once() {
        let watcher = RonWatcher::stub();
        assert!(!watcher.take_changed());
        *watcher.changed.lock().unwrap() = true;
        assert!(watcher.take_changed());
        assert!(!watcher.take_changed());
    }
}
