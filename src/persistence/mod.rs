//! Save/load persistence for settings and high scores
//!
//! - Plain JSON files
//! - Atomic-ish writes (tmp file, then rename over the target)
//! - Corrupt or missing files fall back to defaults
//!
//! The simulation never touches this module; the outer application does.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed json in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, PersistError> {
    let text = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json = serde_json::to_string_pretty(value).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Load `path`, or return `T::default()` when it is missing or unreadable
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path) {
        Ok(value) => {
            log::info!("Loaded {}", path.display());
            value
        }
        Err(PersistError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::info!("No {} found, using defaults", path.display());
            T::default()
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::settings::Settings;
    use crate::tuning::Difficulty;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jumpi-quest-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_settings_round_trip_on_disk() {
        let dir = scratch_dir("settings");
        let path = dir.join("settings.json");
        let mut settings = Settings::for_difficulty(Difficulty::Hard);
        settings.seed = Some(42);

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        assert!(!path.with_extension("tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = scratch_dir("missing");
        let scores: HighScores = load_or_default(&dir.join("nope.json"));
        assert!(scores.is_empty());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("scores.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_json::<HighScores>(&path),
            Err(PersistError::Json { .. })
        ));
        let scores: HighScores = load_or_default(&path);
        assert!(scores.is_empty());

        fs::remove_dir_all(&dir).unwrap();
    }
}
