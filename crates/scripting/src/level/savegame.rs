use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::SaveStore;

pub const SAVE_VERSION: u32 = 1;

/// On-disk container around the store produced by one save pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub save_version: u32,
    pub level_name: String,
    pub store: SaveStore,
}

impl SaveGame {
    pub fn new(level_name: impl Into<String>, store: SaveStore) -> Self {
        Self {
            save_version: SAVE_VERSION,
            level_name: level_name.into(),
            store,
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveGameError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("encode save json for {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("parse save json {path} at {json_path}: {source}")]
    Parse {
        path: PathBuf,
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed for {path} at {field}: expected {expected}, got {actual}")]
    Validation {
        path: PathBuf,
        field: &'static str,
        expected: String,
        actual: String,
    },
}

/// Writes `save` as pretty JSON. The file is written next to its final
/// location first and renamed over it, so readers never see a partial save.
pub fn write_save_game(path: &Path, save: &SaveGame) -> Result<(), SaveGameError> {
    let io_err = |source| SaveGameError::Io {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(save).map_err(|source| SaveGameError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let staging = staging_path_for(path);
    fs::write(&staging, json).map_err(io_err)?;
    if let Err(source) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(io_err(source));
    }
    Ok(())
}

/// Reads the save at `path`. A missing file is `Ok(None)`: the level has
/// never been saved.
pub fn read_save_game(
    path: &Path,
    expected_level: &str,
) -> Result<Option<SaveGame>, SaveGameError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SaveGameError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let save = parse_save_game(path, &raw)?;
    validate_save_game(path, &save, expected_level)?;
    Ok(Some(save))
}

fn parse_save_game(path: &Path, raw: &str) -> Result<SaveGame, SaveGameError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, SaveGame>(&mut deserializer).map_err(|error| {
        let json_path = error.path().to_string();
        SaveGameError::Parse {
            path: path.to_path_buf(),
            json_path,
            source: error.into_inner(),
        }
    })
}

fn validate_save_game(
    path: &Path,
    save: &SaveGame,
    expected_level: &str,
) -> Result<(), SaveGameError> {
    if save.save_version != SAVE_VERSION {
        return Err(SaveGameError::Validation {
            path: path.to_path_buf(),
            field: "save_version",
            expected: SAVE_VERSION.to_string(),
            actual: save.save_version.to_string(),
        });
    }
    if save.level_name != expected_level {
        return Err(SaveGameError::Validation {
            path: path.to_path_buf(),
            field: "level_name",
            expected: expected_level.to_string(),
            actual: save.level_name.clone(),
        });
    }
    Ok(())
}

fn staging_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("level.save.json");
    path.with_file_name(format!("{file_name}.partial"))
}
