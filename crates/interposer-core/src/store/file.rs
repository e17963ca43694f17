//! Reference file-backed `CassetteStore`: one JSON file, atomic writes
//! (write-to-temp, then rename), base64-encoded byte fields, lowercase-hex
//! fingerprints.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cassette::Cassette;
use crate::errors::{CassetteIoError, InterposerError};
use crate::interaction::Interaction;
use crate::store::{CassetteStore, StoreOptions};

/// On-disk shape of a cassette: `{ "interactions": [...] }` (spec §6).
#[derive(Serialize, Deserialize)]
struct CassetteFile {
    interactions: Vec<Interaction>,
}

/// The canonical reference store: one cassette per JSON file on the local
/// filesystem.
pub struct FileCassetteStore {
    path: PathBuf,
    options: StoreOptions,
}

impl FileCassetteStore {
    pub fn new(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    /// Strict mode (default): missing storage is a load error.
    pub fn strict(path: impl Into<PathBuf>) -> Self {
        Self::new(path, StoreOptions::default())
    }

    /// Create-if-missing mode: a missing file loads as an empty cassette.
    pub fn create_if_missing(path: impl Into<PathBuf>) -> Self {
        Self::new(
            path,
            StoreOptions {
                create_if_missing: true,
            },
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CassetteStore for FileCassetteStore {
    fn load(&self) -> Result<Cassette, InterposerError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if self.options.create_if_missing {
                    tracing::debug!(path = %self.path.display(), "cassette store missing, starting empty");
                    return Ok(Cassette::empty());
                }
                return Err(InterposerError::cassette_load(CassetteIoError::Missing {
                    path: self.path.clone(),
                }));
            }
            Err(source) => {
                return Err(InterposerError::cassette_load(CassetteIoError::Io {
                    path: self.path.clone(),
                    source,
                }))
            }
        };

        let file: CassetteFile = serde_json::from_str(&content).map_err(|source| {
            InterposerError::cassette_load(CassetteIoError::Parse {
                path: self.path.clone(),
                source,
            })
        })?;

        tracing::debug!(
            path = %self.path.display(),
            interactions = file.interactions.len(),
            "loaded cassette"
        );
        Ok(Cassette::new(file.interactions))
    }

    fn save(&self, cassette: &Cassette) -> Result<(), InterposerError> {
        let file = CassetteFile {
            interactions: cassette.interactions().to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| {
            InterposerError::cassette_save(CassetteIoError::Serialize {
                path: self.path.clone(),
                source,
            })
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| {
                    InterposerError::cassette_save(CassetteIoError::Io {
                        path: self.path.clone(),
                        source,
                    })
                })?;
            }
        }

        let temp_name = format!(
            ".{}.tmp",
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "cassette.json".to_string())
        );
        let temp_path = self.path.with_file_name(temp_name);
        fs::write(&temp_path, json.as_bytes()).map_err(|source| {
            InterposerError::cassette_save(CassetteIoError::Io {
                path: temp_path.clone(),
                source,
            })
        })?;
        fs::rename(&temp_path, &self.path).map_err(|source| {
            InterposerError::cassette_save(CassetteIoError::Io {
                path: self.path.clone(),
                source,
            })
        })?;

        tracing::debug!(
            path = %self.path.display(),
            interactions = cassette.len(),
            "saved cassette"
        );
        Ok(())
    }
}
