use crate::marker::Marker;
use eframe::Storage;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info, warn};

// Same key the browser version of the board kept its snapshot under.
pub const STORAGE_KEY: &str = "svgObjects";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to encode markers: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode markers: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to access `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub fn encode(markers: &[Marker]) -> Result<String, SnapshotError> {
    serde_json::to_string(markers).map_err(SnapshotError::Encode)
}

pub fn decode(text: &str) -> Result<Vec<Marker>, SnapshotError> {
    serde_json::from_str(text).map_err(SnapshotError::Decode)
}

pub fn read_file(path: &Path) -> Result<Vec<Marker>, SnapshotError> {
    let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode(&text)
}

pub fn write_file(path: &Path, markers: &[Marker]) -> Result<(), SnapshotError> {
    let text = serde_json::to_string_pretty(markers).map_err(SnapshotError::Encode)?;
    std::fs::write(path, text).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })
}

// The whole ordered collection, as one JSON array under a single key.
pub struct Snapshot {
    key: String,
}

impl Snapshot {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn save(&self, storage: &mut dyn Storage, markers: &[Marker]) {
        match encode(markers) {
            Ok(text) => {
                storage.set_string(&self.key, text);
                storage.flush();
            }
            Err(err) => error!(key = %self.key, "snapshot not saved: {err}"),
        }
    }

    /// A missing or unreadable snapshot loads as an empty board.
    pub fn load(&self, storage: &dyn Storage) -> Vec<Marker> {
        let Some(text) = storage.get_string(&self.key) else {
            info!(key = %self.key, "no saved markers, starting empty");
            return Vec::new();
        };

        match decode(&text) {
            Ok(markers) => {
                info!(key = %self.key, count = markers.len(), "markers restored");
                markers
            }
            Err(err) => {
                warn!(key = %self.key, "discarding unreadable snapshot: {err}");
                Vec::new()
            }
        }
    }
}

// Lives only as long as the process. Used when eframe has no durable storage
// to offer, and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.values.insert(key.to_owned(), value);
    }

    fn flush(&mut self) {}
}
