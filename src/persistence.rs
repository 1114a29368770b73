//! Anchor persistence.
//!
//! Only the anchor is ever persisted. The transform is identity at rest, so
//! storing it would only give a later load a way to reintroduce drift.
//!
//! Records are keyed `bb-position-<node_id>`.

use crate::constants::{APP_DIR_NAME, POSITION_KEY_PREFIX, POSITION_RECORD_VERSION};
use crate::error::{StorageError, StorageResult};
use crate::types::{AnchorOrigin, AnchorState};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// The persisted unit for one element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub node_id: String,
    pub anchor: AnchorState,
    pub origin: AnchorOrigin,
    /// Unix time in milliseconds
    pub saved_at: u64,
    pub version: u32,
}

impl PositionRecord {
    pub fn new(node_id: impl Into<String>, anchor: AnchorState, origin: AnchorOrigin) -> Self {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            node_id: node_id.into(),
            anchor,
            origin,
            saved_at,
            version: POSITION_RECORD_VERSION,
        }
    }

    fn check_version(self) -> StorageResult<Self> {
        if self.version != POSITION_RECORD_VERSION {
            return Err(StorageError::Version {
                found: self.version,
                expected: POSITION_RECORD_VERSION,
            });
        }
        Ok(self)
    }
}

/// Storage key for a node
pub fn position_key(node_id: &str) -> String {
    format!("{POSITION_KEY_PREFIX}{node_id}")
}

/// Persistence sink for committed anchors.
pub trait PositionStore {
    fn save(&self, record: &PositionRecord) -> StorageResult<()>;

    fn load(&self, node_id: &str) -> StorageResult<Option<PositionRecord>>;

    /// Returns true if a record was removed
    fn remove(&self, node_id: &str) -> StorageResult<bool>;
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory key/value store holding serialized records. Clones share the
/// same map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Raw serialized value for a key, as written
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl PositionStore for MemoryStore {
    fn save(&self, record: &PositionRecord) -> StorageResult<()> {
        let json = serde_json::to_string(record)?;
        self.entries.lock().insert(position_key(&record.node_id), json);
        Ok(())
    }

    fn load(&self, node_id: &str) -> StorageResult<Option<PositionRecord>> {
        let Some(json) = self.raw(&position_key(node_id)) else {
            return Ok(None);
        };
        let record: PositionRecord = serde_json::from_str(&json)?;
        record.check_version().map(Some)
    }

    fn remove(&self, node_id: &str) -> StorageResult<bool> {
        Ok(self.entries.lock().remove(&position_key(node_id)).is_some())
    }
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// One pretty-printed JSON file per node in a directory.
///
/// Writes go to a temp file in the same directory and are renamed into
/// place, so a crash never leaves a half-written record.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory, if there is one
    pub fn in_default_location() -> Option<Self> {
        default_data_dir().map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `node_id`. The key is percent-encoded, so distinct ids
    /// never share a file and no id can leave `dir`.
    pub fn path_for(&self, node_id: &str) -> PathBuf {
        let key = position_key(node_id);
        self.dir.join(format!("{}.json", urlencoding::encode(&key)))
    }
}

impl PositionStore for JsonFileStore {
    fn save(&self, record: &PositionRecord) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&record.node_id);

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), record)?;
        tmp.as_file_mut().flush()?;
        tmp.persist(&path).map_err(|e| StorageError::Persist {
            path: path.display().to_string(),
            source: e.error,
        })?;

        debug!(node_id = %record.node_id, path = %path.display(), "Saved position record");
        Ok(())
    }

    fn load(&self, node_id: &str) -> StorageResult<Option<PositionRecord>> {
        let path = self.path_for(node_id);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)?;
        let record: PositionRecord = serde_json::from_str(&json)?;
        record.check_version().map(Some)
    }

    fn remove(&self, node_id: &str) -> StorageResult<bool> {
        let path = self.path_for(node_id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path)?;
        Ok(true)
    }
}

/// Platform data directory for position records
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR_NAME).join("positions"))
}
