// Persisted client state: the pinned set and the last supported schema
// version. One JSON document, rewritten whole on every save.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use zedrecent_common::pins::PinnedSet;

use crate::security::write_private_atomic;

/// Layout version of the `pins` value. A document carrying any other version
/// is treated as having no pins.
pub const PINS_VERSION: &str = "1";

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access state file `{}`", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("state file `{}` is malformed", path.display())]
    Malformed { path: PathBuf, source: serde_json::Error },
}

/// Where the repository and the CLI keep what they remember between runs.
pub trait StateStore {
    fn load_schema_version(&self) -> Result<Option<i64>, StateError>;
    fn save_schema_version(&self, version: i64) -> Result<(), StateError>;
    fn load_pins(&self) -> Result<PinnedSet, StateError>;
    fn save_pins(&self, pins: &PinnedSet) -> Result<(), StateError>;
}

impl<T: StateStore + ?Sized> StateStore for &T {
    fn load_schema_version(&self) -> Result<Option<i64>, StateError> {
        (**self).load_schema_version()
    }

    fn save_schema_version(&self, version: i64) -> Result<(), StateError> {
        (**self).save_schema_version(version)
    }

    fn load_pins(&self) -> Result<PinnedSet, StateError> {
        (**self).load_pins()
    }

    fn save_pins(&self, pins: &PinnedSet) -> Result<(), StateError> {
        (**self).save_pins(pins)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct StateDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    schema_version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pins_version: Option<String>,
    // Kept untyped so a document from another layout still loads.
    pins: serde_json::Value,
}

/// Path of the state file: `<data_local_dir>/zedrecent/state.json`.
pub fn default_state_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("zedrecent").join("state.json"))
}

#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StateDocument, StateError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StateDocument::default());
            }
            Err(source) => return Err(StateError::Io { path: self.path.clone(), source }),
        };
        if contents.trim().is_empty() {
            return Ok(StateDocument::default());
        }
        serde_json::from_str(&contents)
            .map_err(|source| StateError::Malformed { path: self.path.clone(), source })
    }

    fn write(&self, document: &StateDocument) -> Result<(), StateError> {
        let json = serde_json::to_vec_pretty(document)
            .map_err(|source| StateError::Malformed { path: self.path.clone(), source })?;
        write_private_atomic(&self.path, &json)
            .map_err(|source| StateError::Io { path: self.path.clone(), source })
    }
}

impl StateStore for JsonStateStore {
    fn load_schema_version(&self) -> Result<Option<i64>, StateError> {
        Ok(self.read()?.schema_version)
    }

    fn save_schema_version(&self, version: i64) -> Result<(), StateError> {
        let mut document = self.read()?;
        if document.schema_version == Some(version) {
            return Ok(());
        }
        document.schema_version = Some(version);
        debug!(version, path = %self.path.display(), "caching workspace schema version");
        self.write(&document)
    }

    fn load_pins(&self) -> Result<PinnedSet, StateError> {
        let document = self.read()?;
        if document.pins.is_null() {
            return Ok(PinnedSet::new());
        }
        if document.pins_version.as_deref() != Some(PINS_VERSION) {
            warn!(
                found = document.pins_version.as_deref().unwrap_or("none"),
                expected = PINS_VERSION,
                "ignoring pinned entries stored with another layout version"
            );
            return Ok(PinnedSet::new());
        }
        serde_json::from_value(document.pins)
            .map_err(|source| StateError::Malformed { path: self.path.clone(), source })
    }

    fn save_pins(&self, pins: &PinnedSet) -> Result<(), StateError> {
        let mut document = self.read()?;
        document.pins_version = Some(PINS_VERSION.to_string());
        document.pins = serde_json::to_value(pins)
            .map_err(|source| StateError::Malformed { path: self.path.clone(), source })?;
        self.write(&document)
    }
}

/// In-process state, for tests and one-shot runs that must not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default, Clone)]
struct MemoryState {
    schema_version: Option<i64>,
    pins: PinnedSet,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema_version(version: i64) -> Self {
        let store = Self::default();
        store.lock().schema_version = Some(version);
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStateStore {
    fn load_schema_version(&self) -> Result<Option<i64>, StateError> {
        Ok(self.lock().schema_version)
    }

    fn save_schema_version(&self, version: i64) -> Result<(), StateError> {
        self.lock().schema_version = Some(version);
        Ok(())
    }

    fn load_pins(&self) -> Result<PinnedSet, StateError> {
        Ok(self.lock().pins.clone())
    }

    fn save_pins(&self, pins: &PinnedSet) -> Result<(), StateError> {
        self.lock().pins = pins.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use zedrecent_common::types::WorkspaceKind;

    fn sample_pins() -> PinnedSet {
        let mut pins = PinnedSet::new();
        pins.pin("file:///home/dev/api", WorkspaceKind::Local);
        pins.pin("ssh://build.box/srv/site", WorkspaceKind::Remote);
        pins
    }

    #[test]
    fn missing_file_loads_as_empty_state() {
        let dir = tempdir().expect("tempdir should be created");
        let store = JsonStateStore::new(dir.path().join("state.json"));

        assert_eq!(store.load_schema_version().expect("load should succeed"), None);
        assert!(store.load_pins().expect("load should succeed").is_empty());
    }

    #[test]
    fn pins_and_version_survive_independent_saves() {
        let dir = tempdir().expect("tempdir should be created");
        let store = JsonStateStore::new(dir.path().join("zedrecent").join("state.json"));

        store.save_pins(&sample_pins()).expect("save pins");
        store.save_schema_version(28).expect("save version");

        let reopened = JsonStateStore::new(store.path());
        assert_eq!(reopened.load_schema_version().expect("load version"), Some(28));
        assert_eq!(reopened.load_pins().expect("load pins"), sample_pins());
    }

    #[test]
    fn pins_from_another_layout_version_are_ignored() {
        let dir = tempdir().expect("tempdir should be created");
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"schema_version":26,"pins_version":"0","pins":{"file:///a":{"order":0}}}"#,
        )
        .expect("fixture should be written");

        let store = JsonStateStore::new(&path);
        assert!(store.load_pins().expect("load should succeed").is_empty());
        assert_eq!(store.load_schema_version().expect("load should succeed"), Some(26));
    }

    #[test]
    fn stored_orders_are_repaired_on_load() {
        let dir = tempdir().expect("tempdir should be created");
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"pins_version":"1","pins":[
                {"uri":"file:///b","order":7,"kind":"local"},
                {"uri":"file:///a","order":3,"kind":"local"}
            ]}"#,
        )
        .expect("fixture should be written");

        let pins = JsonStateStore::new(&path).load_pins().expect("load should succeed");
        let ordered: Vec<(&str, usize)> =
            pins.ordered().into_iter().map(|entry| (entry.uri.as_str(), entry.order)).collect();
        assert_eq!(ordered, vec![("file:///a", 0), ("file:///b", 1)]);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempdir().expect("tempdir should be created");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").expect("fixture should be written");

        let error = JsonStateStore::new(&path).load_pins().expect_err("load should fail");
        assert!(matches!(error, StateError::Malformed { .. }));
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStateStore::with_schema_version(26);
        assert_eq!(store.load_schema_version().unwrap(), Some(26));
        store.save_pins(&sample_pins()).unwrap();
        assert_eq!(store.load_pins().unwrap().len(), 2);
    }
}
