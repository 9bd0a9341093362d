//! Host-owned synced state.
//!
//! The host keeps a flat map of JSON values that survives across sessions.
//! `SyncedState` layers the widget's typed view on top of it; its setters are
//! the only way state changes, and each one writes through to the store.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::NormalizedRecord;
use tracing::{debug, warn};

use crate::{Result, WidgetError};

pub const KEY_DATA: &str = "notion-data";
pub const KEY_LOADING: &str = "loading";
pub const KEY_ERROR_MSG: &str = "errorMsg";
pub const KEY_MONTH_OFFSET: &str = "monthOffset";

/// Key/value storage owned by the host.
pub trait StateStore: Send {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

/// Volatile store, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as one JSON object on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, Value>,
}

impl JsonFileStore {
    /// Open the store, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|e| {
                WidgetError::Store(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            debug!("No state file at {}, starting empty", path.display());
            HashMap::new()
        };

        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| WidgetError::Store(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

/// The widget's view of its synced state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub data: Vec<NormalizedRecord>,
    pub loading: bool,
    pub error_msg: String,
    /// Months relative to the current calendar month.
    pub month_offset: i32,
}

impl WidgetState {
    /// Whether mounting should trigger the first fetch.
    pub fn needs_initial_fetch(&self) -> bool {
        self.data.is_empty() && !self.loading && self.error_msg.is_empty()
    }
}

/// Typed state backed by a `StateStore`.
pub struct SyncedState<S> {
    store: S,
    view: WidgetState,
}

impl<S: StateStore> SyncedState<S> {
    /// Read every key, falling back to defaults for absent or malformed values.
    pub fn load(store: S) -> Self {
        let view = WidgetState {
            data: read_or_default(&store, KEY_DATA),
            loading: read_or_default(&store, KEY_LOADING),
            error_msg: read_or_default(&store, KEY_ERROR_MSG),
            month_offset: read_or_default(&store, KEY_MONTH_OFFSET),
        };
        Self { store, view }
    }

    pub fn view(&self) -> &WidgetState {
        &self.view
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_data(&mut self, data: Vec<NormalizedRecord>) -> Result<()> {
        write(&mut self.store, KEY_DATA, &data)?;
        self.view.data = data;
        Ok(())
    }

    pub fn set_loading(&mut self, loading: bool) -> Result<()> {
        write(&mut self.store, KEY_LOADING, &loading)?;
        self.view.loading = loading;
        Ok(())
    }

    pub fn set_error_msg(&mut self, error_msg: impl Into<String>) -> Result<()> {
        let error_msg = error_msg.into();
        write(&mut self.store, KEY_ERROR_MSG, &error_msg)?;
        self.view.error_msg = error_msg;
        Ok(())
    }

    pub fn set_month_offset(&mut self, month_offset: i32) -> Result<()> {
        write(&mut self.store, KEY_MONTH_OFFSET, &month_offset)?;
        self.view.month_offset = month_offset;
        Ok(())
    }
}

fn read_or_default<S: StateStore, T: DeserializeOwned + Default>(store: &S, key: &str) -> T {
    match store.get(key) {
        None => T::default(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Ignoring malformed synced value for {}: {}", key, e);
            T::default()
        }),
    }
}

fn write<S: StateStore, T: Serialize>(store: &mut S, key: &str, value: &T) -> Result<()> {
    let value = serde_json::to_value(value).map_err(|e| WidgetError::Store(e.to_string()))?;
    store.set(key, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> NormalizedRecord {
        NormalizedRecord {
            id: id.into(),
            title: format!("Task {}", id),
            status: "Todo".into(),
        }
    }

    #[test]
    fn test_defaults_on_empty_store() {
        let state = SyncedState::load(MemoryStore::new());
        assert_eq!(state.view(), &WidgetState::default());
        assert!(state.view().needs_initial_fetch());
    }

    #[test]
    fn test_setters_write_through() {
        let mut state = SyncedState::load(MemoryStore::new());
        state.set_data(vec![record("1")]).unwrap();
        state.set_loading(true).unwrap();
        state.set_error_msg("Error: 500").unwrap();
        state.set_month_offset(-3).unwrap();

        let store = state.store();
        assert_eq!(store.get(KEY_LOADING), Some(json!(true)));
        assert_eq!(store.get(KEY_ERROR_MSG), Some(json!("Error: 500")));
        assert_eq!(store.get(KEY_MONTH_OFFSET), Some(json!(-3)));
        assert_eq!(
            store.get(KEY_DATA),
            Some(json!([{"id": "1", "title": "Task 1", "status": "Todo"}]))
        );
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let mut store = MemoryStore::new();
        store.set(KEY_MONTH_OFFSET, json!("soon")).unwrap();
        store.set(KEY_LOADING, json!(false)).unwrap();
        let state = SyncedState::load(store);
        assert_eq!(state.view().month_offset, 0);
    }

    #[test]
    fn test_initial_fetch_guard() {
        let mut view = WidgetState::default();
        assert!(view.needs_initial_fetch());

        view.loading = true;
        assert!(!view.needs_initial_fetch());

        view.loading = false;
        view.error_msg = "Error: 401".into();
        assert!(!view.needs_initial_fetch());

        view.error_msg.clear();
        view.data.push(record("1"));
        assert!(!view.needs_initial_fetch());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let mut state = SyncedState::load(JsonFileStore::open(&path).unwrap());
            state.set_data(vec![record("a"), record("b")]).unwrap();
            state.set_month_offset(2).unwrap();
        }

        let state = SyncedState::load(JsonFileStore::open(&path).unwrap());
        assert_eq!(state.view().data.len(), 2);
        assert_eq!(state.view().data[1].id, "b");
        assert_eq!(state.view().month_offset, 2);
        assert!(!state.view().loading);
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(WidgetError::Store(_))
        ));
    }
}
