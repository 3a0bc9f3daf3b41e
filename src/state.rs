//! Controller-scoped saved state.
//!
//! A small serializable key-value bag that outlives any single controller
//! instance: the host checkpoints `snapshot()` when tearing a screen down
//! and rebuilds the controller with `from_snapshot()`, so pending search
//! text and half-typed edits survive a presentation-layer reload. This is
//! not durable storage — the task collection never lives here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Debug, Default)]
pub struct SavedState {
    values: Arc<Mutex<Map<String, Value>>>,
}

impl SavedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a checkpoint. Anything other than a JSON object starts
    /// the bag empty.
    pub fn from_snapshot(snapshot: Value) -> Self {
        let values = match snapshot {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            values: Arc::new(Mutex::new(values)),
        }
    }

    /// Serializable view of the current contents, for checkpointing.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.lock().clone())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let values = self.lock();
        values
            .get(key)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
    }

    pub fn put<T: Serialize>(&self, key: &str, value: T) {
        if let Ok(value) = serde_json::to_value(value) {
            self.lock().insert(key.to_string(), value);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Map<String, Value>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
