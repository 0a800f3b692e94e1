//! Change notifications for committed preference mutations

use crate::document::ValueChange;
use crate::scope::Scope;
use crate::sync::{MutexExt, RwLockExt};

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, RwLock};

/// A committed change to one logical preference key
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceChange {
    pub scope: Scope,
    /// Folder root, for folder-scope changes
    pub folder: Option<PathBuf>,
    /// Plain or combined key
    pub key: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

impl PreferenceChange {
    pub(crate) fn from_value_change(
        scope: Scope,
        folder: Option<PathBuf>,
        change: ValueChange,
    ) -> Self {
        Self {
            scope,
            folder,
            key: change.key,
            old_value: change.old_value,
            new_value: change.new_value,
        }
    }
}

/// Type alias for a change callback
pub type ChangeCallback = Arc<dyn Fn(&PreferenceChange) + Send + Sync>;

/// Manages listeners for preference changes
pub struct EventManager {
    /// Global listeners (called for all changes)
    global_listeners: RwLock<Vec<ChangeCallback>>,

    /// Per-key listeners (called only for changes to that exact key)
    key_listeners: RwLock<HashMap<String, Vec<ChangeCallback>>>,

    /// Channel subscribers; disconnected ones are dropped on the next notify
    subscribers: Mutex<Vec<Sender<PreferenceChange>>>,
}

impl EventManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            global_listeners: RwLock::new(Vec::new()),
            key_listeners: RwLock::new(HashMap::new()),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a listener called for every committed change
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn(&PreferenceChange) + Send + Sync + 'static,
    {
        self.global_listeners
            .write_recovered()
            .push(Arc::new(callback));
    }

    /// Register a listener for one key (e.g. `editor.tabSize` or
    /// `[rust].editor.tabSize`)
    pub fn watch<F>(&self, key: &str, callback: F)
    where
        F: Fn(&PreferenceChange) + Send + Sync + 'static,
    {
        self.key_listeners
            .write_recovered()
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Receive every committed change on a channel
    pub fn subscribe(&self) -> Receiver<PreferenceChange> {
        let (tx, rx) = channel();
        self.subscribers.lock_recovered().push(tx);
        rx
    }

    /// Notify all listeners about a change
    pub fn notify(&self, change: &PreferenceChange) {
        // Clone the callbacks out so a listener may register others
        let global: Vec<ChangeCallback> = self.global_listeners.read_recovered().clone();
        for callback in &global {
            callback(change);
        }

        let keyed: Vec<ChangeCallback> = self
            .key_listeners
            .read_recovered()
            .get(&change.key)
            .cloned()
            .unwrap_or_default();
        for callback in &keyed {
            callback(change);
        }

        self.subscribers
            .lock_recovered()
            .retain(|tx| tx.send(change.clone()).is_ok());
    }

    /// Remove all listeners for a specific key
    pub fn unwatch(&self, key: &str) {
        self.key_listeners.write_recovered().remove(key);
    }

    /// Clear all listeners and subscribers
    pub fn clear(&self) {
        self.global_listeners.write_recovered().clear();
        self.key_listeners.write_recovered().clear();
        self.subscribers.lock_recovered().clear();
    }
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
