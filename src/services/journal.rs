//! Capped, newest-first journals kept for the admin's own reference: the
//! activity log and the SQL console history.
//!
//! These are not authoritative. A failed read yields an empty journal and a
//! failed write is logged and dropped.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const ACTIVITY_LIMIT: usize = 50;
pub const QUERY_HISTORY_LIMIT: usize = 20;

/// Raw persistence for a journal: one JSON array per key.
#[async_trait]
pub trait JournalBackend: Send + Sync {
    async fn load(&self, key: &str) -> Result<Vec<serde_json::Value>, String>;
    async fn store(&self, key: &str, entries: &[serde_json::Value]) -> Result<(), String>;
    async fn clear(&self, key: &str) -> Result<(), String>;
}

/// Process-local backend, used in tests and when Redis is not wanted.
#[derive(Default)]
pub struct MemoryJournal {
    entries: Mutex<HashMap<String, Vec<serde_json::Value>>>,
}

#[async_trait]
impl JournalBackend for MemoryJournal {
    async fn load(&self, key: &str) -> Result<Vec<serde_json::Value>, String> {
        let entries = self.entries.lock().map_err(|e| e.to_string())?;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }

    async fn store(&self, key: &str, values: &[serde_json::Value]) -> Result<(), String> {
        let mut entries = self.entries.lock().map_err(|e| e.to_string())?;
        entries.insert(key.to_string(), values.to_vec());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), String> {
        let mut entries = self.entries.lock().map_err(|e| e.to_string())?;
        entries.remove(key);
        Ok(())
    }
}

/// A typed journal under one backend key.
pub struct Journal<T> {
    backend: Arc<dyn JournalBackend>,
    key: String,
    limit: usize,
    _entry: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Journal<T> {
    pub fn new(backend: Arc<dyn JournalBackend>, key: impl Into<String>, limit: usize) -> Self {
        Self {
            backend,
            key: key.into(),
            limit,
            _entry: PhantomData,
        }
    }

    /// Entries newest first. Unreadable entries are skipped.
    pub async fn entries(&self) -> Vec<T> {
        match self.backend.load(&self.key).await {
            Ok(values) => values
                .into_iter()
                .filter_map(|v| serde_json::from_value(v).ok())
                .collect(),
            Err(e) => {
                tracing::warn!("Failed to read journal {}: {e}", self.key);
                Vec::new()
            }
        }
    }

    /// Prepend `entry`, keeping at most `limit` entries.
    pub async fn push(&self, entry: T) {
        let value = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to encode journal entry for {}: {e}", self.key);
                return;
            }
        };
        let existing = match self.backend.load(&self.key).await {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("Failed to read journal {}: {e}", self.key);
                Vec::new()
            }
        };
        let updated = prepend_capped(existing, value, self.limit);
        if let Err(e) = self.backend.store(&self.key, &updated).await {
            tracing::warn!("Failed to write journal {}: {e}", self.key);
        }
    }

    pub async fn clear(&self) {
        if let Err(e) = self.backend.clear(&self.key).await {
            tracing::warn!("Failed to clear journal {}: {e}", self.key);
        }
    }
}

/// Newest first, at most `limit` long.
pub fn prepend_capped<T>(mut entries: Vec<T>, entry: T, limit: usize) -> Vec<T> {
    entries.truncate(limit.saturating_sub(1));
    entries.insert(0, entry);
    entries
}

// ── Activity log ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Feature,
    Unfeature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub action: ActivityAction,
    /// Title of the portfolio the action touched.
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(action: ActivityAction, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            title: title.into(),
            timestamp: Utc::now(),
        }
    }
}

pub type ActivityLog = Journal<ActivityEntry>;

// ── SQL console history ──

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryHistoryEntry {
    pub id: Uuid,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: f64,
    pub row_count: usize,
    pub success: bool,
}

pub type QueryHistory = Journal<QueryHistoryEntry>;
