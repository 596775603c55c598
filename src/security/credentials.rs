//! Credential store interface and the in-memory implementation.
//!
//! The gate only needs two capabilities from a store: does it know a field, and
//! does any record carry a given value in that field. Anything (SQL, KV, a file)
//! can sit behind [`CredentialStore`].

use std::collections::HashSet;
use std::path::Path;

use dashmap::DashMap;
use futures_util::future::{self, BoxFuture};
use serde_json::{Map, Value};

/// One record returned by a successful lookup.
pub type CredentialRecord = Map<String, Value>;

/// Failure of a credential lookup or load.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read credentials file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse credentials file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// External oracle answering "does this token identify an authorized subject".
pub trait CredentialStore: Send + Sync {
    /// Whether records in this store expose `field`.
    fn has_field(&self, field: &str) -> bool;

    /// Find a record whose `field` equals `value`.
    fn find_by_field<'a>(
        &'a self,
        field: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<Option<CredentialRecord>, CredentialError>>;
}

/// A [`CredentialStore`] backed by a concurrent map.
///
/// Records are indexed by every declared field holding a string value. Records can
/// be added and revoked while serving, e.g. by a login handler issuing tokens.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    fields: HashSet<String>,
    index: DashMap<(String, String), CredentialRecord>,
}

impl MemoryCredentialStore {
    /// Create a store whose records expose `fields`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            index: DashMap::new(),
        }
    }

    /// Load a JSON array of objects. The field set is the union of all record keys.
    pub fn load_from_file(path: &Path) -> Result<Self, CredentialError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<CredentialRecord> = serde_json::from_str(&content)?;

        let fields = records.iter().flat_map(|r| r.keys().cloned());
        let store = Self::new(fields.collect::<Vec<_>>());
        for record in records {
            store.insert(record);
        }

        tracing::info!(path = ?path, records = store.len(), "Loaded credentials");
        Ok(store)
    }

    /// Index a record under each declared string field.
    pub fn insert(&self, record: CredentialRecord) {
        for field in &self.fields {
            if let Some(Value::String(value)) = record.get(field) {
                self.index
                    .insert((field.clone(), value.clone()), record.clone());
            }
        }
    }

    /// Remove the record indexed under `field = value`, along with every other
    /// index entry of that record.
    pub fn revoke(&self, field: &str, value: &str) -> Option<CredentialRecord> {
        let (_, record) = self.index.remove(&(field.to_string(), value.to_string()))?;
        for other in &self.fields {
            if let Some(Value::String(v)) = record.get(other) {
                self.index
                    .remove_if(&(other.clone(), v.clone()), |_, indexed| indexed == &record);
            }
        }
        Some(record)
    }

    /// Number of indexed `(field, value)` entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn has_field(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    fn find_by_field<'a>(
        &'a self,
        field: &'a str,
        value: &'a str,
    ) -> BoxFuture<'a, Result<Option<CredentialRecord>, CredentialError>> {
        let found = self
            .index
            .get(&(field.to_string(), value.to_string()))
            .map(|entry| entry.value().clone());
        Box::pin(future::ready(Ok(found)))
    }
}
