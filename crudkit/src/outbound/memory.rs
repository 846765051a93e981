//! In-memory record model over JSON documents.
//!
//! Documents are JSON objects keyed by a string `"id"` field. The adapter is
//! meant for tests and local demos: it keeps insertion order, supports
//! top-level equality filters and can simulate a connection outage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::domain::Operation;
use crate::domain::ports::{RecordModel, RecordModelError};

const ID_FIELD: &str = "id";

/// Top-level field equality filter. The empty filter matches every document.
///
/// # Examples
/// ```
/// use crudkit::outbound::memory::DocumentFilter;
/// use serde_json::json;
///
/// let filter = DocumentFilter::default().with("name", "A");
/// assert!(filter.matches(&json!({ "id": "1", "name": "A" })));
/// assert!(!filter.matches(&json!({ "id": "2", "name": "B" })));
/// assert!(DocumentFilter::default().matches(&json!({ "id": "3" })));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentFilter(Map<String, Value>);

impl DocumentFilter {
    /// Add an equality constraint on `field`.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Whether `document` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

impl From<Map<String, Value>> for DocumentFilter {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

/// Existence indicator returned by [`InMemoryRecordModel`]: the id of the
/// first matching document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRecord {
    /// Identifier of the matched document.
    pub id: String,
}

/// JSON document store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryRecordModel {
    documents: Mutex<Vec<Value>>,
    offline: AtomicBool,
    calls: Mutex<HashMap<Operation, usize>>,
}

impl InMemoryRecordModel {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `documents`.
    ///
    /// # Errors
    /// Returns [`RecordModelError::Rejected`] when a document is not an
    /// object or repeats an id.
    pub fn seeded(documents: impl IntoIterator<Item = Value>) -> Result<Self, RecordModelError> {
        let model = Self::new();
        {
            let mut stored = model.lock_documents()?;
            let prepared = prepare_batch(&stored, documents.into_iter().collect())?;
            stored.extend(prepared);
        }
        Ok(model)
    }

    /// Make every subsequent call fail with a connection error, or restore
    /// normal service.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of backend calls made for `operation`, failed calls included.
    pub fn calls(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    fn begin(
        &self,
        operation: Operation,
    ) -> Result<MutexGuard<'_, Vec<Value>>, RecordModelError> {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(operation)
            .or_insert(0) += 1;

        if self.offline.load(Ordering::SeqCst) {
            debug!(%operation, "in-memory store is offline");
            return Err(RecordModelError::connection("in-memory store is offline"));
        }
        self.lock_documents()
    }

    fn lock_documents(&self) -> Result<MutexGuard<'_, Vec<Value>>, RecordModelError> {
        self.documents
            .lock()
            .map_err(|_| RecordModelError::connection("in-memory store lock poisoned"))
    }
}

fn document_id(document: &Value) -> Option<&str> {
    document.get(ID_FIELD).and_then(Value::as_str)
}

fn position_of(documents: &[Value], id: &str) -> Option<usize> {
    documents
        .iter()
        .position(|document| document_id(document) == Some(id))
}

fn prepare_document(data: Value) -> Result<Value, RecordModelError> {
    let Value::Object(mut fields) = data else {
        return Err(RecordModelError::rejected("documents must be JSON objects"));
    };
    match fields.get(ID_FIELD) {
        None => {
            fields.insert(ID_FIELD.to_owned(), Value::from(Uuid::new_v4().to_string()));
        }
        Some(Value::String(_)) => {}
        Some(other) => {
            return Err(RecordModelError::rejected(format!(
                "document id must be a string, found {other}"
            )));
        }
    }
    Ok(Value::Object(fields))
}

/// Check a whole batch against the stored documents and against itself so
/// that nothing is stored when any document is rejected.
fn prepare_batch(stored: &[Value], batch: Vec<Value>) -> Result<Vec<Value>, RecordModelError> {
    let mut prepared: Vec<Value> = Vec::with_capacity(batch.len());
    for data in batch {
        let document = prepare_document(data)?;
        let id = document_id(&document).unwrap_or_default();
        if position_of(stored, id).is_some() || position_of(&prepared, id).is_some() {
            return Err(RecordModelError::rejected(format!("duplicate id {id}")));
        }
        prepared.push(document);
    }
    Ok(prepared)
}

#[async_trait]
impl RecordModel for InMemoryRecordModel {
    type Id = String;
    type Record = Value;
    type Data = Value;
    type Filter = DocumentFilter;
    type Existence = ExistingRecord;

    async fn create(&self, data: Value) -> Result<Value, RecordModelError> {
        let mut documents = self.begin(Operation::Create)?;
        let mut prepared = prepare_batch(&documents, vec![data])?;
        let document = prepared
            .pop()
            .ok_or_else(|| RecordModelError::query("document preparation produced nothing"))?;
        documents.push(document.clone());
        Ok(document)
    }

    async fn find_by_id(&self, id: &String) -> Result<Option<Value>, RecordModelError> {
        let documents = self.begin(Operation::Get)?;
        Ok(position_of(&documents, id).and_then(|index| documents.get(index).cloned()))
    }

    async fn find_by_id_and_update(
        &self,
        id: &String,
        data: Value,
    ) -> Result<Option<Value>, RecordModelError> {
        let mut documents = self.begin(Operation::Update)?;
        let Some(document) = documents
            .iter_mut()
            .find(|document| document_id(document) == Some(id.as_str()))
        else {
            return Ok(None);
        };
        let Value::Object(changes) = data else {
            return Err(RecordModelError::rejected("updates must be JSON objects"));
        };
        if let Value::Object(fields) = document {
            for (field, value) in changes {
                if field != ID_FIELD {
                    fields.insert(field, value);
                }
            }
        }
        Ok(Some(document.clone()))
    }

    async fn find_by_id_and_delete(&self, id: &String) -> Result<Option<Value>, RecordModelError> {
        let mut documents = self.begin(Operation::Delete)?;
        Ok(position_of(&documents, id).map(|index| documents.remove(index)))
    }

    async fn find(&self, filter: DocumentFilter) -> Result<Vec<Value>, RecordModelError> {
        let documents = self.begin(Operation::GetAll)?;
        Ok(documents
            .iter()
            .filter(|document| filter.matches(document))
            .cloned()
            .collect())
    }

    async fn insert_many(&self, records: Vec<Value>) -> Result<Vec<Value>, RecordModelError> {
        let mut documents = self.begin(Operation::InsertMany)?;
        let prepared = prepare_batch(&documents, records)?;
        documents.extend(prepared.iter().cloned());
        Ok(prepared)
    }

    async fn count_documents(&self, filter: DocumentFilter) -> Result<u64, RecordModelError> {
        let documents = self.begin(Operation::Count)?;
        let matched = documents
            .iter()
            .filter(|document| filter.matches(document))
            .count();
        u64::try_from(matched).map_err(|err| RecordModelError::query(err.to_string()))
    }

    async fn exists(
        &self,
        filter: DocumentFilter,
    ) -> Result<Option<ExistingRecord>, RecordModelError> {
        let documents = self.begin(Operation::Exists)?;
        Ok(documents
            .iter()
            .find(|document| filter.matches(document))
            .map(|document| ExistingRecord {
                id: document_id(document).unwrap_or_default().to_owned(),
            }))
    }
}
