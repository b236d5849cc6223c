//! Document store boundary
//!
//! The hosted document database is consumed through a small trait: append a
//! document, list a collection, patch named fields. Every write is stamped
//! with a server timestamp and an ISO-8601 submission time, and receives a
//! store-assigned id. Retries and timeouts are the backing client's business,
//! not ours.

use crate::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The collections this subsystem writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Leads,
    Contacts,
    Newsletter,
    TraditionalMarketing,
    Influencers,
    Freelancers,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Leads,
        Collection::Contacts,
        Collection::Newsletter,
        Collection::TraditionalMarketing,
        Collection::Influencers,
        Collection::Freelancers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Leads => "leads",
            Collection::Contacts => "contacts",
            Collection::Newsletter => "newsletter",
            Collection::TraditionalMarketing => "traditional_marketing",
            Collection::Influencers => "influencers",
            Collection::Freelancers => "freelancers",
        }
    }
}

/// A stored document with its store-assigned id and server stamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub server_timestamp: DateTime<Utc>,
    pub body: Value,
}

/// Append/query/update access to the hosted document database
pub trait DocumentStore {
    /// Append a document. The store strips nulls at the top level, stamps
    /// `submitted_at` (ISO-8601) into the body, and returns the new id.
    fn add(
        &mut self,
        collection: Collection,
        body: Value,
        now: DateTime<Utc>,
    ) -> Result<String, EngineError>;

    /// All documents in a collection, newest first by server timestamp
    fn list(&self, collection: Collection) -> Result<Vec<Document>, EngineError>;

    /// Patch named fields of one document without rewriting the rest
    fn update_fields(
        &mut self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError>;
}

/// In-memory store for tests and the CLI
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: HashMap<Collection, Vec<Document>>,
    /// When set, every call fails as if the network were down
    pub fail_requests: bool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_online(&self) -> Result<(), EngineError> {
        if self.fail_requests {
            Err(EngineError::Storage("network unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn add(
        &mut self,
        collection: Collection,
        body: Value,
        now: DateTime<Utc>,
    ) -> Result<String, EngineError> {
        self.check_online()?;

        let mut body = match body {
            Value::Object(map) => map,
            other => {
                return Err(EngineError::StoreRejected {
                    collection: collection.as_str().to_string(),
                    reason: format!("expected an object, got {other}"),
                })
            }
        };
        body.retain(|_, v| !v.is_null());
        body.insert("submitted_at".to_string(), Value::String(now.to_rfc3339()));

        let id = uuid::Uuid::new_v4().to_string();
        self.collections.entry(collection).or_default().push(Document {
            id: id.clone(),
            server_timestamp: now,
            body: Value::Object(body),
        });
        Ok(id)
    }

    fn list(&self, collection: Collection) -> Result<Vec<Document>, EngineError> {
        self.check_online()?;
        let mut docs = self
            .collections
            .get(&collection)
            .cloned()
            .unwrap_or_default();
        docs.sort_by(|a, b| b.server_timestamp.cmp(&a.server_timestamp));
        Ok(docs)
    }

    fn update_fields(
        &mut self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        self.check_online()?;
        let docs = self
            .collections
            .get_mut(&collection)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;

        let Value::Object(body) = &mut doc.body else {
            return Err(EngineError::Parse(format!(
                "document {id} body is not an object"
            )));
        };
        for (key, value) in fields {
            body.insert(key, value);
        }
        body.insert("updated_at".to_string(), Value::String(now.to_rfc3339()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn t(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn add_stamps_and_strips_nulls() {
        let mut store = MemoryDocumentStore::new();
        let id = store
            .add(
                Collection::Contacts,
                json!({"name": "A", "phone": null}),
                t(10),
            )
            .unwrap();
        assert!(!id.is_empty());

        let docs = store.list(Collection::Contacts).unwrap();
        assert_eq!(docs.len(), 1);
        let body = docs[0].body.as_object().unwrap();
        assert!(!body.contains_key("phone"));
        assert!(body.contains_key("submitted_at"));
    }

    #[test]
    fn list_is_newest_first() {
        let mut store = MemoryDocumentStore::new();
        store.add(Collection::Leads, json!({"n": 1}), t(9)).unwrap();
        store.add(Collection::Leads, json!({"n": 2}), t(11)).unwrap();
        store.add(Collection::Leads, json!({"n": 3}), t(10)).unwrap();

        let docs = store.list(Collection::Leads).unwrap();
        let order: Vec<i64> = docs
            .iter()
            .map(|d| d.body["n"].as_i64().unwrap())
            .collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn update_fields_patches_in_place() {
        let mut store = MemoryDocumentStore::new();
        let id = store
            .add(Collection::Leads, json!({"status": "new", "name": "A"}), t(9))
            .unwrap();

        let mut patch = Map::new();
        patch.insert("status".to_string(), json!("contacted"));
        store
            .update_fields(Collection::Leads, &id, patch, t(10))
            .unwrap();

        let docs = store.list(Collection::Leads).unwrap();
        let body = docs[0].body.as_object().unwrap();
        assert_eq!(body["status"], "contacted");
        assert_eq!(body["name"], "A");
        assert!(body.contains_key("updated_at"));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = MemoryDocumentStore::new();
        store.add(Collection::Leads, json!({}), t(9)).unwrap();
        let err = store
            .update_fields(Collection::Leads, "nope", Map::new(), t(10))
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn offline_store_fails_every_call() {
        let mut store = MemoryDocumentStore::new();
        store.fail_requests = true;
        assert!(store.add(Collection::Leads, json!({}), t(9)).is_err());
        assert!(store.list(Collection::Leads).is_err());
    }
}
