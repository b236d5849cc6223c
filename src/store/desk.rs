//! Dashboard-side lead state
//!
//! `LeadDesk` owns the in-memory view of the leads collection. Every mutation
//! is store-first: the change is applied to a working copy, persisted, and
//! only then committed locally. If the store rejects the write the local view
//! stays exactly as it was.

use crate::error::EngineError;
use crate::store::document::{Collection, DocumentStore};
use crate::store::submission::validate_lead;
use crate::triage::{
    append_note, apply_status_transition, rescore, sort_leads, LeadPriority, LeadRecord,
    LeadStatus,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

pub struct LeadDesk<S: DocumentStore> {
    store: S,
    leads: Vec<LeadRecord>,
}

impl<S: DocumentStore> LeadDesk<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            leads: Vec::new(),
        }
    }

    /// Current view, ordered by score then recency. Valid between loads.
    pub fn leads(&self) -> &[LeadRecord] {
        &self.leads
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reload the view from the store.
    ///
    /// Each document is re-validated on the way in; documents that do not
    /// parse as leads are logged and skipped. Records persisted before the
    /// scoring fields existed get their score and priority re-derived.
    /// Returns how many leads were loaded.
    pub fn load(&mut self) -> Result<usize, EngineError> {
        let docs = self.store.list(Collection::Leads)?;
        let mut leads = Vec::with_capacity(docs.len());
        for doc in docs {
            match parse_lead(&doc.id, doc.body) {
                Ok(lead) => leads.push(lead),
                Err(err) => {
                    log::warn!("skipping malformed lead document {}: {err}", doc.id);
                }
            }
        }
        sort_leads(&mut leads);
        self.leads = leads;
        Ok(self.leads.len())
    }

    /// Validate and persist a freshly captured lead, then add it to the view.
    pub fn capture(
        &mut self,
        mut lead: LeadRecord,
        now: DateTime<Utc>,
    ) -> Result<String, EngineError> {
        validate_lead(&lead)?;
        let body = serde_json::to_value(&lead)?;
        let id = self.store.add(Collection::Leads, body, now)?;
        lead.id = Some(id.clone());
        self.leads.push(lead);
        sort_leads(&mut self.leads);
        Ok(id)
    }

    pub fn set_status(
        &mut self,
        id: &str,
        status: LeadStatus,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let idx = self.index_of(id)?;
        let mut updated = self.leads[idx].clone();
        apply_status_transition(&mut updated, status, now)?;

        let mut patch = Map::new();
        patch.insert("status".to_string(), json!(updated.status));
        patch.insert("last_contact".to_string(), json!(updated.last_contact));
        self.store.update_fields(Collection::Leads, id, patch, now)?;

        self.leads[idx] = updated;
        Ok(())
    }

    pub fn set_priority(
        &mut self,
        id: &str,
        priority: LeadPriority,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let idx = self.index_of(id)?;
        let mut updated = self.leads[idx].clone();
        updated.priority = priority;

        let mut patch = Map::new();
        patch.insert("priority".to_string(), json!(priority));
        self.store.update_fields(Collection::Leads, id, patch, now)?;

        self.leads[idx] = updated;
        Ok(())
    }

    pub fn add_note(
        &mut self,
        id: &str,
        text: &str,
        author: &str,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let idx = self.index_of(id)?;
        let mut updated = self.leads[idx].clone();
        append_note(&mut updated, text, author, now)?;

        let mut patch = Map::new();
        patch.insert("notes".to_string(), json!(updated.notes));
        self.store.update_fields(Collection::Leads, id, patch, now)?;

        self.leads[idx] = updated;
        Ok(())
    }

    fn index_of(&self, id: &str) -> Result<usize, EngineError> {
        self.leads
            .iter()
            .position(|lead| lead.id.as_deref() == Some(id))
            .ok_or_else(|| EngineError::NotFound(id.to_string()))
    }
}

/// Parse a stored document into a lead, repairing records that predate the
/// derived fields.
fn parse_lead(id: &str, mut body: Value) -> Result<LeadRecord, EngineError> {
    let needs_rescore = match body.as_object_mut() {
        Some(map) => {
            let missing = !map.contains_key("lead_score") || !map.contains_key("priority");
            if missing {
                map.entry("lead_score").or_insert(json!(0));
                map.entry("priority").or_insert(json!("low"));
            }
            map.entry("status").or_insert(json!("new"));
            missing
        }
        None => {
            return Err(EngineError::Parse(format!(
                "lead document {id} is not an object"
            )))
        }
    };

    let mut lead: LeadRecord = serde_json::from_value(body)?;
    lead.id = Some(id.to_string());
    if needs_rescore {
        rescore(&mut lead);
    }
    Ok(lead)
}
