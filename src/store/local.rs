//! Durable per-origin key-value storage
//!
//! Models the browser's localStorage: string keys, string values, writes that
//! can fail (quota) and reads that can return garbage (a previous version of
//! the site, a user edit). Parse failures clear the offending key and the
//! feature falls back to its default instead of crashing the page.

use crate::error::EngineError;
use crate::tracker::VisitorSnapshot;
use crate::triage::LeadRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage keys, namespaced to avoid collisions with other scripts
pub mod keys {
    pub const VISITOR_ID: &str = "leadpulse_visitor_id";
    pub const VISITORS: &str = "leadpulse_visitors";
    pub const LEADS: &str = "leadpulse_leads";
    pub const MODAL_SHOWN: &str = "leadpulse_modal_shown";
    pub const COOKIE_CONSENT: &str = "leadpulse_cookie_consent";
    pub const NEWSLETTER: &str = "leadpulse_newsletter";
}

/// Days after which a newsletter subscription record is considered stale
pub const NEWSLETTER_EXPIRY_DAYS: i64 = 30;

/// String key-value storage with per-origin durability semantics.
pub trait LocalStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), EngineError>;
    fn remove(&mut self, key: &str);
}

/// In-memory implementation for tests and the CLI
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    /// When set, every write fails as if the quota were exhausted
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        if self.fail_writes {
            return Err(EngineError::Storage("quota exceeded".to_string()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Read a JSON array under `key`, clearing the key and returning an empty
/// vector if the stored value does not parse.
fn read_array<T: for<'de> Deserialize<'de>>(storage: &mut dyn LocalStorage, key: &str) -> Vec<T> {
    let Some(raw) = storage.get(key) else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            log::warn!("clearing malformed '{key}' entry: {e}");
            storage.remove(key);
            Vec::new()
        }
    }
}

fn write_array<T: Serialize>(
    storage: &mut dyn LocalStorage,
    key: &str,
    items: &[T],
) -> Result<(), EngineError> {
    let json = serde_json::to_string(items)?;
    storage.set(key, &json)
}

/// Upsert a snapshot into the visitor array, keyed by session id.
///
/// Replace-if-present semantics make the end-of-session flush idempotent.
pub fn upsert_snapshot(
    storage: &mut dyn LocalStorage,
    snapshot: &VisitorSnapshot,
) -> Result<(), EngineError> {
    let mut visitors: Vec<VisitorSnapshot> = read_array(storage, keys::VISITORS);
    match visitors
        .iter_mut()
        .find(|v| v.session_id == snapshot.session_id)
    {
        Some(existing) => *existing = snapshot.clone(),
        None => visitors.push(snapshot.clone()),
    }
    write_array(storage, keys::VISITORS, &visitors)
}

/// All persisted snapshots, newest last (append order)
pub fn load_snapshots(storage: &mut dyn LocalStorage) -> Vec<VisitorSnapshot> {
    read_array(storage, keys::VISITORS)
}

/// Append a captured lead to the same-tab mirror used by the dashboard
pub fn mirror_lead(storage: &mut dyn LocalStorage, lead: &LeadRecord) -> Result<(), EngineError> {
    let mut leads: Vec<LeadRecord> = read_array(storage, keys::LEADS);
    leads.push(lead.clone());
    write_array(storage, keys::LEADS, &leads)
}

/// Leads mirrored in this browser
pub fn mirrored_leads(storage: &mut dyn LocalStorage) -> Vec<LeadRecord> {
    read_array(storage, keys::LEADS)
}

/// Get-or-create the per-browser visitor id.
///
/// Returns `(visitor_id, is_returning)`. A write failure still yields a
/// usable id for the current session; the visitor just won't be recognized
/// next time.
pub fn visitor_identity(storage: &mut dyn LocalStorage) -> (String, bool) {
    if let Some(id) = storage.get(keys::VISITOR_ID) {
        if !id.is_empty() {
            return (id, true);
        }
    }
    let id = uuid::Uuid::new_v4().to_string();
    if let Err(e) = storage.set(keys::VISITOR_ID, &id) {
        log::warn!("could not persist visitor id: {e}");
    }
    (id, false)
}

/// Whether the capture modal has already been shown this tab session
pub fn modal_shown(storage: &dyn LocalStorage) -> bool {
    storage.get(keys::MODAL_SHOWN).as_deref() == Some("true")
}

pub fn set_modal_shown(storage: &mut dyn LocalStorage) {
    if let Err(e) = storage.set(keys::MODAL_SHOWN, "true") {
        log::warn!("could not persist modal flag: {e}");
    }
}

/// Cookie-consent flag; absent means undecided
pub fn cookie_consent(storage: &dyn LocalStorage) -> Option<bool> {
    match storage.get(keys::COOKIE_CONSENT).as_deref() {
        Some("accepted") => Some(true),
        Some("declined") => Some(false),
        _ => None,
    }
}

pub fn set_cookie_consent(storage: &mut dyn LocalStorage, accepted: bool) {
    let value = if accepted { "accepted" } else { "declined" };
    if let Err(e) = storage.set(keys::COOKIE_CONSENT, value) {
        log::warn!("could not persist consent flag: {e}");
    }
}

/// The most recent newsletter subscription from this browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterRecord {
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

pub fn save_newsletter(
    storage: &mut dyn LocalStorage,
    email: &str,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    let record = NewsletterRecord {
        email: email.to_string(),
        subscribed_at: now,
    };
    let json = serde_json::to_string(&record)?;
    storage.set(keys::NEWSLETTER, &json)
}

/// The active subscription, if any. Expiry (30 days) is computed on read;
/// expired or malformed records clear the key and read as not-subscribed.
pub fn newsletter_subscription(
    storage: &mut dyn LocalStorage,
    now: DateTime<Utc>,
) -> Option<NewsletterRecord> {
    let raw = storage.get(keys::NEWSLETTER)?;
    let record: NewsletterRecord = match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(e) => {
            log::warn!("clearing malformed newsletter record: {e}");
            storage.remove(keys::NEWSLETTER);
            return None;
        }
    };
    if now - record.subscribed_at > Duration::days(NEWSLETTER_EXPIRY_DAYS) {
        storage.remove(keys::NEWSLETTER);
        return None;
    }
    Some(record)
}
