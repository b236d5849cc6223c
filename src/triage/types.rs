//! Lead record types
//!
//! Workflow fields (`status`, `priority`) are closed enums. The classification
//! buckets (budget, timeframe, business type) stay as raw strings on purpose:
//! an unrecognized bucket value must degrade to the lowest-scoring band, never
//! fail deserialization of a record that is already in the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Follow-up workflow state. Transitions are advisory: any status may move to
/// any other (see `workflow::allowed_transitions`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Closed,
    Rejected,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Closed,
        LeadStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Closed => "closed",
            LeadStatus::Rejected => "rejected",
        }
    }
}

/// Coarse triage band for dashboard sorting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl LeadPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadPriority::Low => "low",
            LeadPriority::Medium => "medium",
            LeadPriority::High => "high",
            LeadPriority::Urgent => "urgent",
        }
    }
}

/// What caused the capture form to appear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureTrigger {
    PageLoad,
    ExitIntent,
    TimeSpent,
    Scroll,
    Manual,
}

/// The incentive shown alongside the capture form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferType {
    FreeConsultation,
    Audit,
    Guide,
    Demo,
}

/// A freeform follow-up note. Notes are append-only: never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadNote {
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

/// A captured lead, as stored and as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    /// Store-assigned identifier, absent until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // Contact
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,

    // Classification (raw bucket strings, see module docs)
    #[serde(default)]
    pub business_type: String,
    #[serde(default)]
    pub monthly_budget: String,
    #[serde(default)]
    pub interested_services: Vec<String>,
    #[serde(default)]
    pub current_challenges: String,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub referral_source: String,

    // Provenance
    pub trigger: CaptureTrigger,
    pub offer_type: OfferType,
    pub session_id: String,
    #[serde(default)]
    pub page_source: String,
    pub captured_at: DateTime<Utc>,

    // Workflow
    pub status: LeadStatus,
    pub priority: LeadPriority,
    #[serde(default)]
    pub notes: Vec<LeadNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<DateTime<Utc>>,
    /// Derived at capture time; recomputed only on explicit request
    pub lead_score: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LeadStatus::Qualified).unwrap(),
            "\"qualified\""
        );
        let parsed: LeadStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(parsed, LeadStatus::Rejected);
    }

    #[test]
    fn trigger_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&CaptureTrigger::ExitIntent).unwrap(),
            "\"exit-intent\""
        );
        assert_eq!(
            serde_json::to_string(&OfferType::FreeConsultation).unwrap(),
            "\"free-consultation\""
        );
    }

    #[test]
    fn priority_ordering_matches_urgency() {
        assert!(LeadPriority::Urgent > LeadPriority::High);
        assert!(LeadPriority::High > LeadPriority::Medium);
        assert!(LeadPriority::Medium > LeadPriority::Low);
    }

    #[test]
    fn lead_with_unknown_buckets_still_parses() {
        let json = r#"{
            "name": "A",
            "email": "a@b.com",
            "phone": "+1 555",
            "business_type": "conglomerate",
            "monthly_budget": "a-trillion",
            "trigger": "manual",
            "offer_type": "demo",
            "session_id": "s",
            "captured_at": "2025-06-01T00:00:00Z",
            "status": "new",
            "priority": "low",
            "lead_score": 0
        }"#;
        let lead: LeadRecord = serde_json::from_str(json).unwrap();
        assert_eq!(lead.monthly_budget, "a-trillion");
        assert!(lead.interested_services.is_empty());
        assert!(lead.id.is_none());
    }
}
