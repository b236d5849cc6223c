//! Lead triage engine
//!
//! Turns a captured lead into a prioritized, sortable, filterable record.
//! Scoring is deterministic and re-playable: the same input always yields the
//! same score.

pub mod filter;
pub mod scoring;
pub mod types;
pub mod workflow;

pub use filter::{filter_leads, sort_leads, LeadFilter, Selection};
pub use scoring::{compute_lead_score, compute_priority, rescore};
pub use types::{
    CaptureTrigger, LeadNote, LeadPriority, LeadRecord, LeadStatus, OfferType,
};
pub use workflow::{allowed_transitions, append_note, apply_status_transition};
