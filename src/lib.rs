//! LeadPulse - Visitor engagement tracking and lead triage engine
//!
//! LeadPulse turns raw page activity into prioritized sales leads through a
//! deterministic pipeline: session tracking → engagement scoring → capture
//! triggers → lead scoring → triage workflow.
//!
//! ## Modules
//!
//! - **Tracker**: Per-session visitor activity (time, scroll, clicks, exit intent)
//! - **Capture**: Trigger policy and the multi-step intake form
//! - **Triage**: Lead scoring, priority banding, filtering and workflow
//! - **Store**: Document store and per-visitor local storage boundaries

pub mod auth;
pub mod capture;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod store;
pub mod tracker;
pub mod triage;

pub use error::EngineError;
pub use tracker::{engagement_score, EngagementScore, SessionContext, VisitorSession};

// Triage exports
pub use triage::{compute_lead_score, compute_priority, LeadPriority, LeadRecord, LeadStatus};

// Storage exports
pub use store::{DocumentStore, LeadDesk, LocalStorage};

/// Engine version embedded in exports and diagnostics
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for exported payloads
pub const PRODUCER_NAME: &str = "leadpulse";
