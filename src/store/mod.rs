//! Persistence boundaries
//!
//! Two storage surfaces with very different guarantees. The document store is
//! the durable, shared system of record; per-visitor local storage is a
//! best-effort cache whose failures degrade features instead of breaking
//! them.

pub mod desk;
pub mod document;
pub mod local;
pub mod submission;

pub use desk::LeadDesk;
pub use document::{Collection, Document, DocumentStore, MemoryDocumentStore};
pub use local::{
    cookie_consent, load_snapshots, mirror_lead, mirrored_leads, modal_shown,
    newsletter_subscription, save_newsletter, set_cookie_consent, set_modal_shown,
    upsert_snapshot, visitor_identity, LocalStorage, MemoryStorage, NewsletterRecord,
    NEWSLETTER_EXPIRY_DAYS,
};
pub use submission::{
    submit, validate_lead, ContactSubmission, FreelancerSubmission, InfluencerSubmission,
    NewsletterSubmission, SocialMediaLinks, Submission, TraditionalMarketingSubmission,
};
