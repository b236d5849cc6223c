//! Visitor session tracking
//!
//! Maintains one behavioral snapshot per browser tab and derives an
//! engagement score from it on request.
//!
//! Pipeline: browser events → `VisitorSession` → snapshot → engagement score

pub mod engagement;
pub mod flush;
pub mod session;
pub mod types;

pub use engagement::{engagement_score, EngagementScore, Likelihood};
pub use flush::{FlushDebounce, FlushState};
pub use session::VisitorSession;
pub use types::{DeviceClass, ExitIntent, SessionContext, VisitorSnapshot};
