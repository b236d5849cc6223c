//! Dashboard filtering and ordering

use crate::triage::types::{LeadPriority, LeadRecord, LeadStatus};
use serde::{Deserialize, Serialize};

/// A filter dimension that can be switched off.
///
/// `All` is an explicit value rather than an absent option so the dashboard's
/// "all" selector round-trips through serialization unambiguously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection<T> {
    All,
    #[serde(untagged)]
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

/// Composite lead filter; dimensions compose with logical AND
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadFilter {
    /// Substring match against name, email, company (case-insensitive) and
    /// phone (literal)
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub status: Selection<LeadStatus>,
    #[serde(default)]
    pub priority: Selection<LeadPriority>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &LeadRecord) -> bool {
        if !self.search_term.is_empty() {
            let needle = self.search_term.to_lowercase();
            let text_hit = lead.name.to_lowercase().contains(&needle)
                || lead.email.to_lowercase().contains(&needle)
                || lead.company.to_lowercase().contains(&needle);
            // Phone is digits and punctuation, compared literally
            let phone_hit = lead.phone.contains(&self.search_term);
            if !text_hit && !phone_hit {
                return false;
            }
        }
        self.status.admits(&lead.status) && self.priority.admits(&lead.priority)
    }
}

/// Leads passing the filter, in input order
pub fn filter_leads<'a>(leads: &'a [LeadRecord], filter: &LeadFilter) -> Vec<&'a LeadRecord> {
    leads.iter().filter(|lead| filter.matches(lead)).collect()
}

/// Order for display: lead score descending, ties broken by capture time
/// descending. The underlying sort is stable, so equal (score, time) pairs
/// keep their input order.
pub fn sort_leads(leads: &mut [LeadRecord]) {
    leads.sort_by(|a, b| {
        b.lead_score
            .cmp(&a.lead_score)
            .then(b.captured_at.cmp(&a.captured_at))
    });
}
