//! Dashboard summary metrics

use crate::triage::{LeadPriority, LeadRecord, LeadStatus};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Headline numbers shown above the lead table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_leads: usize,
    /// Leads captured within the last seven days of `now`
    pub recent_leads: usize,
    /// High plus urgent priority
    pub high_priority: usize,
    pub new_leads: usize,
    /// Percent of leads with status closed, 0 for an empty list
    pub conversion_rate: u32,
}

pub fn summarize(leads: &[LeadRecord], now: DateTime<Utc>) -> DashboardSummary {
    let week_ago = now - Duration::days(7);
    let total = leads.len();
    let closed = leads
        .iter()
        .filter(|l| l.status == LeadStatus::Closed)
        .count();

    DashboardSummary {
        total_leads: total,
        recent_leads: leads.iter().filter(|l| l.captured_at > week_ago).count(),
        high_priority: leads
            .iter()
            .filter(|l| l.priority >= LeadPriority::High)
            .count(),
        new_leads: leads.iter().filter(|l| l.status == LeadStatus::New).count(),
        conversion_rate: if total == 0 {
            0
        } else {
            (closed * 100 / total) as u32
        },
    }
}
