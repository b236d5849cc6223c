//! Lead scoring and priority banding
//!
//! Two deliberately separate formulas. `compute_lead_score` is the fine 0-100
//! value used for display and sorting; `compute_priority` is a coarser ordinal
//! band for triage. Both are total functions: unknown bucket strings degrade
//! to the lowest-scoring band instead of erroring.

use crate::triage::types::{LeadPriority, LeadRecord};

/// Fields counted toward profile completeness
const COMPLETENESS_FIELD_COUNT: u32 = 5;

/// Compute the 0-100 lead score.
///
/// Components, each capped independently: monthly budget (max 40), timeframe
/// (max 20), business type (max 15, unrecognized categories default to 5),
/// service count (3 points each, max 15), profile completeness (max 10).
pub fn compute_lead_score(lead: &LeadRecord) -> u8 {
    let mut score: u32 = 0;

    score += budget_weight(&lead.monthly_budget);
    score += timeframe_weight(&lead.timeframe);
    score += business_type_weight(&lead.business_type);
    score += (lead.interested_services.len() as u32 * 3).min(15);
    score += completeness_weight(lead);

    score.min(100) as u8
}

/// Compute the coarse priority band.
///
/// Independent of `compute_lead_score`: budget contributes 0-4, timeframe
/// 0-3, service count up to 3. Bands: >=8 urgent, >=6 high, >=3 medium.
pub fn compute_priority(lead: &LeadRecord) -> LeadPriority {
    let mut score: u32 = 0;

    score += match lead.monthly_budget.as_str() {
        "above-500k" => 4,
        "250k-500k" => 3,
        "100k-250k" => 2,
        "50k-100k" => 1,
        _ => 0,
    };

    score += match lead.timeframe.as_str() {
        "immediately" => 3,
        "1-week" => 2,
        "1-month" => 1,
        _ => 0,
    };

    score += (lead.interested_services.len() as u32).min(3);

    if score >= 8 {
        LeadPriority::Urgent
    } else if score >= 6 {
        LeadPriority::High
    } else if score >= 3 {
        LeadPriority::Medium
    } else {
        LeadPriority::Low
    }
}

/// Recompute the derived fields in place. Scores are otherwise frozen at
/// capture time; this is the explicit opt-in for when a lead's answers change.
pub fn rescore(lead: &mut LeadRecord) {
    lead.lead_score = compute_lead_score(lead);
    lead.priority = compute_priority(lead);
}

fn budget_weight(bucket: &str) -> u32 {
    match bucket {
        "above-500k" => 40,
        "250k-500k" => 35,
        "100k-250k" => 30,
        "50k-100k" => 25,
        "25k-50k" => 15,
        "under-25k" => 10,
        _ => 0,
    }
}

fn timeframe_weight(bucket: &str) -> u32 {
    match bucket {
        "immediately" => 20,
        "1-week" => 15,
        "1-month" => 10,
        "3-months" => 5,
        "planning" => 2,
        _ => 0,
    }
}

fn business_type_weight(category: &str) -> u32 {
    match category {
        "large-enterprise" => 15,
        "saas" => 13,
        "medium-enterprise" => 12,
        "agency" => 12,
        "startup" => 10,
        "ecommerce" => 10,
        "small-business" => 8,
        _ => 5,
    }
}

fn completeness_weight(lead: &LeadRecord) -> u32 {
    let filled = [
        &lead.company,
        &lead.designation,
        &lead.city,
        &lead.current_challenges,
        &lead.referral_source,
    ]
    .iter()
    .filter(|f| !f.trim().is_empty())
    .count() as u32;

    // 10 * filled / 5, exact since the weight is a multiple of the count
    filled * 10 / COMPLETENESS_FIELD_COUNT
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::triage::types::{CaptureTrigger, LeadStatus, OfferType};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    pub(crate) fn make_lead() -> LeadRecord {
        LeadRecord {
            id: None,
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+91 98765 43210".to_string(),
            company: String::new(),
            designation: String::new(),
            city: String::new(),
            state: String::new(),
            business_type: String::new(),
            monthly_budget: String::new(),
            interested_services: Vec::new(),
            current_challenges: String::new(),
            timeframe: String::new(),
            referral_source: String::new(),
            trigger: CaptureTrigger::Manual,
            offer_type: OfferType::FreeConsultation,
            session_id: "sess".to_string(),
            page_source: "/".to_string(),
            captured_at: Utc::now(),
            status: LeadStatus::New,
            priority: LeadPriority::Low,
            notes: Vec::new(),
            last_contact: None,
            lead_score: 0,
        }
    }

    #[test]
    fn top_tier_lead_scores_92_and_urgent() {
        let mut lead = make_lead();
        lead.monthly_budget = "above-500k".to_string();
        lead.timeframe = "immediately".to_string();
        lead.business_type = "saas".to_string();
        lead.interested_services = vec![
            "SEO Services".to_string(),
            "Content Marketing".to_string(),
            "PPC Advertising".to_string(),
        ];
        lead.company = "Acme".to_string();
        lead.designation = "CEO".to_string();
        lead.city = "Pune".to_string();
        lead.current_challenges = "Low organic reach".to_string();
        lead.referral_source = "google".to_string();

        // 40 + 20 + 13 + 9 + 10
        assert_eq!(compute_lead_score(&lead), 92);
        // 4 + 3 + 3 = 10 >= 8
        assert_eq!(compute_priority(&lead), LeadPriority::Urgent);
    }

    #[test]
    fn empty_lead_scores_five_and_low() {
        let lead = make_lead();
        // Only the business-type default of 5 applies
        assert_eq!(compute_lead_score(&lead), 5);
        assert_eq!(compute_priority(&lead), LeadPriority::Low);
    }

    #[test]
    fn unknown_buckets_degrade_instead_of_erroring() {
        let mut lead = make_lead();
        lead.monthly_budget = "a-trillion".to_string();
        lead.timeframe = "someday".to_string();
        lead.business_type = "conglomerate".to_string();
        assert_eq!(compute_lead_score(&lead), 5);
        assert_eq!(compute_priority(&lead), LeadPriority::Low);
    }

    #[test]
    fn score_and_priority_are_independent() {
        let mut a = make_lead();
        a.monthly_budget = "100k-250k".to_string();
        a.timeframe = "1-week".to_string();
        a.business_type = "startup".to_string();
        a.interested_services = vec!["SEO Services".to_string(), "Email Marketing".to_string()];

        let mut b = a.clone();
        b.company = "Acme Corp".to_string();
        b.city = "Mumbai".to_string();
        b.current_challenges = "Churn".to_string();

        // Same budget/timeframe/type/service-count: same priority band
        assert_eq!(compute_priority(&a), compute_priority(&b));
        // Completeness differs: different lead score
        assert!(compute_lead_score(&b) > compute_lead_score(&a));
    }

    #[test]
    fn service_count_caps_at_15_points() {
        let mut lead = make_lead();
        lead.interested_services = (0..10).map(|i| format!("Service {i}")).collect();
        // 5 (business default) + 15 (capped services)
        assert_eq!(compute_lead_score(&lead), 20);
    }

    #[test]
    fn completeness_ignores_whitespace_only_fields() {
        let mut lead = make_lead();
        lead.company = "   ".to_string();
        lead.designation = "CTO".to_string();
        // 5 + 10 * 1/5
        assert_eq!(compute_lead_score(&lead), 7);
    }

    #[test]
    fn priority_band_edges() {
        let mut lead = make_lead();
        // budget 1 + timeframe 1 + 1 service = 3 -> medium
        lead.monthly_budget = "50k-100k".to_string();
        lead.timeframe = "1-month".to_string();
        lead.interested_services = vec!["SEO Services".to_string()];
        assert_eq!(compute_priority(&lead), LeadPriority::Medium);

        // budget 3 + timeframe 2 + 1 service = 6 -> high
        lead.monthly_budget = "250k-500k".to_string();
        lead.timeframe = "1-week".to_string();
        assert_eq!(compute_priority(&lead), LeadPriority::High);

        // budget 4 + timeframe 2 + 2 services = 8 -> urgent
        lead.monthly_budget = "above-500k".to_string();
        lead.interested_services.push("Email Marketing".to_string());
        assert_eq!(compute_priority(&lead), LeadPriority::Urgent);
    }

    #[test]
    fn rescore_updates_both_derived_fields() {
        let mut lead = make_lead();
        lead.monthly_budget = "above-500k".to_string();
        lead.timeframe = "immediately".to_string();
        lead.interested_services = vec!["SEO Services".to_string()];

        rescore(&mut lead);
        assert_eq!(lead.lead_score, 68);
        assert_eq!(lead.priority, LeadPriority::Urgent);
    }
}
