//! Engagement scoring
//!
//! Derives a 0-100 engagement score from a visitor snapshot. Each factor is
//! capped independently before summing; the result is a pure function of the
//! snapshot, with no clock or storage access.

use crate::tracker::types::{DeviceClass, VisitorSnapshot};
use serde::{Deserialize, Serialize};

/// Likelihood band derived from the engagement score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Likelihood {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Likelihood {
    fn from_score(score: u8) -> Self {
        if score >= 80 {
            Likelihood::VeryHigh
        } else if score >= 60 {
            Likelihood::High
        } else if score >= 40 {
            Likelihood::Medium
        } else {
            Likelihood::Low
        }
    }
}

/// Engagement score with the factors that contributed to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementScore {
    /// 0-100
    pub score: u8,
    /// Human-readable factors, in evaluation order
    pub contributing_factors: Vec<String>,
    pub likelihood: Likelihood,
}

/// Compute the engagement score for a snapshot.
///
/// Weights: time on page (max 30), scroll depth (max 20), clicks (max 15),
/// distinct pages (max 15), device class (max 10), referrer domain (max 10),
/// returning visitor (+10). The total is clamped to 100.
pub fn engagement_score(snapshot: &VisitorSnapshot) -> EngagementScore {
    let mut score: u32 = 0;
    let mut factors: Vec<String> = Vec::new();

    // Time on page (max 30 points)
    if snapshot.time_on_page_seconds > 300 {
        score += 30;
        factors.push("High engagement time".to_string());
    } else if snapshot.time_on_page_seconds > 120 {
        score += 20;
        factors.push("Moderate engagement time".to_string());
    } else if snapshot.time_on_page_seconds > 30 {
        score += 10;
        factors.push("Some engagement time".to_string());
    }

    // Scroll depth (max 20 points)
    if snapshot.scroll_depth_percent > 80 {
        score += 20;
        factors.push("High content engagement".to_string());
    } else if snapshot.scroll_depth_percent > 50 {
        score += 15;
        factors.push("Moderate content engagement".to_string());
    } else if snapshot.scroll_depth_percent > 25 {
        score += 10;
        factors.push("Some content engagement".to_string());
    }

    // Click interactions (max 15 points)
    if snapshot.click_count > 10 {
        score += 15;
        factors.push("High interaction level".to_string());
    } else if snapshot.click_count > 5 {
        score += 10;
        factors.push("Moderate interaction level".to_string());
    } else if snapshot.click_count > 2 {
        score += 5;
        factors.push("Some interaction".to_string());
    }

    // Pages visited (max 15 points)
    let pages = snapshot.pages_visited.len();
    if pages > 5 {
        score += 15;
        factors.push("Explored multiple pages".to_string());
    } else if pages > 3 {
        score += 10;
        factors.push("Visited several pages".to_string());
    } else if pages > 1 {
        score += 5;
        factors.push("Visited multiple pages".to_string());
    }

    // Device class (max 10 points)
    match snapshot.device_class {
        DeviceClass::Desktop => {
            score += 10;
            factors.push("Desktop user (business context)".to_string());
        }
        DeviceClass::Tablet => {
            score += 5;
            factors.push("Tablet user".to_string());
        }
        DeviceClass::Mobile => {}
    }

    // Referrer domain (max 10 points, first match wins)
    if snapshot.referrer.contains("linkedin.com") {
        score += 10;
        factors.push("LinkedIn referral (professional)".to_string());
    } else if snapshot.referrer.contains("google.com") {
        score += 8;
        factors.push("Google search (intent-driven)".to_string());
    } else if snapshot.referrer.contains("facebook.com") {
        score += 5;
        factors.push("Facebook referral".to_string());
    }

    // Returning visitor bonus
    if snapshot.is_returning_visitor {
        score += 10;
        factors.push("Returning visitor".to_string());
    }

    let score = score.min(100) as u8;

    EngagementScore {
        score,
        contributing_factors: factors,
        likelihood: Likelihood::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn make_snapshot() -> VisitorSnapshot {
        VisitorSnapshot {
            session_id: "sess".to_string(),
            visitor_id: "vis".to_string(),
            started_at: Utc::now(),
            time_on_page_seconds: 0,
            scroll_depth_percent: 0,
            click_count: 0,
            pages_visited: vec!["/".to_string()],
            current_page: "/".to_string(),
            device_class: DeviceClass::Mobile,
            referrer: String::new(),
            browser: "Chrome".to_string(),
            os: "Android".to_string(),
            user_agent: "test".to_string(),
            screen_resolution: "390x844".to_string(),
            exit_intent_fired: false,
            is_returning_visitor: false,
        }
    }

    #[test]
    fn cold_visitor_scores_zero() {
        let result = engagement_score(&make_snapshot());
        assert_eq!(result.score, 0);
        assert!(result.contributing_factors.is_empty());
        assert_eq!(result.likelihood, Likelihood::Low);
    }

    #[test]
    fn fully_engaged_visitor_clamps_at_100() {
        let mut snapshot = make_snapshot();
        snapshot.time_on_page_seconds = 600;
        snapshot.scroll_depth_percent = 95;
        snapshot.click_count = 20;
        snapshot.pages_visited = (0..7).map(|i| format!("/page-{i}")).collect();
        snapshot.device_class = DeviceClass::Desktop;
        snapshot.referrer = "https://www.linkedin.com/feed".to_string();
        snapshot.is_returning_visitor = true;

        // Raw factor sum is 30+20+15+15+10+10+10 = 110
        let result = engagement_score(&snapshot);
        assert_eq!(result.score, 100);
        assert_eq!(result.likelihood, Likelihood::VeryHigh);
        assert_eq!(result.contributing_factors.len(), 7);
    }

    #[test]
    fn is_pure_given_a_snapshot() {
        let mut snapshot = make_snapshot();
        snapshot.time_on_page_seconds = 150;
        snapshot.scroll_depth_percent = 60;

        let a = engagement_score(&snapshot);
        let b = engagement_score(&snapshot);
        assert_eq!(a.score, b.score);
        assert_eq!(a.contributing_factors, b.contributing_factors);
        assert_eq!(a.likelihood, b.likelihood);
    }

    #[test]
    fn referrer_priority_first_match_wins() {
        let mut snapshot = make_snapshot();
        // A LinkedIn redirect that mentions google.com in the query string
        snapshot.referrer = "https://www.linkedin.com/redir?u=google.com".to_string();
        let result = engagement_score(&snapshot);
        assert_eq!(result.score, 10);
        assert_eq!(
            result.contributing_factors,
            vec!["LinkedIn referral (professional)".to_string()]
        );
    }

    #[test]
    fn likelihood_band_edges() {
        assert_eq!(Likelihood::from_score(39), Likelihood::Low);
        assert_eq!(Likelihood::from_score(40), Likelihood::Medium);
        assert_eq!(Likelihood::from_score(60), Likelihood::High);
        assert_eq!(Likelihood::from_score(79), Likelihood::High);
        assert_eq!(Likelihood::from_score(80), Likelihood::VeryHigh);
    }

    #[test]
    fn moderate_session_bands_medium() {
        let mut snapshot = make_snapshot();
        snapshot.time_on_page_seconds = 180; // 20
        snapshot.scroll_depth_percent = 55; // 15
        snapshot.click_count = 4; // 5
        snapshot.pages_visited = vec!["/".into(), "/services".into()]; // 5
        let result = engagement_score(&snapshot);
        assert_eq!(result.score, 45);
        assert_eq!(result.likelihood, Likelihood::Medium);
    }

    #[test]
    fn serializes_likelihood_kebab_case() {
        let json = serde_json::to_string(&Likelihood::VeryHigh).unwrap();
        assert_eq!(json, "\"very-high\"");
    }
}
