//! Lead capture triggers and the multi-step intake form
//!
//! The capture prompt fires at most once per session, whichever trigger wins:
//! thirty seconds on the page, scrolling past 70%, or the pointer leaving
//! through the top edge. The winning trigger is recorded on the lead so the
//! dashboard can tell which prompt actually converts.

use crate::error::EngineError;
use crate::store::local::{modal_shown, set_modal_shown, LocalStorage};
use crate::triage::{rescore, CaptureTrigger, LeadRecord, LeadStatus, OfferType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds on page before the time trigger fires
pub const TIME_TRIGGER_SECONDS: u32 = 30;
/// Scroll depth the visitor must exceed for the scroll trigger
pub const SCROLL_TRIGGER_PERCENT: u8 = 70;

/// The services a lead can express interest in, as shown on the intake form
pub const SERVICES: [&str; 15] = [
    "Digital Marketing Strategy",
    "SEO Services",
    "Social Media Marketing",
    "Content Marketing",
    "Social Media Automation",
    "Instagram Automation",
    "Facebook Automation",
    "LinkedIn Automation",
    "WhatsApp Automation",
    "Influencer Marketing",
    "Personal Branding",
    "Freelancer Network",
    "PPC Advertising",
    "Email Marketing",
    "Website Development",
];

/// Display copy for a capture offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OfferCopy {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub description: &'static str,
    pub value: &'static str,
}

/// The headline copy shown for each offer variant
pub fn offer_copy(offer: OfferType) -> OfferCopy {
    match offer {
        OfferType::FreeConsultation => OfferCopy {
            title: "Get FREE 30-Min Marketing Consultation",
            subtitle: "Discover how to 3X your business growth with our expert strategies",
            description: "Join 500+ businesses that transformed their digital presence",
            value: "Worth \u{20b9}5,000 - Absolutely FREE!",
        },
        OfferType::Audit => OfferCopy {
            title: "FREE Digital Marketing Audit",
            subtitle: "Get a comprehensive analysis of your online presence",
            description: "Identify gaps and opportunities to boost your ROI by 300%",
            value: "Worth \u{20b9}10,000 - Limited Time!",
        },
        OfferType::Guide => OfferCopy {
            title: "FREE Ultimate Marketing Guide",
            subtitle: "Download our exclusive guide used by top agencies",
            description: "50+ proven strategies to scale your business in 2025",
            value: "Exclusive Content - FREE Download!",
        },
        OfferType::Demo => OfferCopy {
            title: "FREE Automation Tools Demo",
            subtitle: "See how our tools save 80% time and increase engagement by 300%",
            description: "Live demonstration of Instagram, Facebook & LinkedIn automation",
            value: "Personal Demo - Book Now!",
        },
    }
}

/// Once-per-session gate over the capture triggers.
///
/// The shown flag is seeded from local storage so a reload within the same
/// session does not re-prompt; every fire writes the flag back.
#[derive(Debug)]
pub struct TriggerPolicy {
    shown: bool,
}

impl TriggerPolicy {
    pub fn new(storage: &dyn LocalStorage) -> Self {
        Self {
            shown: modal_shown(storage),
        }
    }

    pub fn has_fired(&self) -> bool {
        self.shown
    }

    /// Time trigger: fires once `seconds_on_page` reaches the threshold
    pub fn time_elapsed(
        &mut self,
        seconds_on_page: u32,
        storage: &mut dyn LocalStorage,
    ) -> Option<CaptureTrigger> {
        if seconds_on_page >= TIME_TRIGGER_SECONDS {
            self.fire(CaptureTrigger::TimeSpent, storage)
        } else {
            None
        }
    }

    /// Scroll trigger: fires strictly past the threshold, not at it
    pub fn scroll_reached(
        &mut self,
        percent: u8,
        storage: &mut dyn LocalStorage,
    ) -> Option<CaptureTrigger> {
        if percent > SCROLL_TRIGGER_PERCENT {
            self.fire(CaptureTrigger::Scroll, storage)
        } else {
            None
        }
    }

    /// Exit-intent trigger: the pointer crossed the top edge of the viewport
    pub fn exit_intent(
        &mut self,
        pointer_y: i32,
        storage: &mut dyn LocalStorage,
    ) -> Option<CaptureTrigger> {
        if pointer_y <= 0 {
            self.fire(CaptureTrigger::ExitIntent, storage)
        } else {
            None
        }
    }

    /// Manual open, e.g. a call-to-action button. Not gated: an explicit
    /// click always gets the form, but still consumes the session's prompt.
    pub fn manual(&mut self, storage: &mut dyn LocalStorage) -> CaptureTrigger {
        self.shown = true;
        set_modal_shown(storage);
        CaptureTrigger::Manual
    }

    fn fire(
        &mut self,
        trigger: CaptureTrigger,
        storage: &mut dyn LocalStorage,
    ) -> Option<CaptureTrigger> {
        if self.shown {
            return None;
        }
        self.shown = true;
        set_modal_shown(storage);
        Some(trigger)
    }
}

/// Intake form state across the four steps
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub designation: String,
    pub city: String,
    pub state: String,
    pub business_type: String,
    pub monthly_budget: String,
    pub interested_services: Vec<String>,
    pub current_challenges: String,
    pub timeframe: String,
    pub referral_source: String,
}

impl LeadDraft {
    /// Gate for advancing past a form step.
    ///
    /// Step 1 wants the contact fields, step 2 the business profile, step 3
    /// at least one service and a budget bucket. Step 4 collects optional
    /// context only, so it (and any later step) always passes.
    pub fn validate_step(&self, step: u8) -> Result<(), EngineError> {
        let mut missing: Vec<&str> = Vec::new();
        match step {
            1 => {
                push_blank(&mut missing, "name", &self.name);
                push_blank(&mut missing, "email", &self.email);
                push_blank(&mut missing, "phone", &self.phone);
            }
            2 => {
                push_blank(&mut missing, "company", &self.company);
                push_blank(&mut missing, "business type", &self.business_type);
                push_blank(&mut missing, "city", &self.city);
            }
            3 => {
                if self.interested_services.is_empty() {
                    return Err(EngineError::Validation(
                        "select at least one service".to_string(),
                    ));
                }
                push_blank(&mut missing, "monthly budget", &self.monthly_budget);
            }
            _ => {}
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EngineError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// Turn a completed draft into a scored lead ready for persistence.
    ///
    /// All gated steps are re-checked, so a draft that skipped the form flow
    /// cannot smuggle blank required fields through.
    pub fn finalize(
        self,
        trigger: CaptureTrigger,
        offer_type: OfferType,
        session_id: &str,
        page_source: &str,
        now: DateTime<Utc>,
    ) -> Result<LeadRecord, EngineError> {
        for step in 1..=3 {
            self.validate_step(step)?;
        }

        let mut lead = LeadRecord {
            id: None,
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            designation: self.designation,
            city: self.city,
            state: self.state,
            business_type: self.business_type,
            monthly_budget: self.monthly_budget,
            interested_services: self.interested_services,
            current_challenges: self.current_challenges,
            timeframe: self.timeframe,
            referral_source: self.referral_source,
            trigger,
            offer_type,
            session_id: session_id.to_string(),
            page_source: page_source.to_string(),
            captured_at: now,
            status: LeadStatus::New,
            priority: crate::triage::LeadPriority::Low,
            notes: Vec::new(),
            last_contact: None,
            lead_score: 0,
        };
        rescore(&mut lead);
        Ok(lead)
    }
}

fn push_blank<'a>(missing: &mut Vec<&'a str>, field: &'a str, value: &str) {
    if value.trim().is_empty() {
        missing.push(field);
    }
}
