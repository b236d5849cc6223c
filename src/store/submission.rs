//! Form submission boundary
//!
//! One tagged type per collection, each validated before it may cross into
//! the store. Validation is parse-or-reject: a submission either satisfies
//! its required fields or the write never happens. Persisted documents that
//! later fail to parse are skipped at read time, never patched up silently.

use crate::error::EngineError;
use crate::store::document::{Collection, DocumentStore};
use crate::triage::LeadRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A form payload that knows its destination collection and how to check
/// itself before persistence.
pub trait Submission: Serialize {
    fn collection(&self) -> Collection;
    fn validate(&self) -> Result<(), EngineError>;
}

/// Validate and persist a submission, returning the store-assigned id
pub fn submit<S: Submission>(
    store: &mut dyn DocumentStore,
    submission: &S,
    now: DateTime<Utc>,
) -> Result<String, EngineError> {
    submission.validate()?;
    let body = serde_json::to_value(submission)?;
    store.add(submission.collection(), body, now)
}

/// Validate a captured lead at the storage boundary. Contact fields are the
/// only hard requirement; classification buckets may be anything.
pub fn validate_lead(lead: &LeadRecord) -> Result<(), EngineError> {
    require("name", &lead.name)?;
    require_email(&lead.email)?;
    require("phone", &lead.phone)?;
    Ok(())
}

impl Submission for LeadRecord {
    fn collection(&self) -> Collection {
        Collection::Leads
    }

    fn validate(&self) -> Result<(), EngineError> {
        validate_lead(self)
    }
}

/// General enquiry from the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    pub message: String,
}

impl Submission for ContactSubmission {
    fn collection(&self) -> Collection {
        Collection::Contacts
    }

    fn validate(&self) -> Result<(), EngineError> {
        require("name", &self.name)?;
        require_email(&self.email)?;
        require("message", &self.message)?;
        Ok(())
    }
}

/// Newsletter signup, tied to the page it was made from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewsletterSubmission {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub page: String,
}

impl Submission for NewsletterSubmission {
    fn collection(&self) -> Collection {
        Collection::Newsletter
    }

    fn validate(&self) -> Result<(), EngineError> {
        require_email(&self.email)
    }
}

/// Enquiry for offline campaign services
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TraditionalMarketingSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_locations: Option<String>,
    pub campaign_details: String,
}

impl Submission for TraditionalMarketingSubmission {
    fn collection(&self) -> Collection {
        Collection::TraditionalMarketing
    }

    fn validate(&self) -> Result<(), EngineError> {
        require("name", &self.name)?;
        require_email(&self.email)?;
        require("phone", &self.phone)?;
        require("campaign_details", &self.campaign_details)?;
        Ok(())
    }
}

/// Social media links attached to an influencer application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SocialMediaLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Influencer network application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InfluencerSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub primary_platform: String,
    pub follower_count: String,
    #[serde(default)]
    pub social_media_links: SocialMediaLinks,
    pub niche: String,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
    pub experience: String,
    pub availability: String,
    pub bio: String,
}

impl Submission for InfluencerSubmission {
    fn collection(&self) -> Collection {
        Collection::Influencers
    }

    fn validate(&self) -> Result<(), EngineError> {
        require("name", &self.name)?;
        require_email(&self.email)?;
        require("phone", &self.phone)?;
        require("primary_platform", &self.primary_platform)?;
        require("follower_count", &self.follower_count)?;
        Ok(())
    }
}

/// Freelancer network application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FreelancerSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub primary_skill: String,
    pub experience: String,
    #[serde(default)]
    pub additional_skills: Vec<String>,
    pub portfolio: String,
    pub hourly_rate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_samples: Option<String>,
    pub availability: String,
    pub start_date: String,
    pub about: String,
}

impl Submission for FreelancerSubmission {
    fn collection(&self) -> Collection {
        Collection::Freelancers
    }

    fn validate(&self) -> Result<(), EngineError> {
        require("name", &self.name)?;
        require_email(&self.email)?;
        require("phone", &self.phone)?;
        require("primary_skill", &self.primary_skill)?;
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), EngineError> {
    require("email", value)?;
    let Some((local, domain)) = value.split_once('@') else {
        return Err(EngineError::Validation(format!(
            "{value:?} is not an email address"
        )));
    };
    if local.is_empty() || !domain.contains('.') {
        return Err(EngineError::Validation(format!(
            "{value:?} is not an email address"
        )));
    }
    Ok(())
}
