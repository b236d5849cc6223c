//! Lead workflow operations
//!
//! Status transitions are deliberately permissive: the follow-up workflow is
//! advisory, not a strict state machine. The permissive table is written out
//! explicitly so a stricter policy can replace it without touching call sites.

use crate::error::EngineError;
use crate::triage::types::{LeadNote, LeadRecord, LeadStatus};
use chrono::{DateTime, Utc};

/// Statuses reachable from `from`. Currently every status is reachable from
/// every status, including itself.
pub fn allowed_transitions(_from: LeadStatus) -> &'static [LeadStatus] {
    &LeadStatus::ALL
}

/// Move a lead to `new_status` and stamp the contact time.
///
/// Returns an error only if the transition table forbids the move; with the
/// permissive table this cannot happen, but callers should still propagate it.
pub fn apply_status_transition(
    lead: &mut LeadRecord,
    new_status: LeadStatus,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    if !allowed_transitions(lead.status).contains(&new_status) {
        return Err(EngineError::Validation(format!(
            "transition {} -> {} is not allowed",
            lead.status.as_str(),
            new_status.as_str()
        )));
    }
    lead.status = new_status;
    lead.last_contact = Some(now);
    Ok(())
}

/// Append a follow-up note. Whitespace-only text is rejected and the lead is
/// left untouched.
pub fn append_note(
    lead: &mut LeadRecord,
    text: &str,
    author: &str,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    if text.trim().is_empty() {
        return Err(EngineError::Validation("note text is empty".to_string()));
    }
    lead.notes.push(LeadNote {
        text: text.to_string(),
        author: author.to_string(),
        timestamp: now,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::scoring::tests::make_lead;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_status_is_reachable_from_every_status() {
        for from in LeadStatus::ALL {
            assert_eq!(allowed_transitions(from), LeadStatus::ALL.as_slice());
        }
    }

    #[test]
    fn transition_stamps_last_contact() {
        let mut lead = make_lead();
        assert!(lead.last_contact.is_none());

        let now = Utc::now();
        apply_status_transition(&mut lead, LeadStatus::Contacted, now).unwrap();
        assert_eq!(lead.status, LeadStatus::Contacted);
        assert_eq!(lead.last_contact, Some(now));

        // Backwards moves are fine
        apply_status_transition(&mut lead, LeadStatus::New, now).unwrap();
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[test]
    fn empty_note_is_rejected() {
        let mut lead = make_lead();
        let before = Utc::now();

        let err = append_note(&mut lead, "   ", "Admin", before);
        assert!(err.is_err());
        assert!(lead.notes.is_empty());

        append_note(&mut lead, "Follow up", "Admin", before).unwrap();
        assert_eq!(lead.notes.len(), 1);
        assert_eq!(lead.notes[0].text, "Follow up");
        assert_eq!(lead.notes[0].author, "Admin");
        assert!(lead.notes[0].timestamp >= before);
    }

    #[test]
    fn notes_are_append_only_and_ordered() {
        let mut lead = make_lead();
        let now = Utc::now();
        append_note(&mut lead, "first", "Admin", now).unwrap();
        append_note(&mut lead, "second", "Sales", now).unwrap();

        let texts: Vec<&str> = lead.notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }
}
