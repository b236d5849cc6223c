//! CSV export
//!
//! Two exporters. The generic one takes whatever a collection holds and
//! derives its columns from the first record; the lead exporter writes the
//! dashboard's fixed column layout. Both quote every cell so commas and
//! newlines in freeform answers cannot shear a row.

use crate::error::EngineError;
use crate::triage::LeadRecord;
use serde_json::Value;

/// Render arbitrary records as CSV.
///
/// The header comes from the first record's keys, in their stored order,
/// with the store-internal `id` and `timestamp` fields dropped. Later
/// records contribute only the columns the first record named; missing
/// values render as empty cells. An empty input is an error since there is
/// no header to derive.
pub fn records_to_csv(records: &[Value]) -> Result<String, EngineError> {
    let first = records
        .first()
        .ok_or_else(|| EngineError::Validation("nothing to export".to_string()))?;
    let Some(first) = first.as_object() else {
        return Err(EngineError::Validation(
            "export records must be objects".to_string(),
        ));
    };

    let columns: Vec<&String> = first
        .keys()
        .filter(|k| k.as_str() != "id" && k.as_str() != "timestamp")
        .collect();
    if columns.is_empty() {
        return Err(EngineError::Validation(
            "records have no exportable fields".to_string(),
        ));
    }

    let mut out = String::new();
    write_row(&mut out, columns.iter().map(|c| c.as_str().to_string()));

    for record in records {
        let Some(record) = record.as_object() else {
            return Err(EngineError::Validation(
                "export records must be objects".to_string(),
            ));
        };
        write_row(
            &mut out,
            columns
                .iter()
                .map(|c| record.get(c.as_str()).map(render_cell).unwrap_or_default()),
        );
    }
    Ok(out)
}

/// The dashboard's lead export: one fixed row layout per lead, dates as
/// `YYYY-MM-DD`, absent last contact shown as `Never`.
pub fn leads_to_csv(leads: &[LeadRecord]) -> String {
    const HEADERS: [&str; 18] = [
        "Name",
        "Email",
        "Phone",
        "Company",
        "Designation",
        "City",
        "State",
        "Business Type",
        "Monthly Budget",
        "Interested Services",
        "Challenges",
        "Timeframe",
        "Referral Source",
        "Status",
        "Priority",
        "Lead Score",
        "Submitted Date",
        "Last Contact",
    ];

    let mut out = String::new();
    write_row(&mut out, HEADERS.iter().map(|h| h.to_string()));

    for lead in leads {
        let row = [
            lead.name.clone(),
            lead.email.clone(),
            lead.phone.clone(),
            lead.company.clone(),
            lead.designation.clone(),
            lead.city.clone(),
            lead.state.clone(),
            lead.business_type.clone(),
            lead.monthly_budget.clone(),
            lead.interested_services.join("; "),
            lead.current_challenges.clone(),
            lead.timeframe.clone(),
            lead.referral_source.clone(),
            lead.status.as_str().to_string(),
            lead.priority.as_str().to_string(),
            lead.lead_score.to_string(),
            lead.captured_at.format("%Y-%m-%d").to_string(),
            lead.last_contact
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "Never".to_string()),
        ];
        write_row(&mut out, row.into_iter());
    }
    out
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_cell)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) => value.to_string(),
    }
}

fn write_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let mut first = true;
    for cell in cells {
        if !first {
            out.push(',');
        }
        first = false;
        out.push('"');
        out.push_str(&cell.replace('"', "\"\""));
        out.push('"');
    }
    out.push('\n');
}
