//! Condensed per-record views for reading reports on a terminal.

use nsone_core::ActivityRecord;
use serde::Serialize;
use serde_json::Value;
use tabled::{settings::Style, Table, Tabled};

use crate::error::Result;

const TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// The interesting parts of an activity record.
///
/// Record changes list their answers; for other resources the raw resource
/// is kept instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    /// UTC time of the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// DNS record type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
}

impl From<&ActivityRecord> for ActivitySummary {
    fn from(record: &ActivityRecord) -> Self {
        let answers = record.answers();
        let resource = if answers.is_empty() {
            record.resource().cloned()
        } else {
            None
        };

        Self {
            user_name: record.user_name(),
            user_id: record.user_id(),
            zone: record.zone().map(String::from),
            time: record.time().map(|t| t.format(TIME_FORMAT).to_string()),
            action: record.action(),
            record_type: record.record_type().map(String::from),
            domain: record.domain().map(String::from),
            answers,
            resource,
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Resource")]
    resource_type: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Answers")]
    answers: String,
}

impl From<&ActivityRecord> for SummaryRow {
    fn from(record: &ActivityRecord) -> Self {
        let summary = ActivitySummary::from(record);
        Self {
            time: summary.time.unwrap_or_default(),
            user: summary
                .user_name
                .or(summary.user_id)
                .unwrap_or_default(),
            action: summary.action.unwrap_or_default(),
            resource_type: record.resource_type().unwrap_or_default(),
            zone: summary.zone.unwrap_or_default(),
            domain: summary.domain.unwrap_or_default(),
            record_type: summary.record_type.unwrap_or_default(),
            answers: summary.answers.join(", "),
        }
    }
}

/// One YAML document per record, each introduced by `---`.
pub fn render_yaml(records: &[ActivityRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str("---\n");
        out.push_str(&serde_yaml::to_string(&ActivitySummary::from(record))?);
        out.push('\n');
    }
    Ok(out)
}

/// Table with one row per record.
pub fn render_table(records: &[ActivityRecord]) -> Result<String> {
    if records.is_empty() {
        return Ok("No activity in this time window.".to_string());
    }

    let rows: Vec<SummaryRow> = records.iter().map(SummaryRow::from).collect();
    Ok(Table::new(&rows).with(Style::rounded()).to_string())
}
