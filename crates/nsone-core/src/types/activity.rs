use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry from the NS1 account activity log.
///
/// The API does not promise a schema, so a record is kept as the JSON
/// object it arrived as. Accessors read the commonly present fields
/// leniently and return `None` when a field is missing or unusable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityRecord(Map<String, Value>);

impl ActivityRecord {
    /// Raw value of a top-level field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// All fields, keys in sorted order
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Activity entry ID
    #[must_use]
    pub fn id(&self) -> Option<String> {
        self.text("id")
    }

    /// Login of the user or key that made the change
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.text("user_id")
    }

    /// Display name of the user or key
    #[must_use]
    pub fn user_name(&self) -> Option<String> {
        self.text("user_name")
    }

    /// What happened (`create`, `update`, `delete`, ...)
    #[must_use]
    pub fn action(&self) -> Option<String> {
        self.text("action")
    }

    /// Kind of object that changed (`record`, `zone`, `user`, ...)
    #[must_use]
    pub fn resource_type(&self) -> Option<String> {
        self.text("resource_type")
    }

    /// Snapshot of the changed object
    #[must_use]
    pub fn resource(&self) -> Option<&Value> {
        self.0.get("resource").filter(|v| !v.is_null())
    }

    /// Unix timestamp in whole seconds.
    ///
    /// Fractional timestamps are truncated; numeric strings are accepted.
    #[must_use]
    pub fn timestamp(&self) -> Option<i64> {
        match self.0.get("timestamp")? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(truncate_seconds)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(truncate_seconds))
            }
            _ => None,
        }
    }

    /// Time of the change, if the timestamp is present and valid
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.timestamp()
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
    }

    /// Zone the changed resource belongs to
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.resource_str("zone")
    }

    /// Domain of the changed record
    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.resource_str("domain")
    }

    /// DNS record type of the changed record
    #[must_use]
    pub fn record_type(&self) -> Option<&str> {
        self.resource_str("type")
    }

    /// All answer values of a record resource, flattened into one list.
    ///
    /// Returns an empty list when the resource carries no answers.
    #[must_use]
    pub fn answers(&self) -> Vec<String> {
        let Some(answers) = self
            .resource()
            .and_then(|r| r.get("answers"))
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };

        answers
            .iter()
            .filter_map(|a| a.get("answer").and_then(Value::as_array))
            .flatten()
            .filter_map(scalar_text)
            .collect()
    }

    fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(scalar_text)
    }

    fn resource_str(&self, key: &str) -> Option<&str> {
        self.resource()
            .and_then(|r| r.get(key))
            .and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for ActivityRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl From<ActivityRecord> for Map<String, Value> {
    fn from(record: ActivityRecord) -> Self {
        record.0
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_seconds(secs: f64) -> i64 {
    secs.trunc() as i64
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
