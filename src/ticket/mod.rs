pub mod fields;
pub mod normalize;
pub mod sort;

#[cfg(test)]
pub(crate) mod fixtures;

pub use fields::{CustomFields, FieldValue, KnownField};
pub use normalize::{normalize, Normalizer};
pub use sort::{sort_tickets, SortDirection, SortField, TicketSort};

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// An Asana task as returned by `/tasks?project=<gid>`.
///
/// Timestamps stay as strings so that a malformed value only affects the
/// metric that reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTask {
    pub gid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub assignee: Option<RawUser>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<RawCustomField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One custom field entry on a task. At most one of the value slots is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCustomField {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enum_value: Option<RawEnumValue>,
    #[serde(default)]
    pub number_value: Option<f64>,
    #[serde(default)]
    pub text_value: Option<String>,
    #[serde(default)]
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEnumValue {
    #[serde(default)]
    pub gid: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl RawCustomField {
    /// The typed value of this entry: enum option name, number, or text.
    pub fn value(&self) -> Option<FieldValue> {
        if let Some(name) = self.enum_value.as_ref().and_then(|e| e.name.as_ref()) {
            return Some(FieldValue::Enum(name.clone()));
        }
        if let Some(n) = self.number_value {
            return Some(FieldValue::Number(n));
        }
        self.text_value.clone().map(FieldValue::Text)
    }
}

/// A page of tasks in Asana's `{ "data": [...] }` envelope, which is also
/// the format of a JSON project export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPage {
    pub data: Vec<RawTask>,
}

/// Parse an Asana task export (`{ "data": [...] }`).
pub fn parse_task_export(json: &str) -> Result<Vec<RawTask>> {
    let page: TaskPage =
        serde_json::from_str(json).map_err(|e| Error::InvalidResponse(e.to_string()))?;
    Ok(page.data)
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A ticket after normalization. Built once per task by [`Normalizer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTicket {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
    pub assignee: String,
    /// Business hours from creation to first modification.
    pub response_time_hours: Option<f64>,
    /// Calendar days from creation to completion (closed) or now (open).
    pub ticket_age: f64,
    pub is_open: bool,
    /// Name of the "Virtual Assistant" option that handled the ticket.
    pub automation_stage: Option<String>,
    pub custom_fields: CustomFields,
}

impl NormalizedTicket {
    pub fn is_automated(&self) -> bool {
        self.automation_stage.is_some()
    }

    /// Response time if it is strictly positive.
    pub fn positive_response_hours(&self) -> Option<f64> {
        self.response_time_hours.filter(|h| *h > 0.0)
    }

    pub fn department(&self) -> Option<String> {
        self.custom_fields.text(KnownField::Department)
    }

    pub fn status(&self) -> Option<String> {
        self.custom_fields.text(KnownField::Status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_task_export() {
        let json = r#"{
            "data": [
                {
                    "gid": "1201",
                    "name": "Outlook won't send",
                    "created_at": "2025-01-06T09:00:00.000Z",
                    "modified_at": "2025-01-06T11:30:00.000Z",
                    "completed_at": null,
                    "assignee": {"gid": "9", "name": "Dana"},
                    "custom_fields": [
                        {"gid": "1", "name": "Priority", "enum_value": {"gid": "2", "name": "High"}},
                        {"gid": "3", "name": "Effort", "number_value": 3},
                        {"gid": "4", "name": "Department", "text_value": "Finance"}
                    ]
                },
                {"gid": "1202", "created_at": "2025-01-07T10:00:00Z", "custom_fields": null}
            ],
            "next_page": null
        }"#;

        let tasks = parse_task_export(json).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].assignee.as_ref().unwrap().name.as_deref(), Some("Dana"));
        assert_eq!(tasks[0].custom_fields.len(), 3);
        assert_eq!(
            tasks[0].custom_fields[0].value(),
            Some(FieldValue::Enum("High".into()))
        );
        assert_eq!(tasks[0].custom_fields[1].value(), Some(FieldValue::Number(3.0)));
        assert_eq!(
            tasks[0].custom_fields[2].value(),
            Some(FieldValue::Text("Finance".into()))
        );
        assert!(tasks[1].custom_fields.is_empty());
        assert!(tasks[1].name.is_none());
    }

    #[test]
    fn test_parse_task_export_requires_gid() {
        let err = parse_task_export(r#"{"data": [{"name": "no gid"}]}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_custom_field_without_value() {
        let cf = RawCustomField {
            name: Some("Status".into()),
            enum_value: Some(RawEnumValue { gid: Some("1".into()), name: None }),
            ..Default::default()
        };
        assert_eq!(cf.value(), None);
    }
}
