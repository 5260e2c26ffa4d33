use std::fmt;

use serde::Serialize;

use super::RawCustomField;

/// A custom field value: an enum option name, a number, or free text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Enum(String),
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Enum(s) | FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            FieldValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Custom fields the dashboard reads, matched by exact name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownField {
    Priority,
    Status,
    Effort,
    Category,
    Department,
    WorkType,
    RequestDetail,
    VirtualAssistant,
}

impl KnownField {
    pub const ALL: [KnownField; 8] = [
        KnownField::Priority,
        KnownField::Status,
        KnownField::Effort,
        KnownField::Category,
        KnownField::Department,
        KnownField::WorkType,
        KnownField::RequestDetail,
        KnownField::VirtualAssistant,
    ];

    /// The field's name in Asana.
    pub fn name(self) -> &'static str {
        match self {
            KnownField::Priority => "Priority",
            KnownField::Status => "Status",
            KnownField::Effort => "Effort",
            KnownField::Category => "Category",
            KnownField::Department => "Department",
            KnownField::WorkType => "Work Type",
            KnownField::RequestDetail => "TIE Request Detail",
            KnownField::VirtualAssistant => "Virtual Assistant",
        }
    }

    /// Case-sensitive lookup by Asana field name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Typed record of the known custom fields on one ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_detail: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_assistant: Option<FieldValue>,
}

impl CustomFields {
    /// Build the record in one pass over a task's custom fields. Unknown
    /// names and entries without a value are ignored; the first valued entry
    /// for a given name wins.
    pub fn from_raw(raw: &[RawCustomField]) -> Self {
        let mut fields = Self::default();
        for entry in raw {
            let Some(known) = entry.name.as_deref().and_then(KnownField::from_name) else {
                continue;
            };
            let slot = fields.slot_mut(known);
            if slot.is_none() {
                *slot = entry.value();
            }
        }
        fields
    }

    pub fn get(&self, field: KnownField) -> Option<&FieldValue> {
        match field {
            KnownField::Priority => self.priority.as_ref(),
            KnownField::Status => self.status.as_ref(),
            KnownField::Effort => self.effort.as_ref(),
            KnownField::Category => self.category.as_ref(),
            KnownField::Department => self.department.as_ref(),
            KnownField::WorkType => self.work_type.as_ref(),
            KnownField::RequestDetail => self.request_detail.as_ref(),
            KnownField::VirtualAssistant => self.virtual_assistant.as_ref(),
        }
    }

    /// Display text of a field, if set.
    pub fn text(&self, field: KnownField) -> Option<String> {
        self.get(field).map(|v| v.to_string())
    }

    fn slot_mut(&mut self, field: KnownField) -> &mut Option<FieldValue> {
        match field {
            KnownField::Priority => &mut self.priority,
            KnownField::Status => &mut self.status,
            KnownField::Effort => &mut self.effort,
            KnownField::Category => &mut self.category,
            KnownField::Department => &mut self.department,
            KnownField::WorkType => &mut self.work_type,
            KnownField::RequestDetail => &mut self.request_detail,
            KnownField::VirtualAssistant => &mut self.virtual_assistant,
        }
    }
}
