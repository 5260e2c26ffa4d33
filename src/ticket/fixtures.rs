//! Test helpers for building raw tasks and tickets.

use chrono::NaiveDateTime;

use super::{normalize, NormalizedTicket, RawCustomField, RawEnumValue, RawTask, RawUser};
use crate::calendar::HolidayCalendar;
use crate::date_util::parse_timestamp;

pub fn dt(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap_or_else(|| panic!("bad test timestamp {s}"))
}

pub struct RawTaskBuilder {
    task: RawTask,
}

impl RawTaskBuilder {
    pub fn new(gid: &str) -> Self {
        Self {
            task: RawTask {
                gid: gid.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.task.name = Some(name.into());
        self
    }

    pub fn created(mut self, ts: &str) -> Self {
        self.task.created_at = Some(ts.into());
        self
    }

    pub fn modified(mut self, ts: &str) -> Self {
        self.task.modified_at = Some(ts.into());
        self
    }

    pub fn completed(mut self, ts: &str) -> Self {
        self.task.completed_at = Some(ts.into());
        self
    }

    pub fn assignee(mut self, name: &str) -> Self {
        self.task.assignee = Some(RawUser {
            gid: None,
            name: Some(name.into()),
        });
        self
    }

    pub fn enum_field(mut self, field: &str, value: &str) -> Self {
        self.task.custom_fields.push(RawCustomField {
            name: Some(field.into()),
            enum_value: Some(RawEnumValue {
                gid: None,
                name: Some(value.into()),
            }),
            ..Default::default()
        });
        self
    }

    pub fn text_field(mut self, field: &str, value: &str) -> Self {
        self.task.custom_fields.push(RawCustomField {
            name: Some(field.into()),
            text_value: Some(value.into()),
            ..Default::default()
        });
        self
    }

    pub fn build(self) -> RawTask {
        self.task
    }
}

/// Normalize against the bundled calendar.
pub fn tickets(tasks: Vec<RawTask>, now: NaiveDateTime) -> Vec<NormalizedTicket> {
    let calendar = HolidayCalendar::bundled().unwrap();
    normalize(&tasks, &calendar, now)
}
