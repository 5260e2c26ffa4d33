use chrono::NaiveDateTime;

use super::{CustomFields, KnownField, NormalizedTicket, RawTask};
use crate::business_hours::BusinessHours;
use crate::calendar::HolidayCalendar;
use crate::date_util::{days_between, parse_timestamp};

const UNTITLED: &str = "Untitled Task";
const UNASSIGNED: &str = "Unassigned";

/// Turns raw Asana tasks into [`NormalizedTicket`]s.
///
/// `now` is the reference instant for the age of open tickets; pass the
/// same value to the aggregators so one run sees one clock.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    pub calendar: &'a HolidayCalendar,
    pub hours: BusinessHours,
    pub now: NaiveDateTime,
}

impl<'a> Normalizer<'a> {
    pub fn new(calendar: &'a HolidayCalendar, now: NaiveDateTime) -> Self {
        Self {
            calendar,
            hours: BusinessHours::default(),
            now,
        }
    }

    pub fn with_hours(mut self, hours: BusinessHours) -> Self {
        self.hours = hours;
        self
    }

    /// Normalize every task that has a usable creation timestamp.
    pub fn normalize(&self, tasks: &[RawTask]) -> Vec<NormalizedTicket> {
        let tickets: Vec<NormalizedTicket> =
            tasks.iter().filter_map(|t| self.normalize_task(t)).collect();
        let dropped = tasks.len() - tickets.len();
        if dropped > 0 {
            log::debug!("Dropped {dropped} tasks without a usable created_at");
        }
        tickets
    }

    /// `None` if the task has no parseable `created_at`.
    pub fn normalize_task(&self, task: &RawTask) -> Option<NormalizedTicket> {
        let created_at = task.created_at.as_deref().and_then(parse_timestamp)?;
        let modified = task.modified_at.as_deref().and_then(parse_timestamp);
        let completed_at = task.completed_at.as_deref().and_then(parse_timestamp);

        let response_time_hours = modified
            .filter(|m| *m >= created_at)
            .map(|m| self.hours.between(self.calendar, created_at, m));

        let reference = completed_at.unwrap_or(self.now);
        let ticket_age = days_between(created_at, reference).max(0.0);

        let custom_fields = CustomFields::from_raw(&task.custom_fields);
        let automation_stage = match custom_fields.get(KnownField::VirtualAssistant) {
            Some(super::FieldValue::Enum(stage)) => Some(stage.clone()),
            _ => None,
        };

        let name = task
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(UNTITLED)
            .to_string();
        let assignee = task
            .assignee
            .as_ref()
            .and_then(|a| a.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNASSIGNED)
            .to_string();

        Some(NormalizedTicket {
            id: task.gid.clone(),
            name,
            created_at,
            modified_at: modified.unwrap_or(created_at),
            completed_at,
            assignee,
            response_time_hours,
            ticket_age,
            is_open: completed_at.is_none(),
            automation_stage,
            custom_fields,
        })
    }
}

/// Normalize with the default 08:00–17:00 business day.
pub fn normalize(
    tasks: &[RawTask],
    calendar: &HolidayCalendar,
    now: NaiveDateTime,
) -> Vec<NormalizedTicket> {
    Normalizer::new(calendar, now).normalize(tasks)
}
