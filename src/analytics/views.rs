//! Filters and groupings over open tickets.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use super::types::{DepartmentStats, StatusCount};
use crate::date_util::{months_before, round2};
use crate::ticket::NormalizedTicket;

pub const ALL_DEPARTMENTS: &str = "All Departments";
pub const AGED_DAYS: f64 = 14.0;
pub const CRITICAL_DAYS: f64 = 30.0;

const UNASSIGNED_STATUS: &str = "Unassigned";
const BLOCKED_STATUSES: [&str; 2] = ["Waiting For Customer", "Waiting on Customer"];

/// Distinct, non-blank department names in sorted order.
pub fn extract_departments(tickets: &[NormalizedTicket]) -> Vec<String> {
    tickets
        .iter()
        .filter_map(|t| t.department())
        .filter(|d| !d.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Open tickets in `department`, or every open ticket for
/// [`ALL_DEPARTMENTS`].
pub fn filter_by_department<'a>(
    tickets: &'a [NormalizedTicket],
    department: &str,
) -> Vec<&'a NormalizedTicket> {
    tickets
        .iter()
        .filter(|t| t.is_open)
        .filter(|t| department == ALL_DEPARTMENTS || t.department().as_deref() == Some(department))
        .collect()
}

pub fn department_stats(tickets: &[NormalizedTicket], department: &str) -> DepartmentStats {
    let open = filter_by_department(tickets, department);
    if open.is_empty() {
        return DepartmentStats::default();
    }
    let total_age: f64 = open.iter().map(|t| t.ticket_age).sum();
    DepartmentStats {
        total_open: open.len() as u64,
        aged: open.iter().filter(|t| t.ticket_age > AGED_DAYS).count() as u64,
        critical: open.iter().filter(|t| t.ticket_age > CRITICAL_DAYS).count() as u64,
        average_age: round2(total_age / open.len() as f64),
    }
}

/// Open tickets counted by Status, most common first.
pub fn status_distribution(tickets: &[NormalizedTicket]) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = Vec::new();
    for t in tickets.iter().filter(|t| t.is_open) {
        let status = t
            .status()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNASSIGNED_STATUS.to_string());
        match counts.iter_mut().find(|c| c.status == status) {
            Some(c) => c.count += 1,
            None => counts.push(StatusCount { status, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Open tickets waiting on the customer.
pub fn blockers(tickets: &[NormalizedTicket]) -> Vec<&NormalizedTicket> {
    tickets
        .iter()
        .filter(|t| t.is_open)
        .filter(|t| {
            t.status()
                .is_some_and(|s| BLOCKED_STATUSES.contains(&s.as_str()))
        })
        .collect()
}

/// Tickets created within the 12 calendar months before `now`.
pub fn last_twelve_months(
    tickets: &[NormalizedTicket],
    now: NaiveDateTime,
) -> Vec<NormalizedTicket> {
    let cutoff = months_before(now, 12);
    tickets
        .iter()
        .filter(|t| t.created_at >= cutoff)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::fixtures::{dt, tickets, RawTaskBuilder};

    fn open(id: &str, created: &str) -> RawTaskBuilder {
        RawTaskBuilder::new(id).created(created)
    }

    fn sample() -> Vec<NormalizedTicket> {
        tickets(
            vec![
                open("1", "2025-01-01T09:00:00")
                    .enum_field("Department", "Finance")
                    .enum_field("Status", "Waiting on Customer")
                    .build(),
                open("2", "2025-02-20T09:00:00")
                    .enum_field("Department", "Finance")
                    .enum_field("Status", "In Progress")
                    .build(),
                open("3", "2025-02-01T09:00:00")
                    .enum_field("Department", "Sales")
                    .enum_field("Status", "Waiting For Customer")
                    .build(),
                open("4", "2025-02-25T09:00:00").build(),
                open("5", "2024-12-01T09:00:00")
                    .enum_field("Department", "Finance")
                    .enum_field("Status", "Waiting on Customer")
                    .completed("2024-12-02T09:00:00")
                    .build(),
                open("6", "2025-02-25T09:00:00")
                    .text_field("Department", "  ")
                    .build(),
            ],
            dt("2025-03-01T09:00:00"),
        )
    }

    fn ids(tickets: &[&NormalizedTicket]) -> Vec<String> {
        tickets.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_extract_departments() {
        assert_eq!(extract_departments(&sample()), ["Finance", "Sales"]);
    }

    #[test]
    fn test_filter_by_department() {
        let t = sample();
        assert_eq!(ids(&filter_by_department(&t, "Finance")), ["1", "2"]);
        assert_eq!(
            ids(&filter_by_department(&t, ALL_DEPARTMENTS)),
            ["1", "2", "3", "4", "6"]
        );
        assert!(filter_by_department(&t, "finance").is_empty());
    }

    #[test]
    fn test_department_stats() {
        let t = sample();
        // Ages on Mar 1: 59, 9, 28, 4, 4
        let all = department_stats(&t, ALL_DEPARTMENTS);
        assert_eq!(all.total_open, 5);
        assert_eq!(all.aged, 2);
        assert_eq!(all.critical, 1);
        assert_eq!(all.average_age, 20.8);

        let finance = department_stats(&t, "Finance");
        assert_eq!(finance.total_open, 2);
        assert_eq!(finance.average_age, 34.0);

        assert_eq!(department_stats(&t, "Legal"), DepartmentStats::default());
    }

    #[test]
    fn test_status_distribution() {
        let dist = status_distribution(&sample());
        assert_eq!(dist[0], StatusCount { status: "Unassigned".into(), count: 2 });
        assert_eq!(dist.len(), 4);
        assert_eq!(dist.iter().map(|c| c.count).sum::<u64>(), 5);
    }

    #[test]
    fn test_blockers() {
        let t = sample();
        assert_eq!(ids(&blockers(&t)), ["1", "3"]);
    }

    #[test]
    fn test_last_twelve_months() {
        let now = dt("2025-03-01T09:00:00");
        let t = tickets(
            vec![
                open("in", "2024-03-01T09:00:00").build(),
                open("out", "2024-03-01T08:59:00").build(),
                open("new", "2025-02-01T09:00:00").build(),
            ],
            now,
        );
        let kept: Vec<String> = last_twelve_months(&t, now).into_iter().map(|t| t.id).collect();
        assert_eq!(kept, ["in", "new"]);
    }
}
