use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::types::{DailyResponsePoint, RecentResponse, ResponseComparison};
use crate::date_util::{chart_label, round2};
use crate::ticket::NormalizedTicket;

pub const RECENT_DAYS: i64 = 2;
pub const COMPARISON_DAYS: i64 = 90;
const RECENT_TICKET_LIMIT: usize = 10;

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (total, count) = values.fold((0.0, 0u64), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Compare response times of tickets created in the last two days with
/// those created in the 88 days before.
pub fn compare_response_times(
    tickets: &[NormalizedTicket],
    now: NaiveDateTime,
) -> ResponseComparison {
    let recent_start = now - Duration::days(RECENT_DAYS);
    let window_start = now - Duration::days(COMPARISON_DAYS);

    let recent: Vec<&NormalizedTicket> =
        tickets.iter().filter(|t| t.created_at >= recent_start).collect();
    let previous: Vec<&NormalizedTicket> = tickets
        .iter()
        .filter(|t| t.created_at >= window_start && t.created_at < recent_start)
        .collect();

    let recent_average = mean(recent.iter().filter_map(|t| t.response_time_hours));
    let previous_average = mean(previous.iter().filter_map(|t| t.response_time_hours));
    let improvement = if previous_average > 0.0 {
        (previous_average - recent_average) / previous_average * 100.0
    } else {
        0.0
    };

    let mut days: BTreeMap<NaiveDate, (f64, u64)> = BTreeMap::new();
    for t in tickets.iter().filter(|t| t.created_at >= window_start) {
        if let Some(hours) = t.response_time_hours {
            let (total, count) = days.entry(t.created_at.date()).or_default();
            *total += hours;
            *count += 1;
        }
    }
    let daily = days
        .into_iter()
        .map(|(date, (total, count))| DailyResponsePoint {
            date,
            label: chart_label(date),
            avg_response_hours: round2(total / count as f64),
            count,
        })
        .collect();

    let mut answered: Vec<&NormalizedTicket> = recent
        .iter()
        .copied()
        .filter(|t| t.positive_response_hours().is_some())
        .collect();
    answered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let recent_tickets = answered
        .into_iter()
        .take(RECENT_TICKET_LIMIT)
        .map(|t| RecentResponse {
            id: t.id.clone(),
            name: t.name.clone(),
            assignee: t.assignee.clone(),
            created_at: t.created_at,
            response_time_hours: t.response_time_hours.unwrap_or_default(),
        })
        .collect();

    ResponseComparison {
        recent_average: round2(recent_average),
        previous_average: round2(previous_average),
        improvement: round2(improvement),
        recent_count: recent.len() as u64,
        previous_count: previous.len() as u64,
        daily,
        recent_tickets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::fixtures::{dt, tickets, RawTaskBuilder};

    fn answered(id: &str, created: &str, modified: &str) -> crate::ticket::RawTask {
        RawTaskBuilder::new(id).created(created).modified(modified).build()
    }

    #[test]
    fn test_recent_vs_previous() {
        // Thursday noon
        let now = dt("2025-01-16T12:00:00");
        let t = tickets(
            vec![
                answered("r1", "2025-01-15T09:00:00", "2025-01-15T10:00:00"),
                answered("r2", "2025-01-16T09:00:00", "2025-01-16T12:00:00"),
                answered("p1", "2025-01-13T09:00:00", "2025-01-13T13:00:00"),
                // Zero-hour responses count toward the comparison averages
                answered("p2", "2025-01-10T09:00:00", "2025-01-10T09:00:00"),
                // Older than 90 days
                answered("old", "2024-09-01T09:00:00", "2024-09-02T09:00:00"),
            ],
            now,
        );

        let cmp = compare_response_times(&t, now);
        assert_eq!(cmp.recent_count, 2);
        assert_eq!(cmp.previous_count, 2);
        assert_eq!(cmp.recent_average, 2.0);
        assert_eq!(cmp.previous_average, 2.0);
        assert_eq!(cmp.improvement, 0.0);
        assert_eq!(cmp.daily.len(), 4);
        assert_eq!(cmp.daily[0].label, "Jan 10");

        let ids: Vec<&str> = cmp.recent_tickets.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r2", "r1"]);
    }

    #[test]
    fn test_improvement_percentage() {
        let now = dt("2025-01-16T12:00:00");
        let t = tickets(
            vec![
                answered("r", "2025-01-16T09:00:00", "2025-01-16T10:00:00"),
                answered("p", "2025-01-13T09:00:00", "2025-01-13T13:00:00"),
            ],
            now,
        );
        let cmp = compare_response_times(&t, now);
        assert_eq!(cmp.improvement, 75.0);
    }

    #[test]
    fn test_no_previous_tickets() {
        let now = dt("2025-01-16T12:00:00");
        let t = tickets(vec![answered("r", "2025-01-16T09:00:00", "2025-01-16T10:00:00")], now);
        let cmp = compare_response_times(&t, now);
        assert_eq!(cmp.previous_average, 0.0);
        assert_eq!(cmp.improvement, 0.0);
    }

    #[test]
    fn test_recent_tickets_capped_at_ten() {
        let now = dt("2025-01-16T12:00:00");
        let tasks = (0..12)
            .map(|i| {
                answered(
                    &i.to_string(),
                    &format!("2025-01-15T{:02}:00:00", 8 + i / 2),
                    "2025-01-15T16:30:00",
                )
            })
            .collect();
        let cmp = compare_response_times(&tickets(tasks, now), now);
        assert_eq!(cmp.recent_count, 12);
        assert_eq!(cmp.recent_tickets.len(), 10);
        assert!(cmp
            .recent_tickets
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }
}
