//! Time-bucketed trends over a trailing window ending at `now`.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::types::{AgeTrendPoint, NetNewTrendPoint, OpenTicketTrendPoint, ResponseTrendPoint};
use crate::date_util::{chart_label, round2, week_start};
use crate::ticket::NormalizedTicket;

/// Start of a `window_days` window ending at `now`.
pub fn window_start(now: NaiveDateTime, window_days: u32) -> NaiveDateTime {
    now - Duration::days(window_days as i64)
}

fn days_in_window(now: NaiveDateTime, window_days: u32) -> impl Iterator<Item = NaiveDate> {
    let first = window_start(now, window_days).date();
    let last = now.date();
    first.iter_days().take_while(move |d| *d <= last)
}

#[derive(Default)]
struct Mean {
    total: f64,
    count: u64,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.total += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Average age of open and closed tickets, grouped by creation day.
pub fn age_trend(
    tickets: &[NormalizedTicket],
    window_days: u32,
    now: NaiveDateTime,
) -> Vec<AgeTrendPoint> {
    let start = window_start(now, window_days);
    let mut days: BTreeMap<NaiveDate, (Mean, Mean)> = BTreeMap::new();
    for t in tickets.iter().filter(|t| t.created_at >= start) {
        let (open, closed) = days.entry(t.created_at.date()).or_default();
        if t.is_open {
            open.push(t.ticket_age);
        } else {
            closed.push(t.ticket_age);
        }
    }

    days.into_iter()
        .map(|(date, (open, closed))| AgeTrendPoint {
            date,
            label: chart_label(date),
            open_avg: round2(open.value()),
            closed_avg: round2(closed.value()),
        })
        .collect()
}

/// Weekly average of positive response times, weeks starting Monday.
pub fn response_trend(
    tickets: &[NormalizedTicket],
    window_days: u32,
    now: NaiveDateTime,
) -> Vec<ResponseTrendPoint> {
    let start = window_start(now, window_days);
    let mut weeks: BTreeMap<NaiveDate, Mean> = BTreeMap::new();
    for t in tickets.iter().filter(|t| t.created_at >= start) {
        if let Some(hours) = t.positive_response_hours() {
            weeks
                .entry(week_start(t.created_at.date()))
                .or_default()
                .push(hours);
        }
    }

    weeks
        .into_iter()
        .map(|(date, mean)| ResponseTrendPoint {
            date,
            label: chart_label(date),
            avg_response_hours: round2(mean.value()),
            count: mean.count,
        })
        .collect()
}

/// Number of tickets open on each day of the window.
///
/// Scans every ticket for every day, so cost grows with days × tickets.
pub fn open_ticket_trend(
    tickets: &[NormalizedTicket],
    window_days: u32,
    now: NaiveDateTime,
) -> Vec<OpenTicketTrendPoint> {
    days_in_window(now, window_days)
        .map(|day| {
            let open_count = tickets.iter().filter(|t| was_open_on(t, day)).count() as u64;
            OpenTicketTrendPoint {
                date: day,
                label: chart_label(day),
                open_count,
            }
        })
        .collect()
}

fn was_open_on(ticket: &NormalizedTicket, day: NaiveDate) -> bool {
    ticket.created_at.date() <= day
        && ticket
            .completed_at
            .map_or(true, |completed| completed.date() > day)
}

/// Tickets created and closed on each day of the window.
pub fn net_new_trend(
    tickets: &[NormalizedTicket],
    window_days: u32,
    now: NaiveDateTime,
) -> Vec<NetNewTrendPoint> {
    let mut created: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let mut closed: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for t in tickets {
        *created.entry(t.created_at.date()).or_default() += 1;
        if let Some(done) = t.completed_at {
            *closed.entry(done.date()).or_default() += 1;
        }
    }

    days_in_window(now, window_days)
        .map(|day| {
            let created = created.get(&day).copied().unwrap_or(0);
            let closed = closed.get(&day).copied().unwrap_or(0);
            NetNewTrendPoint {
                date: day,
                label: chart_label(day),
                created,
                closed,
                net_change: created as i64 - closed as i64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::fixtures::{dt, tickets, RawTaskBuilder};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_age_trend_groups_by_day() {
        let now = dt("2025-01-20T09:00:00");
        let t = tickets(
            vec![
                RawTaskBuilder::new("1")
                    .created("2025-01-10T09:00:00")
                    .build(),
                RawTaskBuilder::new("2")
                    .created("2025-01-10T15:00:00")
                    .completed("2025-01-12T15:00:00")
                    .build(),
                RawTaskBuilder::new("3")
                    .created("2025-01-10T09:00:00")
                    .completed("2025-01-11T09:00:00")
                    .build(),
                RawTaskBuilder::new("4")
                    .created("2025-01-15T09:00:00")
                    .build(),
                // Outside a 14 day window
                RawTaskBuilder::new("5")
                    .created("2025-01-01T09:00:00")
                    .build(),
            ],
            now,
        );

        let trend = age_trend(&t, 14, now);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, date("2025-01-10"));
        assert_eq!(trend[0].label, "Jan 10");
        assert_eq!(trend[0].open_avg, 10.0);
        assert_eq!(trend[0].closed_avg, 1.5);
        assert_eq!(trend[1].open_avg, 5.0);
        assert_eq!(trend[1].closed_avg, 0.0);
    }

    #[test]
    fn test_response_trend_weeks_start_monday() {
        let now = dt("2025-01-20T09:00:00");
        let t = tickets(
            vec![
                // Monday
                RawTaskBuilder::new("1")
                    .created("2025-01-06T09:00:00")
                    .modified("2025-01-06T11:00:00")
                    .build(),
                // Sunday of the same ISO week; answered Monday 12:00
                RawTaskBuilder::new("2")
                    .created("2025-01-12T10:00:00")
                    .modified("2025-01-13T12:00:00")
                    .build(),
                RawTaskBuilder::new("3")
                    .created("2025-01-14T09:00:00")
                    .modified("2025-01-14T10:00:00")
                    .build(),
                // Zero response hours are skipped
                RawTaskBuilder::new("4")
                    .created("2025-01-14T09:00:00")
                    .modified("2025-01-14T09:00:00")
                    .build(),
            ],
            now,
        );

        let trend = response_trend(&t, 30, now);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, date("2025-01-06"));
        assert_eq!(trend[0].count, 2);
        assert_eq!(trend[0].avg_response_hours, 3.0);
        assert_eq!(trend[1].date, date("2025-01-13"));
        assert_eq!(trend[1].count, 1);
        assert_eq!(trend[1].avg_response_hours, 1.0);
    }

    #[test]
    fn test_open_ticket_trend_counts_each_day() {
        let now = dt("2025-01-10T12:00:00");
        let t = tickets(
            vec![
                RawTaskBuilder::new("1")
                    .created("2025-01-01T09:00:00")
                    .build(),
                RawTaskBuilder::new("2")
                    .created("2025-01-08T09:00:00")
                    .completed("2025-01-09T09:00:00")
                    .build(),
                RawTaskBuilder::new("3")
                    .created("2025-01-10T11:00:00")
                    .build(),
            ],
            now,
        );

        let trend = open_ticket_trend(&t, 3, now);
        let counts: Vec<(NaiveDate, u64)> = trend.iter().map(|p| (p.date, p.open_count)).collect();
        assert_eq!(
            counts,
            vec![
                (date("2025-01-07"), 1),
                (date("2025-01-08"), 2),
                (date("2025-01-09"), 1),
                (date("2025-01-10"), 2),
            ]
        );
    }

    #[test]
    fn test_net_new_trend() {
        let now = dt("2025-01-10T12:00:00");
        let t = tickets(
            vec![
                RawTaskBuilder::new("1")
                    .created("2025-01-09T09:00:00")
                    .build(),
                RawTaskBuilder::new("2")
                    .created("2025-01-09T10:00:00")
                    .build(),
                RawTaskBuilder::new("3")
                    .created("2025-01-02T09:00:00")
                    .completed("2025-01-09T16:00:00")
                    .build(),
                RawTaskBuilder::new("4")
                    .created("2025-01-02T09:00:00")
                    .completed("2025-01-10T08:00:00")
                    .build(),
            ],
            now,
        );

        let trend = net_new_trend(&t, 1, now);
        assert_eq!(trend.len(), 2);
        assert_eq!((trend[0].created, trend[0].closed, trend[0].net_change), (2, 1, 1));
        assert_eq!((trend[1].created, trend[1].closed, trend[1].net_change), (0, 1, -1));
    }

    #[test]
    fn test_empty_input() {
        let now = dt("2025-01-10T12:00:00");
        assert!(age_trend(&[], 90, now).is_empty());
        assert!(response_trend(&[], 90, now).is_empty());
        let open = open_ticket_trend(&[], 90, now);
        assert_eq!(open.len(), 91);
        assert!(open.iter().all(|p| p.open_count == 0));
    }
}
