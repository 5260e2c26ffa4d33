use chrono::{Duration, NaiveDateTime};

use super::types::{AutomationAnalytics, AutomationStageStat, SavingsProjection, TicketRate};
use crate::date_util::{first_day_of_month, round2, start_of_day};
use crate::ticket::NormalizedTicket;

/// Trailing window used for ticket rates and projections.
pub const RATE_WINDOW_DAYS: u32 = 90;
pub const WORK_DAY_HOURS: f64 = 8.0;

/// Minutes of manual work each automation stage replaces.
const STAGE_MINUTES: [(&str, u32); 6] = [
    ("R1 - Triage +", 5),
    ("R2 - Classification +", 3),
    ("R3 - Description +", 8),
    ("R4 - Prioritization +", 4),
    ("R5 - Validation +", 6),
    ("R6 - Communication +", 10),
];

/// Minutes saved by one ticket handled by `stage`; 0 for unknown stages.
pub fn minutes_saved(stage: &str) -> u32 {
    STAGE_MINUTES
        .iter()
        .find(|(name, _)| *name == stage)
        .map_or(0, |(_, minutes)| *minutes)
}

fn ticket_minutes(ticket: &NormalizedTicket) -> u32 {
    ticket.automation_stage.as_deref().map_or(0, minutes_saved)
}

fn average_response<'a>(tickets: impl Iterator<Item = &'a NormalizedTicket>) -> f64 {
    let (total, count) = tickets
        .filter_map(|t| t.positive_response_hours())
        .fold((0.0, 0u64), |(sum, n), h| (sum + h, n + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

fn rate(count: usize) -> TicketRate {
    let per_day = count as f64 / RATE_WINDOW_DAYS as f64;
    TicketRate {
        per_day,
        per_week: per_day * 7.0,
        per_month: per_day * 30.0,
    }
}

/// Per-stage counts and savings, largest savings first.
///
/// Only rule stages (names starting with `R`) get a row; other Virtual
/// Assistant options still count as automated in the totals.
pub fn stage_breakdown(tickets: &[NormalizedTicket]) -> Vec<AutomationStageStat> {
    let mut stages: Vec<AutomationStageStat> = Vec::new();
    let rule_stages = tickets
        .iter()
        .filter_map(|t| t.automation_stage.as_deref())
        .filter(|stage| stage.starts_with('R'));
    for stage in rule_stages {
        match stages.iter_mut().find(|s| s.stage == stage) {
            Some(stat) => stat.count += 1,
            None => stages.push(AutomationStageStat {
                stage: stage.to_string(),
                count: 1,
                minutes_per_ticket: minutes_saved(stage),
                total_minutes_saved: 0,
                total_hours_saved: 0.0,
            }),
        }
    }
    for stat in &mut stages {
        stat.total_minutes_saved = stat.count * stat.minutes_per_ticket as u64;
        stat.total_hours_saved = round2(stat.total_minutes_saved as f64 / 60.0);
    }
    stages.sort_by(|a, b| b.total_minutes_saved.cmp(&a.total_minutes_saved));
    stages
}

/// Automation savings, response-time comparison and linear projections.
///
/// Rates and projections use tickets created in the trailing 90 days;
/// `current_month_savings` uses tickets created since the first of
/// `now`'s month. The two bases are independent.
pub fn forecast(tickets: &[NormalizedTicket], now: NaiveDateTime) -> AutomationAnalytics {
    let (automated, manual): (Vec<&NormalizedTicket>, Vec<&NormalizedTicket>) =
        tickets.iter().partition(|t| t.is_automated());

    let total_minutes_saved: u64 = automated.iter().map(|t| ticket_minutes(t) as u64).sum();
    let total_hours_saved = total_minutes_saved as f64 / 60.0;
    let average_time_saved_per_ticket = if automated.is_empty() {
        0.0
    } else {
        total_minutes_saved as f64 / automated.len() as f64
    };

    let automated_avg = average_response(automated.iter().copied());
    let manual_avg = average_response(manual.iter().copied());
    let improvement = if manual_avg > 0.0 {
        (manual_avg - automated_avg) / manual_avg * 100.0
    } else {
        0.0
    };

    let rate_start = now - Duration::days(RATE_WINDOW_DAYS as i64);
    let recent: Vec<&NormalizedTicket> =
        tickets.iter().filter(|t| t.created_at >= rate_start).collect();
    let recent_automated: Vec<&NormalizedTicket> =
        recent.iter().copied().filter(|t| t.is_automated()).collect();
    let recent_minutes: u64 = recent_automated.iter().map(|t| ticket_minutes(t) as u64).sum();
    let daily_minutes = recent_minutes as f64 / RATE_WINDOW_DAYS as f64;

    let month_start = start_of_day(first_day_of_month(now.date()));
    let month_minutes: u64 = automated
        .iter()
        .filter(|t| t.created_at >= month_start)
        .map(|t| ticket_minutes(t) as u64)
        .sum();

    let monthly_forecast = daily_minutes * 30.0 / 60.0;
    let yearly_forecast = daily_minutes * 365.0 / 60.0;

    AutomationAnalytics {
        automated_count: automated.len() as u64,
        manual_count: manual.len() as u64,
        total_minutes_saved,
        total_hours_saved: round2(total_hours_saved),
        total_days_saved: round2(total_hours_saved / WORK_DAY_HOURS),
        average_time_saved_per_ticket: round2(average_time_saved_per_ticket),
        automated_avg_response_hours: round2(automated_avg),
        manual_avg_response_hours: round2(manual_avg),
        response_time_improvement: round2(improvement),
        ticket_rate: rate(recent.len()),
        automated_ticket_rate: rate(recent_automated.len()),
        projections: SavingsProjection {
            daily_minutes_saved: round2(daily_minutes),
            monthly_forecast: round2(monthly_forecast),
            monthly_forecast_days: round2(monthly_forecast / WORK_DAY_HOURS),
            yearly_forecast: round2(yearly_forecast),
            yearly_forecast_days: round2(yearly_forecast / WORK_DAY_HOURS),
            current_month_savings: round2(month_minutes as f64 / 60.0),
        },
        by_stage: stage_breakdown(tickets),
    }
}
