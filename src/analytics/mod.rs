pub mod automation;
pub mod category;
pub mod response;
pub mod trends;
pub mod types;
pub mod views;

pub use automation::{forecast, minutes_saved, stage_breakdown};
pub use category::{categorize, category_breakdown, Category};
pub use response::compare_response_times;
pub use trends::{age_trend, net_new_trend, open_ticket_trend, response_trend};
pub use types::*;
pub use views::{
    blockers, department_stats, extract_departments, filter_by_department, last_twelve_months,
    status_distribution, ALL_DEPARTMENTS,
};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::calendar::HolidayCalendar;
use crate::date_util::round2;
use crate::ticket::NormalizedTicket;

pub const DEFAULT_WINDOW_DAYS: u32 = 90;

/// Headline counts for a set of tickets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: u64,
    pub open: u64,
    pub closed: u64,
    pub automated: u64,
    /// Mean of positive response times.
    pub avg_response_hours: f64,
    pub avg_open_age_days: f64,
}

impl Summary {
    pub fn of(tickets: &[NormalizedTicket]) -> Self {
        let open: Vec<&NormalizedTicket> = tickets.iter().filter(|t| t.is_open).collect();
        let responses: Vec<f64> = tickets
            .iter()
            .filter_map(|t| t.positive_response_hours())
            .collect();
        let avg = |values: &[f64]| {
            if values.is_empty() {
                0.0
            } else {
                round2(values.iter().sum::<f64>() / values.len() as f64)
            }
        };
        let open_ages: Vec<f64> = open.iter().map(|t| t.ticket_age).collect();
        Self {
            total: tickets.len() as u64,
            open: open.len() as u64,
            closed: (tickets.len() - open.len()) as u64,
            automated: tickets.iter().filter(|t| t.is_automated()).count() as u64,
            avg_response_hours: avg(&responses),
            avg_open_age_days: avg(&open_ages),
        }
    }
}

/// Everything the dashboard shows for one board.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: NaiveDateTime,
    pub window_days: u32,
    pub summary: Summary,
    pub age_trend: Vec<AgeTrendPoint>,
    pub response_trend: Vec<ResponseTrendPoint>,
    pub open_ticket_trend: Vec<OpenTicketTrendPoint>,
    pub net_new_trend: Vec<NetNewTrendPoint>,
    pub categories: Vec<CategoryStat>,
    pub automation: AutomationAnalytics,
    pub response_comparison: ResponseComparison,
    pub departments: DepartmentStats,
    pub status_distribution: Vec<StatusCount>,
    pub blocker_count: u64,
}

/// Build the full report for `tickets` as of `now`.
///
/// Logs a warning for each year in the analysed range that the calendar
/// has no holidays for.
pub fn analyze(
    tickets: &[NormalizedTicket],
    calendar: &HolidayCalendar,
    window_days: u32,
    now: NaiveDateTime,
) -> DashboardReport {
    if let Some(earliest) = tickets.iter().map(|t| t.created_at.date()).min() {
        for year in calendar.uncovered_years(earliest, now.date()) {
            log::warn!("No holidays configured for {year}; counting weekends only");
        }
    }

    log::debug!("Analyzing {} tickets over {window_days} days", tickets.len());

    DashboardReport {
        generated_at: now,
        window_days,
        summary: Summary::of(tickets),
        age_trend: age_trend(tickets, window_days, now),
        response_trend: response_trend(tickets, window_days, now),
        open_ticket_trend: open_ticket_trend(tickets, window_days, now),
        net_new_trend: net_new_trend(tickets, window_days, now),
        categories: category_breakdown(tickets),
        automation: forecast(tickets, now),
        response_comparison: compare_response_times(tickets, now),
        departments: department_stats(tickets, ALL_DEPARTMENTS),
        status_distribution: status_distribution(tickets),
        blocker_count: blockers(tickets).len() as u64,
    }
}
