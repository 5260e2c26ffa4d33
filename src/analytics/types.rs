use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Average ticket age for tickets created on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeTrendPoint {
    pub date: NaiveDate,
    pub label: String,
    pub open_avg: f64,
    pub closed_avg: f64,
}

/// Average first-response time for tickets created in one ISO week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTrendPoint {
    /// Monday of the week.
    pub date: NaiveDate,
    pub label: String,
    pub avg_response_hours: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenTicketTrendPoint {
    pub date: NaiveDate,
    pub label: String,
    pub open_count: u64,
}

/// Tickets created versus closed on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetNewTrendPoint {
    pub date: NaiveDate,
    pub label: String,
    pub created: u64,
    pub closed: u64,
    pub net_change: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: String,
    pub open_count: u64,
    pub closed_count: u64,
    pub total_count: u64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomationStageStat {
    pub stage: String,
    pub count: u64,
    pub minutes_per_ticket: u32,
    pub total_minutes_saved: u64,
    pub total_hours_saved: f64,
}

/// Tickets created per day, week and month over the trailing 90 days.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketRate {
    pub per_day: f64,
    pub per_week: f64,
    pub per_month: f64,
}

/// Linear savings projections, in hours and 8-hour work days.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SavingsProjection {
    /// Minutes saved per day over the trailing 90 days.
    pub daily_minutes_saved: f64,
    pub monthly_forecast: f64,
    pub monthly_forecast_days: f64,
    pub yearly_forecast: f64,
    pub yearly_forecast_days: f64,
    /// Hours saved by tickets created since the first of this month.
    pub current_month_savings: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutomationAnalytics {
    pub automated_count: u64,
    pub manual_count: u64,
    pub total_minutes_saved: u64,
    pub total_hours_saved: f64,
    pub total_days_saved: f64,
    /// Minutes saved per automated ticket.
    pub average_time_saved_per_ticket: f64,
    pub automated_avg_response_hours: f64,
    pub manual_avg_response_hours: f64,
    /// Percent by which automated tickets are answered faster.
    pub response_time_improvement: f64,
    pub ticket_rate: TicketRate,
    pub automated_ticket_rate: TicketRate,
    pub projections: SavingsProjection,
    pub by_stage: Vec<AutomationStageStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyResponsePoint {
    pub date: NaiveDate,
    pub label: String,
    pub avg_response_hours: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentResponse {
    pub id: String,
    pub name: String,
    pub assignee: String,
    pub created_at: NaiveDateTime,
    pub response_time_hours: f64,
}

/// Response times of the last two days against the 88 days before them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseComparison {
    pub recent_average: f64,
    pub previous_average: f64,
    pub improvement: f64,
    pub recent_count: u64,
    pub previous_count: u64,
    pub daily: Vec<DailyResponsePoint>,
    pub recent_tickets: Vec<RecentResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepartmentStats {
    pub total_open: u64,
    /// Open longer than 14 days.
    pub aged: u64,
    /// Open longer than 30 days.
    pub critical: u64,
    pub average_age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}
