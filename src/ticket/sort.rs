use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::NormalizedTicket;

/// Column a ticket list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    TicketAge,
    CreatedAt,
    Name,
    Assignee,
    Department,
    ResponseTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketSort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl TicketSort {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Ascending comparison on the chosen field.
    fn compare(&self, a: &NormalizedTicket, b: &NormalizedTicket) -> Ordering {
        match self.field {
            SortField::TicketAge => a.ticket_age.total_cmp(&b.ticket_age),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Name => cmp_text(&a.name, &b.name),
            SortField::Assignee => cmp_text(&a.assignee, &b.assignee),
            SortField::Department => cmp_text(
                a.department().as_deref().unwrap_or(""),
                b.department().as_deref().unwrap_or(""),
            ),
            // Missing response times order before any value.
            SortField::ResponseTime => match (a.response_time_hours, b.response_time_hours) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Stable sort of `tickets` in place.
pub fn sort_tickets(tickets: &mut [NormalizedTicket], sort: TicketSort) {
    tickets.sort_by(|a, b| {
        let ord = sort.compare(a, b);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::fixtures::{dt, tickets, RawTaskBuilder};

    fn sample() -> Vec<NormalizedTicket> {
        tickets(
            vec![
                RawTaskBuilder::new("a")
                    .name("printer jam")
                    .assignee("zoe")
                    .created("2025-01-06T09:00:00")
                    .modified("2025-01-06T12:00:00")
                    .enum_field("Department", "Sales")
                    .build(),
                RawTaskBuilder::new("b")
                    .name("Password reset")
                    .assignee("Adam")
                    .created("2025-01-02T09:00:00")
                    .build(),
                RawTaskBuilder::new("c")
                    .name("VPN down")
                    .assignee("mia")
                    .created("2025-01-08T09:00:00")
                    .modified("2025-01-08T10:00:00")
                    .enum_field("Department", "finance")
                    .build(),
            ],
            dt("2025-01-10T09:00:00"),
        )
    }

    fn ids(tickets: &[NormalizedTicket]) -> Vec<&str> {
        tickets.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_age_desc() {
        let mut t = sample();
        sort_tickets(&mut t, TicketSort::default());
        assert_eq!(ids(&t), ["b", "a", "c"]);
    }

    #[test]
    fn test_sort_by_created_asc() {
        let mut t = sample();
        sort_tickets(&mut t, TicketSort::new(SortField::CreatedAt, SortDirection::Asc));
        assert_eq!(ids(&t), ["b", "a", "c"]);
    }

    #[test]
    fn test_text_sort_ignores_case() {
        let mut t = sample();
        sort_tickets(&mut t, TicketSort::new(SortField::Name, SortDirection::Asc));
        assert_eq!(ids(&t), ["b", "a", "c"]);

        sort_tickets(&mut t, TicketSort::new(SortField::Assignee, SortDirection::Asc));
        assert_eq!(ids(&t), ["b", "c", "a"]);

        sort_tickets(&mut t, TicketSort::new(SortField::Department, SortDirection::Asc));
        assert_eq!(ids(&t), ["b", "c", "a"]);
    }

    #[test]
    fn test_missing_response_sorts_lowest() {
        let mut t = sample();
        sort_tickets(&mut t, TicketSort::new(SortField::ResponseTime, SortDirection::Asc));
        assert_eq!(ids(&t), ["b", "c", "a"]);
        sort_tickets(&mut t, TicketSort::new(SortField::ResponseTime, SortDirection::Desc));
        assert_eq!(ids(&t), ["a", "c", "b"]);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut t = sample();
        for ticket in &mut t {
            ticket.ticket_age = 1.0;
        }
        sort_tickets(&mut t, TicketSort::default());
        assert_eq!(ids(&t), ["a", "b", "c"]);
    }
}
