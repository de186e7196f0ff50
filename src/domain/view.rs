use crate::config::QueueConfig;
use crate::domain::lifecycle::TicketState;
use crate::domain::ticket::{Category, SubArea, Ticket, TicketId};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Tickets grouped the way the public display lays them out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBuckets<'a> {
    pub general_inquiry: Vec<&'a Ticket>,
    /// Always holds every known sub-area, in counter order
    pub transaction: BTreeMap<SubArea, Vec<&'a Ticket>>,
}

impl<'a> CategoryBuckets<'a> {
    fn empty() -> Self {
        Self {
            general_inquiry: Vec::new(),
            transaction: SubArea::ALL.into_iter().map(|area| (area, Vec::new())).collect(),
        }
    }

    pub fn area(&self, area: SubArea) -> &[&'a Ticket] {
        self.transaction.get(&area).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Number of tickets in each state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueCounts {
    pub waiting: usize,
    pub serving: usize,
    pub served: usize,
}

impl QueueCounts {
    pub fn get(&self, state: TicketState) -> usize {
        match state {
            TicketState::Waiting => self.waiting,
            TicketState::Serving => self.serving,
            TicketState::Served => self.served,
        }
    }

    pub fn total(&self) -> usize {
        self.waiting + self.serving + self.served
    }
}

/// Read-side projections over a store snapshot.
///
/// Holds only the formats needed to interpret creation stamps; every method
/// recomputes from the tickets it is given.
#[derive(Debug, Clone)]
pub struct QueueView {
    date_format: String,
    time_format: String,
}

impl Default for QueueView {
    fn default() -> Self {
        Self::new(&QueueConfig::default())
    }
}

impl QueueView {
    pub fn new(config: &QueueConfig) -> Self {
        Self {
            date_format: config.date_format.clone(),
            time_format: config.time_format.clone(),
        }
    }

    /// Partitions tickets by category, and transaction tickets by sub-area
    ///
    /// Input order is preserved inside each bucket.
    pub fn by_category_and_area<'a>(&self, tickets: &'a [Ticket]) -> CategoryBuckets<'a> {
        let mut buckets = CategoryBuckets::empty();

        for ticket in tickets {
            match (ticket.category, ticket.sub_area) {
                (Category::GeneralInquiry, _) => buckets.general_inquiry.push(ticket),
                (Category::Transaction, Some(area)) => {
                    buckets.transaction.entry(area).or_default().push(ticket)
                }
                // The store rejects these at creation
                (Category::Transaction, None) => {}
            }
        }

        buckets
    }

    /// Waiting and serving tickets, oldest first
    pub fn active_queue<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        self.ordered(tickets, |t| t.is_active())
    }

    pub fn waiting<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        self.ordered(tickets, |t| t.state == TicketState::Waiting)
    }

    pub fn serving<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        self.ordered(tickets, |t| t.state == TicketState::Serving)
    }

    pub fn counts(&self, tickets: &[Ticket]) -> QueueCounts {
        tickets
            .iter()
            .fold(QueueCounts::default(), |mut counts, ticket| {
                match ticket.state {
                    TicketState::Waiting => counts.waiting += 1,
                    TicketState::Serving => counts.serving += 1,
                    TicketState::Served => counts.served += 1,
                }
                counts
            })
    }

    /// Tickets serving in `current` that were not serving in `previous`
    ///
    /// Used between two polls to announce who was just called. A ticket that
    /// went straight from unseen to served between polls is never reported.
    pub fn newly_serving<'a>(&self, previous: &[Ticket], current: &'a [Ticket]) -> Vec<&'a Ticket> {
        let already: HashSet<&TicketId> = previous
            .iter()
            .filter(|t| t.state == TicketState::Serving)
            .map(|t| &t.id)
            .collect();

        self.serving(current)
            .into_iter()
            .filter(|t| !already.contains(&t.id))
            .collect()
    }

    fn ordered<'a>(&self, tickets: &'a [Ticket], keep: impl Fn(&Ticket) -> bool) -> Vec<&'a Ticket> {
        let mut selected: Vec<&Ticket> = tickets.iter().filter(|&t| keep(t)).collect();
        // sort_by_cached_key is stable, so ties keep snapshot order
        selected.sort_by_cached_key(|t| t.queued_at(&self.date_format, &self.time_format));
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::NewTicket;
    use chrono::{Local, Utc};

    fn ticket(number: u64, request: NewTicket) -> Ticket {
        Ticket::from_request(
            TicketId::new("T", number),
            request,
            &QueueConfig::default(),
            Local::now(),
        )
        .unwrap()
    }

    fn inquiry(number: u64, time: &str) -> Ticket {
        ticket(
            number,
            NewTicket::new(format!("Client {}", number), Category::GeneralInquiry)
                .with_created("10/06/2024", time),
        )
    }

    fn transaction(number: u64, area: SubArea, time: &str) -> Ticket {
        ticket(
            number,
            NewTicket::new(format!("Client {}", number), Category::Transaction)
                .with_sub_area(area)
                .with_created("10/06/2024", time),
        )
    }

    fn ids(tickets: &[&Ticket]) -> Vec<String> {
        tickets.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_buckets_by_category_and_area() {
        let tickets = vec![
            transaction(1, SubArea::Area2, "09:00"),
            transaction(2, SubArea::Area1, "09:01"),
            inquiry(3, "09:02"),
        ];
        let buckets = QueueView::default().by_category_and_area(&tickets);

        assert_eq!(ids(buckets.area(SubArea::Area2)), vec!["T1"]);
        assert_eq!(ids(buckets.area(SubArea::Area1)), vec!["T2"]);
        assert!(buckets.area(SubArea::Area3).is_empty());
        assert_eq!(ids(&buckets.general_inquiry), vec!["T3"]);
        let transactions: usize = buckets.transaction.values().map(Vec::len).sum();
        assert_eq!(transactions, 2);
    }

    #[test]
    fn test_empty_snapshot_still_lists_every_area() {
        let buckets = QueueView::default().by_category_and_area(&[]);
        let areas: Vec<SubArea> = buckets.transaction.keys().copied().collect();
        assert_eq!(areas, SubArea::ALL.to_vec());

        let json = serde_json::to_value(&buckets).unwrap();
        assert!(json["transaction"]["area-3"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_active_queue_orders_by_creation_time() {
        let mut served = inquiry(1, "08:00");
        served.transition_to(TicketState::Serving, Utc::now()).unwrap();
        served.transition_to(TicketState::Served, Utc::now()).unwrap();

        let mut serving = inquiry(4, "08:30");
        serving.transition_to(TicketState::Serving, Utc::now()).unwrap();

        let tickets = vec![
            served,
            transaction(2, SubArea::Area2, "09:15"),
            transaction(3, SubArea::Area1, "09:05"),
            serving,
        ];
        let queue = QueueView::default().active_queue(&tickets);

        assert_eq!(ids(&queue), vec!["T4", "T3", "T2"]);
    }

    #[test]
    fn test_active_queue_ties_keep_insertion_order() {
        let tickets = vec![inquiry(5, "10:00"), inquiry(2, "10:00"), inquiry(9, "10:00")];
        let queue = QueueView::default().active_queue(&tickets);
        assert_eq!(ids(&queue), vec!["T5", "T2", "T9"]);
    }

    #[test]
    fn test_counts() {
        let mut a = inquiry(1, "08:00");
        a.transition_to(TicketState::Serving, Utc::now()).unwrap();
        let mut b = inquiry(2, "08:01");
        b.transition_to(TicketState::Serving, Utc::now()).unwrap();
        b.transition_to(TicketState::Served, Utc::now()).unwrap();
        let tickets = vec![a, b, inquiry(3, "08:02"), inquiry(4, "08:03")];

        let counts = QueueView::default().counts(&tickets);
        assert_eq!(
            counts,
            QueueCounts {
                waiting: 2,
                serving: 1,
                served: 1
            }
        );
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.get(TicketState::Waiting), 2);
    }

    #[test]
    fn test_waiting_and_serving_columns() {
        let mut called = inquiry(3, "07:59");
        called.transition_to(TicketState::Serving, Utc::now()).unwrap();
        let tickets = vec![inquiry(1, "08:10"), called, inquiry(2, "08:05")];
        let view = QueueView::default();

        assert_eq!(ids(&view.waiting(&tickets)), vec!["T2", "T1"]);
        assert_eq!(ids(&view.serving(&tickets)), vec!["T3"]);
    }

    #[test]
    fn test_newly_serving_between_polls() {
        let mut first = inquiry(1, "08:00");
        let second = inquiry(2, "08:01");
        let previous = vec![first.clone(), second.clone()];

        first.transition_to(TicketState::Serving, Utc::now()).unwrap();
        let current = vec![first.clone(), second.clone()];
        let view = QueueView::default();
        assert_eq!(ids(&view.newly_serving(&previous, &current)), vec!["T1"]);

        // Still serving on the next poll: not announced again
        assert!(view.newly_serving(&current, &current).is_empty());

        // Served without ever being observed as serving
        let mut skipped = second;
        skipped.transition_to(TicketState::Serving, Utc::now()).unwrap();
        skipped.transition_to(TicketState::Served, Utc::now()).unwrap();
        assert!(view.newly_serving(&current, &[first, skipped]).is_empty());
    }
}
