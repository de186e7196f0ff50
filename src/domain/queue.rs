use crate::config::QueueConfig;
use crate::domain::lifecycle::TicketState;
use crate::domain::ticket::{NewTicket, Ticket, TicketId};
use crate::error::{QueueError, Result};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// The ticket collection plus the ID counter.
///
/// Operations are synchronous and all-or-nothing; stores wrap this in a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueState {
    /// Live tickets in insertion order
    pub tickets: Vec<Ticket>,
    pub next_ticket_number: u64,
}

impl QueueState {
    pub fn new() -> Self {
        Self {
            tickets: Vec::new(),
            next_ticket_number: 1,
        }
    }

    /// Generates the next ticket ID. The counter never goes back.
    pub fn next_ticket_id(&mut self, prefix: &str) -> TicketId {
        let id = TicketId::new(prefix, self.next_ticket_number);
        self.next_ticket_number += 1;
        id
    }

    /// Moves the counter past every loaded ticket
    pub fn reconcile_counter(&mut self) {
        let highest = self
            .tickets
            .iter()
            .filter_map(|t| t.id.number())
            .max()
            .unwrap_or(0);
        self.next_ticket_number = self.next_ticket_number.max(highest + 1);
    }

    pub fn create(
        &mut self,
        request: NewTicket,
        config: &QueueConfig,
        now: DateTime<Local>,
    ) -> Result<Ticket> {
        // Peek the ID so a rejected request does not consume a number
        let id = TicketId::new(&config.id_prefix, self.next_ticket_number);
        let ticket = Ticket::from_request(id, request, config, now)?;
        self.next_ticket_id(&config.id_prefix);
        self.tickets.push(ticket.clone());
        Ok(ticket)
    }

    pub fn get(&self, id: &TicketId) -> Result<&Ticket> {
        self.tickets
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| QueueError::TicketNotFound(id.to_string()))
    }

    pub fn update_status(
        &mut self,
        id: &TicketId,
        target: TicketState,
        at: DateTime<Utc>,
    ) -> Result<Ticket> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| QueueError::TicketNotFound(id.to_string()))?;
        ticket.transition_to(target, at)?;
        Ok(ticket.clone())
    }

    pub fn remove(&mut self, id: &TicketId) -> Result<Ticket> {
        let index = self
            .tickets
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| QueueError::TicketNotFound(id.to_string()))?;
        Ok(self.tickets.remove(index))
    }

    pub fn snapshot(&self) -> Vec<Ticket> {
        self.tickets.clone()
    }
}

impl Default for QueueState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::{Category, SubArea};

    fn create(state: &mut QueueState, request: NewTicket) -> Result<Ticket> {
        state.create(request, &QueueConfig::default(), Local::now())
    }

    #[test]
    fn test_state_creation() {
        let state = QueueState::default();
        assert_eq!(state.next_ticket_number, 1);
        assert!(state.tickets.is_empty());
    }

    #[test]
    fn test_next_ticket_id() {
        let mut state = QueueState::new();
        assert_eq!(state.next_ticket_id("T").as_str(), "T1");
        assert_eq!(state.next_ticket_id("T").as_str(), "T2");
    }

    #[test]
    fn test_rejected_create_consumes_no_id() {
        let mut state = QueueState::new();
        assert!(create(&mut state, NewTicket::new("", Category::GeneralInquiry)).is_err());
        assert!(create(&mut state, NewTicket::new("Bea", Category::Transaction)).is_err());
        assert!(state.tickets.is_empty());

        let ticket = create(
            &mut state,
            NewTicket::new("Bea", Category::Transaction).with_sub_area(SubArea::Area1),
        )
        .unwrap();
        assert_eq!(ticket.id.as_str(), "T1");
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut state = QueueState::new();
        let first = create(&mut state, NewTicket::new("Ana", Category::GeneralInquiry)).unwrap();
        state.remove(&first.id).unwrap();

        let second = create(&mut state, NewTicket::new("Ana", Category::GeneralInquiry)).unwrap();
        assert_ne!(first.id, second.id);
        assert!(matches!(
            state.get(&first.id),
            Err(QueueError::TicketNotFound(_))
        ));
    }

    #[test]
    fn test_failed_update_changes_nothing() {
        let mut state = QueueState::new();
        let ticket = create(&mut state, NewTicket::new("Ana", Category::GeneralInquiry)).unwrap();
        let before = state.clone();

        assert!(state
            .update_status(&ticket.id, TicketState::Served, Utc::now())
            .is_err());
        assert!(state
            .update_status(&TicketId::new("T", 99), TicketState::Serving, Utc::now())
            .is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_reconcile_counter() {
        let mut state = QueueState::new();
        for _ in 0..3 {
            create(&mut state, NewTicket::new("Ana", Category::GeneralInquiry)).unwrap();
        }
        state.next_ticket_number = 1;
        state.reconcile_counter();
        assert_eq!(state.next_ticket_number, 4);

        // Never moves backwards
        state.next_ticket_number = 10;
        state.reconcile_counter();
        assert_eq!(state.next_ticket_number, 10);
    }
}
