use crate::{
    domain::{NewTicket, Ticket, TicketId, TicketState},
    error::Result,
};
use async_trait::async_trait;

pub mod memory_store;

#[cfg(feature = "file-storage")]
pub mod file_storage;

/// Authoritative ticket store.
///
/// Every operation is atomic with respect to every other: it either applies
/// fully or returns an error with the store unchanged.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Registers a new waiting ticket
    async fn create(&self, request: NewTicket) -> Result<Ticket>;

    /// Loads a ticket by ID
    async fn get(&self, id: &TicketId) -> Result<Ticket>;

    /// Snapshot of all live tickets, in insertion order
    async fn list(&self) -> Result<Vec<Ticket>>;

    /// Moves a ticket along the lifecycle, stamping service times
    async fn update_status(&self, id: &TicketId, state: TicketState) -> Result<Ticket>;

    /// Removes a ticket for good and returns it
    async fn delete(&self, id: &TicketId) -> Result<Ticket>;
}
