//! # Turnero Core
//!
//! Ticket queue engine for walk-in service desks.
//!
//! Clients take a ticket, staff move it from waiting to serving to served,
//! and a public display polls for the current queue. This crate owns the
//! ticket store, the lifecycle rules and the display projections; HTTP and
//! rendering live in the embedding application.

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use config::QueueConfig;
pub use domain::{
    lifecycle::TicketState,
    ticket::{Category, NewTicket, SubArea, Ticket, TicketId},
    view::{CategoryBuckets, QueueCounts, QueueView},
};
pub use error::{ErrorKind, QueueError, Result};
pub use storage::{memory_store::InMemoryStore, TicketStore};

#[cfg(feature = "file-storage")]
pub use storage::file_storage::FileStore;
