use crate::{
    config::QueueConfig,
    domain::{NewTicket, QueueState, Ticket, TicketId, TicketState},
    error::Result,
    storage::TicketStore,
};
use async_trait::async_trait;
use chrono::{Local, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// In-memory ticket store guarded by a single lock
pub struct InMemoryStore {
    config: QueueConfig,
    state: Mutex<QueueState>,
}

impl InMemoryStore {
    /// Creates an empty store with the default configuration
    pub fn new() -> Self {
        Self {
            config: QueueConfig::default(),
            state: Mutex::new(QueueState::new()),
        }
    }

    pub fn with_config(config: QueueConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: Mutex::new(QueueState::new()),
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for InMemoryStore {
    async fn create(&self, request: NewTicket) -> Result<Ticket> {
        let mut state = self.state.lock().await;
        match state.create(request, &self.config, Local::now()) {
            Ok(ticket) => {
                info!(ticket_id = %ticket.id, category = %ticket.category, "Ticket created");
                Ok(ticket)
            }
            Err(e) => {
                warn!(error = %e, "Ticket creation rejected");
                Err(e)
            }
        }
    }

    async fn get(&self, id: &TicketId) -> Result<Ticket> {
        let state = self.state.lock().await;
        state.get(id).cloned()
    }

    async fn list(&self) -> Result<Vec<Ticket>> {
        let snapshot = self.state.lock().await.snapshot();
        debug!(tickets = snapshot.len(), "Snapshot taken");
        Ok(snapshot)
    }

    async fn update_status(&self, id: &TicketId, target: TicketState) -> Result<Ticket> {
        let mut state = self.state.lock().await;
        match state.update_status(id, target, Utc::now()) {
            Ok(ticket) => {
                info!(ticket_id = %id, to = %target, "Ticket state updated");
                Ok(ticket)
            }
            Err(e) => {
                warn!(ticket_id = %id, to = %target, error = %e, "Ticket state update rejected");
                Err(e)
            }
        }
    }

    async fn delete(&self, id: &TicketId) -> Result<Ticket> {
        let mut state = self.state.lock().await;
        match state.remove(id) {
            Ok(ticket) => {
                info!(ticket_id = %id, state = %ticket.state, "Ticket deleted");
                Ok(ticket)
            }
            Err(e) => {
                warn!(ticket_id = %id, error = %e, "Ticket deletion rejected");
                Err(e)
            }
        }
    }
}
