use crate::{
    config::QueueConfig,
    domain::{NewTicket, QueueState, Ticket, TicketId, TicketState},
    error::{QueueError, Result},
    storage::TicketStore,
};
use async_trait::async_trait;
use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error, info, warn};

/// Ticket store that mirrors the queue to a JSON file.
///
/// Mutations are applied to a copy of the state, written out, and only then
/// committed, so a failed write leaves both memory and disk unchanged.
pub struct FileStore {
    config: QueueConfig,
    root_path: PathBuf,
    state: Mutex<QueueState>,
}

impl FileStore {
    const TICKETS_FILE: &'static str = "tickets.json";

    /// Opens the store under `root`, loading any saved queue
    pub async fn open(root: impl AsRef<Path>, config: QueueConfig) -> Result<Self> {
        config.validate()?;
        let root_path = root.as_ref().to_path_buf();
        let file = root_path.join(Self::TICKETS_FILE);

        let state = if file.exists() {
            let contents = fs::read_to_string(&file).await?;
            let mut state: QueueState = serde_json::from_str(&contents)?;
            state.reconcile_counter();
            info!(path = %file.display(), tickets = state.tickets.len(), "Queue loaded");
            state
        } else {
            QueueState::new()
        };

        Ok(Self {
            config,
            root_path,
            state: Mutex::new(state),
        })
    }

    fn tickets_file(&self) -> PathBuf {
        self.root_path.join(Self::TICKETS_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    /// Writes the whole queue, replacing the previous file in one rename
    async fn persist(&self, state: &QueueState) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;

        let json = serde_json::to_string_pretty(state)?;
        let target = self.tickets_file();
        let staging = target.with_extension("json.tmp");

        fs::write(&staging, json).await?;
        if let Err(e) = fs::rename(&staging, &target).await {
            let _ = fs::remove_file(&staging).await;
            return Err(QueueError::StorageError(format!(
                "failed to replace {}: {}",
                target.display(),
                e
            )));
        }
        debug!(path = %target.display(), "Queue saved");
        Ok(())
    }

    /// Runs `op` on a copy of the state and commits it once saved
    async fn mutate<T>(&self, op: impl FnOnce(&mut QueueState) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let value = op(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(value)
    }
}

#[async_trait]
impl TicketStore for FileStore {
    async fn create(&self, request: NewTicket) -> Result<Ticket> {
        let result = self
            .mutate(|state| state.create(request, &self.config, Local::now()))
            .await;
        match &result {
            Ok(ticket) => info!(ticket_id = %ticket.id, category = %ticket.category, "Ticket created"),
            Err(e) if e.is_rejection() => warn!(error = %e, "Ticket creation rejected"),
            Err(e) => error!(error = %e, "Ticket creation failed"),
        }
        result
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
        let result = self
            .mutate(|state| state.update_status(id, target, Utc::now()))
            .await;
        match &result {
            Ok(_) => info!(ticket_id = %id, to = %target, "Ticket state updated"),
            Err(e) if e.is_rejection() => {
                warn!(ticket_id = %id, to = %target, error = %e, "Ticket state update rejected")
            }
            Err(e) => error!(ticket_id = %id, to = %target, error = %e, "Ticket state update failed"),
        }
        result
    }

    async fn delete(&self, id: &TicketId) -> Result<Ticket> {
        let result = self.mutate(|state| state.remove(id)).await;
        match &result {
            Ok(ticket) => info!(ticket_id = %id, state = %ticket.state, "Ticket deleted"),
            Err(e) if e.is_rejection() => warn!(ticket_id = %id, error = %e, "Ticket deletion rejected"),
            Err(e) => error!(ticket_id = %id, error = %e, "Ticket deletion failed"),
        }
        result
    }
}
