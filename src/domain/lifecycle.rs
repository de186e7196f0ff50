//! Ticket state machine.
//!
//! `waiting -> serving -> served` is the only path. Every other request,
//! including re-entering the current state, is rejected. Service timestamps are
//! stamped here and nowhere else.

use crate::domain::ticket::Ticket;
use crate::error::{QueueError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Where a ticket is in the service lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketState {
    Waiting,
    Serving,
    Served,
}

impl TicketState {
    pub const ALL: [TicketState; 3] = [Self::Waiting, Self::Serving, Self::Served];

    pub const INITIAL: TicketState = Self::Waiting;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Serving => "serving",
            Self::Served => "served",
        }
    }

    /// Checks if a state transition is valid
    pub fn can_transition_to(&self, target: &TicketState) -> bool {
        matches!(
            (self, target),
            (Self::Waiting, Self::Serving) | (Self::Serving, Self::Served)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Served)
    }

    /// Still shown on the public display
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for TicketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketState {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "waiting" => Ok(Self::Waiting),
            "serving" => Ok(Self::Serving),
            "served" => Ok(Self::Served),
            _ => Err(QueueError::InvalidState(s.to_string())),
        }
    }
}

/// Applies a transition and its timestamp side effect.
///
/// On error the ticket is left untouched.
pub fn advance(ticket: &mut Ticket, target: TicketState, at: DateTime<Utc>) -> Result<()> {
    if !ticket.state.can_transition_to(&target) {
        return Err(QueueError::InvalidTransition {
            from: ticket.state.to_string(),
            to: target.to_string(),
        });
    }

    match target {
        TicketState::Serving => ticket.service_started_at = Some(at),
        TicketState::Served => ticket.service_ended_at = Some(at),
        // unreachable: nothing transitions into the initial state
        TicketState::Waiting => {}
    }
    ticket.state = target;
    Ok(())
}
