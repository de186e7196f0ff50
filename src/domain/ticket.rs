use crate::config::QueueConfig;
use crate::domain::lifecycle::{self, TicketState};
use crate::error::{QueueError, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Unique identifier for a ticket (e.g., T1, T2, T100)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    /// Creates a new TicketId from a prefix and counter
    pub fn new(prefix: &str, counter: u64) -> Self {
        Self(format!("{}{}", prefix, counter))
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of the ID
    pub fn number(&self) -> Option<u64> {
        let digits = self.0.trim_start_matches(|c: char| !c.is_ascii_digit());
        digits.parse().ok()
    }
}

impl FromStr for TicketId {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
        let (prefix, digits) = s.split_at(split);

        if !prefix.is_empty() && digits.parse::<u64>().is_ok() {
            Ok(Self(s.to_string()))
        } else {
            Err(QueueError::InvalidTicketId(s.to_string()))
        }
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of request a ticket was taken for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    GeneralInquiry,
    Transaction,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralInquiry => "general-inquiry",
            Self::Transaction => "transaction",
        }
    }

    /// Whether tickets of this category must name a service counter
    pub fn requires_sub_area(&self) -> bool {
        matches!(self, Self::Transaction)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "general-inquiry" => Ok(Self::GeneralInquiry),
            "transaction" => Ok(Self::Transaction),
            _ => Err(QueueError::Validation(format!(
                "Invalid category '{}'. Valid categories: general-inquiry, transaction",
                s
            ))),
        }
    }
}

/// Service counter handling transaction tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubArea {
    #[serde(rename = "area-1")]
    Area1,
    #[serde(rename = "area-2")]
    Area2,
    #[serde(rename = "area-3")]
    Area3,
}

impl SubArea {
    /// Display order of the counters
    pub const ALL: [SubArea; 3] = [SubArea::Area1, SubArea::Area2, SubArea::Area3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Area1 => "area-1",
            Self::Area2 => "area-2",
            Self::Area3 => "area-3",
        }
    }
}

impl fmt::Display for SubArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubArea {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        SubArea::ALL
            .into_iter()
            .find(|area| area.as_str() == normalized)
            .ok_or_else(|| {
                QueueError::Validation(format!(
                    "Invalid sub-area '{}'. Valid sub-areas: area-1, area-2, area-3",
                    s
                ))
            })
    }
}

/// Fields supplied by a client when taking a ticket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTicket {
    pub name: String,
    pub category: Option<Category>,
    pub sub_area: Option<SubArea>,
    pub created_date: Option<String>,
    pub created_time: Option<String>,
}

impl NewTicket {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn with_sub_area(mut self, sub_area: SubArea) -> Self {
        self.sub_area = Some(sub_area);
        self
    }

    /// Uses caller-supplied creation stamps instead of the current time
    pub fn with_created(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.created_date = Some(date.into());
        self.created_time = Some(time.into());
        self
    }
}

/// A queued walk-in request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    pub name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_area: Option<SubArea>,
    pub created_date: String,
    pub created_time: String,
    pub state: TicketState,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_ended_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Builds a waiting ticket from client fields, rejecting invalid input
    pub fn from_request(
        id: TicketId,
        request: NewTicket,
        config: &QueueConfig,
        now: DateTime<Local>,
    ) -> Result<Self> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(QueueError::Validation("Ticket name is required".into()));
        }

        let category = request
            .category
            .ok_or_else(|| QueueError::Validation("Ticket category is required".into()))?;

        let sub_area = if category.requires_sub_area() {
            Some(request.sub_area.ok_or_else(|| {
                QueueError::Validation(format!("A sub-area is required for {} tickets", category))
            })?)
        } else {
            None
        };

        let created_date = non_blank(request.created_date)
            .unwrap_or_else(|| now.format(&config.date_format).to_string());
        let created_time = non_blank(request.created_time)
            .unwrap_or_else(|| now.format(&config.time_format).to_string());

        Ok(Self {
            id,
            name: name.to_string(),
            category,
            sub_area,
            created_date,
            created_time,
            state: TicketState::INITIAL,
            created_at: now.with_timezone(&Utc),
            service_started_at: None,
            service_ended_at: None,
        })
    }

    /// Moves the ticket to `target`, stamping service times
    pub fn transition_to(&mut self, target: TicketState, at: DateTime<Utc>) -> Result<()> {
        lifecycle::advance(self, target, at)
    }

    /// Point in time the ticket joined the queue, for ordering
    ///
    /// Caller-supplied date and time are trusted as-is and only used when they
    /// parse with the configured formats; otherwise the store's own stamp is used.
    pub fn queued_at(&self, date_format: &str, time_format: &str) -> NaiveDateTime {
        let date = NaiveDate::parse_from_str(&self.created_date, date_format);
        let time = NaiveTime::parse_from_str(&self.created_time, time_format);

        match (date, time) {
            (Ok(date), Ok(time)) => date.and_time(time),
            _ => self.created_at.with_timezone(&Local).naive_local(),
        }
    }

    /// Waiting or being served
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
