//! Append-only audit entries recorded for every state change.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditEntryId, DishId, DonationId, UserId};

/// Upper bound on entries returned by a history query.
pub const HISTORY_LIMIT: u32 = 50;

/// What the acting user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Accepted,
    Distributed,
}

impl AuditAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Accepted => "accepted",
            Self::Distributed => "distributed",
        }
    }
}

/// Kind of entity an entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    Donation,
    Dish,
}

impl AuditEntityType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::Dish => "dish",
        }
    }
}

/// Unknown tag read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown audit tag: {value}")]
pub struct AuditTagParseError {
    value: String,
}

impl AuditTagParseError {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }
}

impl FromStr for AuditAction {
    type Err = AuditTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "accepted" => Ok(Self::Accepted),
            "distributed" => Ok(Self::Distributed),
            other => Err(AuditTagParseError::new(other)),
        }
    }
}

impl FromStr for AuditEntityType {
    type Err = AuditTagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donation" => Ok(Self::Donation),
            "dish" => Ok(Self::Dish),
            other => Err(AuditTagParseError::new(other)),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AuditEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed reference to the entity an action touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditSubject {
    Donation(DonationId),
    Dish(DishId),
}

impl AuditSubject {
    pub const fn entity_type(self) -> AuditEntityType {
        match self {
            Self::Donation(_) => AuditEntityType::Donation,
            Self::Dish(_) => AuditEntityType::Dish,
        }
    }

    pub const fn entity_id(self) -> Uuid {
        match self {
            Self::Donation(id) => *id.as_uuid(),
            Self::Dish(id) => *id.as_uuid(),
        }
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditEntryId,
    pub user_id: UserId,
    pub action: AuditAction,
    pub entity_type: AuditEntityType,
    pub entity_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Record that `user_id` performed `action` on `subject` at `at`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use foodshare::domain::{AuditAction, AuditEntityType, AuditEntry, AuditSubject, DonationId, UserId};
    ///
    /// let donation = DonationId::random();
    /// let entry = AuditEntry::record(UserId::random(), AuditAction::Created, AuditSubject::Donation(donation), Utc::now());
    /// assert_eq!(entry.entity_type, AuditEntityType::Donation);
    /// assert_eq!(entry.entity_id, *donation.as_uuid());
    /// ```
    pub fn record(
        user_id: UserId,
        action: AuditAction,
        subject: AuditSubject,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AuditEntryId::random(),
            user_id,
            action,
            entity_type: subject.entity_type(),
            entity_id: subject.entity_id(),
            created_at: at,
        }
    }
}

/// Number of history entries to return, clamped to `1..=HISTORY_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimit(u32);

impl HistoryLimit {
    pub fn new(requested: u32) -> Self {
        Self(requested.clamp(1, HISTORY_LIMIT))
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for HistoryLimit {
    fn default() -> Self {
        Self(HISTORY_LIMIT)
    }
}
