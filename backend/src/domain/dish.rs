//! Dishes cooked from accepted donations.
//!
//! A dish is created directly in the `ready` state when a cook finalizes a
//! donation. `preparing` exists for stored rows and status filters but no
//! operation produces it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Description, DishId, DonationId, Title, UserId};

/// Flat status tag of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishStatus {
    Preparing,
    Ready,
    Distributed,
}

impl DishStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Distributed => "distributed",
        }
    }
}

impl fmt::Display for DishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text names no dish status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dish status: {value}")]
pub struct DishStatusParseError {
    value: String,
}

impl FromStr for DishStatus {
    type Err = DishStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "distributed" => Ok(Self::Distributed),
            other => Err(DishStatusParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Lifecycle state with the data each status carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DishState {
    Preparing,
    Ready {
        ready_at: DateTime<Utc>,
    },
    Distributed {
        ready_at: DateTime<Utc>,
        distributor_id: UserId,
        distributed_at: DateTime<Utc>,
    },
}

/// Stored columns that do not describe a valid [`DishState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DishStateError {
    #[error("dish status {status} has inconsistent timestamps")]
    Inconsistent { status: DishStatus },
}

impl DishState {
    /// Rebuild a state from flat storage columns.
    pub fn from_parts(
        status: DishStatus,
        ready_at: Option<DateTime<Utc>>,
        distributor_id: Option<UserId>,
        distributed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DishStateError> {
        match (status, ready_at, distributor_id, distributed_at) {
            (DishStatus::Preparing, None, None, None) => Ok(Self::Preparing),
            (DishStatus::Ready, Some(ready_at), None, None) => Ok(Self::Ready { ready_at }),
            (DishStatus::Distributed, Some(ready_at), Some(distributor_id), Some(distributed_at)) => {
                Ok(Self::Distributed {
                    ready_at,
                    distributor_id,
                    distributed_at,
                })
            }
            (status, ..) => Err(DishStateError::Inconsistent { status }),
        }
    }

    pub const fn status(&self) -> DishStatus {
        match self {
            Self::Preparing => DishStatus::Preparing,
            Self::Ready { .. } => DishStatus::Ready,
            Self::Distributed { .. } => DishStatus::Distributed,
        }
    }

    pub const fn ready_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Preparing => None,
            Self::Ready { ready_at } | Self::Distributed { ready_at, .. } => Some(*ready_at),
        }
    }

    pub const fn distributor_id(&self) -> Option<UserId> {
        match self {
            Self::Distributed { distributor_id, .. } => Some(*distributor_id),
            Self::Preparing | Self::Ready { .. } => None,
        }
    }

    pub const fn distributed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Distributed { distributed_at, .. } => Some(*distributed_at),
            Self::Preparing | Self::Ready { .. } => None,
        }
    }

    /// Compute the state after `transition`.
    pub fn apply(&self, transition: &DishTransition) -> Result<Self, DishTransitionError> {
        match (*self, *transition) {
            (Self::Preparing, DishTransition::MarkReady { at }) => Ok(Self::Ready { ready_at: at }),
            (
                Self::Ready { ready_at },
                DishTransition::Distribute {
                    distributor_id,
                    at,
                },
            ) => Ok(Self::Distributed {
                ready_at,
                distributor_id,
                distributed_at: at,
            }),
            (state, transition) => Err(DishTransitionError {
                expected: transition.expected_prior(),
                actual: state.status(),
            }),
        }
    }
}

/// State changes a dish supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DishTransition {
    MarkReady { at: DateTime<Utc> },
    Distribute { distributor_id: UserId, at: DateTime<Utc> },
}

impl DishTransition {
    pub const fn expected_prior(&self) -> DishStatus {
        match self {
            Self::MarkReady { .. } => DishStatus::Preparing,
            Self::Distribute { .. } => DishStatus::Ready,
        }
    }

    pub const fn target(&self) -> DishStatus {
        match self {
            Self::MarkReady { .. } => DishStatus::Ready,
            Self::Distribute { .. } => DishStatus::Distributed,
        }
    }
}

/// A dish was not in the status a transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("dish is {actual}, expected {expected}")]
pub struct DishTransitionError {
    pub expected: DishStatus,
    pub actual: DishStatus,
}

/// Text describing a cooked dish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishContent {
    pub title: Title,
    pub description: Description,
}

/// Prepared food made by a cook from one accepted donation.
///
/// ## Invariants
/// - `donation_id` is unique across dishes.
/// - The referenced donation was accepted by `cook_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dish {
    id: DishId,
    cook_id: UserId,
    donation_id: DonationId,
    content: DishContent,
    state: DishState,
    created_at: DateTime<Utc>,
}

impl Dish {
    /// Create a dish that is ready for pickup as of `created_at`.
    pub fn ready(
        id: DishId,
        cook_id: UserId,
        donation_id: DonationId,
        content: DishContent,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::from_parts(
            id,
            cook_id,
            donation_id,
            content,
            DishState::Ready {
                ready_at: created_at,
            },
            created_at,
        )
    }

    /// Rebuild a dish loaded from storage.
    pub fn from_parts(
        id: DishId,
        cook_id: UserId,
        donation_id: DonationId,
        content: DishContent,
        state: DishState,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            cook_id,
            donation_id,
            content,
            state,
            created_at,
        }
    }

    pub fn id(&self) -> DishId {
        self.id
    }

    pub fn cook_id(&self) -> UserId {
        self.cook_id
    }

    pub fn donation_id(&self) -> DonationId {
        self.donation_id
    }

    pub fn content(&self) -> &DishContent {
        &self.content
    }

    pub fn state(&self) -> DishState {
        self.state
    }

    pub fn status(&self) -> DishStatus {
        self.state.status()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn apply(&mut self, transition: &DishTransition) -> Result<(), DishTransitionError> {
        self.state = self.state.apply(transition)?;
        Ok(())
    }
}
