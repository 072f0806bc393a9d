//! Donations and their `available → accepted → finalized` lifecycle.
//!
//! The lifecycle is linear. A donation is offered by a producer, accepted by
//! exactly one cook, and finalized when that cook turns it into a dish.
//! Status and the cook reference live together in [`DonationState`] so a
//! donation can never be accepted without knowing by whom.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Description, DonationId, Quantity, Title, UserId};

/// Flat status tag of a donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    Available,
    Accepted,
    Finalized,
}

impl DonationStatus {
    /// Storage and wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Accepted => "accepted",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text names no donation status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown donation status: {value}")]
pub struct DonationStatusParseError {
    value: String,
}

impl FromStr for DonationStatus {
    type Err = DonationStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "accepted" => Ok(Self::Accepted),
            "finalized" => Ok(Self::Finalized),
            other => Err(DonationStatusParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// Lifecycle state with the data each status carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationState {
    Available,
    Accepted {
        cook_id: UserId,
        accepted_at: DateTime<Utc>,
    },
    Finalized {
        cook_id: UserId,
        accepted_at: DateTime<Utc>,
    },
}

/// Stored columns that do not describe a valid [`DonationState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DonationStateError {
    #[error("donation status {status} requires a cook and acceptance time")]
    MissingAcceptance { status: DonationStatus },
    #[error("available donation must not reference a cook")]
    UnexpectedAcceptance,
}

impl DonationState {
    /// Rebuild a state from flat storage columns.
    pub fn from_parts(
        status: DonationStatus,
        cook_id: Option<UserId>,
        accepted_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DonationStateError> {
        match (status, cook_id, accepted_at) {
            (DonationStatus::Available, None, None) => Ok(Self::Available),
            (DonationStatus::Available, _, _) => Err(DonationStateError::UnexpectedAcceptance),
            (DonationStatus::Accepted, Some(cook_id), Some(accepted_at)) => Ok(Self::Accepted {
                cook_id,
                accepted_at,
            }),
            (DonationStatus::Finalized, Some(cook_id), Some(accepted_at)) => Ok(Self::Finalized {
                cook_id,
                accepted_at,
            }),
            (status @ (DonationStatus::Accepted | DonationStatus::Finalized), _, _) => {
                Err(DonationStateError::MissingAcceptance { status })
            }
        }
    }

    pub const fn status(&self) -> DonationStatus {
        match self {
            Self::Available => DonationStatus::Available,
            Self::Accepted { .. } => DonationStatus::Accepted,
            Self::Finalized { .. } => DonationStatus::Finalized,
        }
    }

    /// Cook who accepted the donation, once accepted.
    pub const fn cook_id(&self) -> Option<UserId> {
        match self {
            Self::Available => None,
            Self::Accepted { cook_id, .. } | Self::Finalized { cook_id, .. } => Some(*cook_id),
        }
    }

    pub const fn accepted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Available => None,
            Self::Accepted { accepted_at, .. } | Self::Finalized { accepted_at, .. } => {
                Some(*accepted_at)
            }
        }
    }

    /// Compute the state after `transition`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use foodshare::domain::{DonationState, DonationStatus, DonationTransition, UserId};
    ///
    /// let cook = UserId::random();
    /// let accepted = DonationState::Available
    ///     .apply(&DonationTransition::Accept { cook_id: cook, at: Utc::now() })
    ///     .expect("available donations can be accepted");
    /// assert_eq!(accepted.status(), DonationStatus::Accepted);
    /// assert_eq!(accepted.cook_id(), Some(cook));
    /// ```
    pub fn apply(&self, transition: &DonationTransition) -> Result<Self, DonationTransitionError> {
        match (*self, *transition) {
            (Self::Available, DonationTransition::Accept { cook_id, at }) => Ok(Self::Accepted {
                cook_id,
                accepted_at: at,
            }),
            (
                Self::Accepted {
                    cook_id: owner,
                    accepted_at,
                },
                DonationTransition::Finalize { cook_id },
            ) => {
                if owner == cook_id {
                    Ok(Self::Finalized {
                        cook_id,
                        accepted_at,
                    })
                } else {
                    Err(DonationTransitionError::CookMismatch)
                }
            }
            (state, transition) => Err(DonationTransitionError::WrongStatus {
                expected: transition.expected_prior(),
                actual: state.status(),
            }),
        }
    }
}

/// State changes a donation supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationTransition {
    /// A cook claims an available donation.
    Accept { cook_id: UserId, at: DateTime<Utc> },
    /// The accepting cook consumes the donation into a dish.
    Finalize { cook_id: UserId },
}

impl DonationTransition {
    /// Status the donation must hold for the transition to apply.
    pub const fn expected_prior(&self) -> DonationStatus {
        match self {
            Self::Accept { .. } => DonationStatus::Available,
            Self::Finalize { .. } => DonationStatus::Accepted,
        }
    }

    /// Status the donation holds afterwards.
    pub const fn target(&self) -> DonationStatus {
        match self {
            Self::Accept { .. } => DonationStatus::Accepted,
            Self::Finalize { .. } => DonationStatus::Finalized,
        }
    }
}

/// Reasons a transition cannot apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DonationTransitionError {
    #[error("donation is {actual}, expected {expected}")]
    WrongStatus {
        expected: DonationStatus,
        actual: DonationStatus,
    },
    #[error("donation was accepted by another cook")]
    CookMismatch,
}

/// Text describing what is being donated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationContent {
    pub title: Title,
    pub description: Description,
    pub quantity: Quantity,
}

/// Surplus food offered by a producer.
///
/// ## Invariants
/// - `producer_id` never changes.
/// - `state` only moves forward along the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    id: DonationId,
    producer_id: UserId,
    content: DonationContent,
    state: DonationState,
    created_at: DateTime<Utc>,
}

impl Donation {
    /// Offer a new, available donation.
    pub fn offer(
        id: DonationId,
        producer_id: UserId,
        content: DonationContent,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self::from_parts(id, producer_id, content, DonationState::Available, created_at)
    }

    /// Rebuild a donation loaded from storage.
    pub fn from_parts(
        id: DonationId,
        producer_id: UserId,
        content: DonationContent,
        state: DonationState,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            producer_id,
            content,
            state,
            created_at,
        }
    }

    pub fn id(&self) -> DonationId {
        self.id
    }

    pub fn producer_id(&self) -> UserId {
        self.producer_id
    }

    pub fn content(&self) -> &DonationContent {
        &self.content
    }

    pub fn state(&self) -> DonationState {
        self.state
    }

    pub fn status(&self) -> DonationStatus {
        self.state.status()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply `transition` in place.
    pub fn apply(&mut self, transition: &DonationTransition) -> Result<(), DonationTransitionError> {
        self.state = self.state.apply(transition)?;
        Ok(())
    }
}
