//! User roles and the capabilities each role grants.
//!
//! Roles are fixed at registration. Every mutating workflow operation names
//! the capability it needs and asks the actor's role whether it is granted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::Error;

/// Closed set of participant roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Offers surplus food as donations.
    Producer,
    /// Accepts donations and turns them into dishes.
    Cook,
    /// Picks up ready dishes for delivery.
    Distributor,
}

/// Workflow actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CreateDonation,
    AcceptDonation,
    CreateDish,
    DistributeDish,
}

impl Capability {
    fn denial_message(self) -> &'static str {
        match self {
            Self::CreateDonation => "only producers can create donations",
            Self::AcceptDonation => "only cooks can accept donations",
            Self::CreateDish => "only cooks can create dishes",
            Self::DistributeDish => "only distributors can accept dishes",
        }
    }
}

impl Role {
    /// Wire name of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Cook => "cook",
            Self::Distributor => "distributor",
        }
    }

    /// Whether this role grants `capability`.
    ///
    /// # Examples
    /// ```
    /// use foodshare::domain::{Capability, Role};
    ///
    /// assert!(Role::Cook.can(Capability::AcceptDonation));
    /// assert!(!Role::Producer.can(Capability::DistributeDish));
    /// ```
    pub const fn can(self, capability: Capability) -> bool {
        match (self, capability) {
            (Self::Producer, Capability::CreateDonation)
            | (Self::Cook, Capability::AcceptDonation | Capability::CreateDish)
            | (Self::Distributor, Capability::DistributeDish) => true,
            (Self::Producer, _) | (Self::Cook, _) | (Self::Distributor, _) => false,
        }
    }

    /// Return `Forbidden` unless this role grants `capability`.
    pub fn require(self, capability: Capability) -> Result<(), Error> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(Error::forbidden(capability.denial_message()))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text names no known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("role must be one of producer, cook, distributor; got {value:?}")]
pub struct RoleParseError {
    value: String,
}

impl From<RoleParseError> for Error {
    fn from(err: RoleParseError) -> Self {
        let details = json!({ "field": "role", "value": err.value });
        Error::invalid_role(err.to_string()).with_details(details)
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "producer" => Ok(Self::Producer),
            "cook" => Ok(Self::Cook),
            "distributor" => Ok(Self::Distributor),
            _ => Err(RoleParseError {
                value: s.to_owned(),
            }),
        }
    }
}
