//! Role-scoped dashboard statistics.

use serde::Serialize;

/// Donation tallies for a producer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DonationCounts {
    pub total: u64,
    pub accepted: u64,
    pub finalized: u64,
}

/// Dish tallies for a cook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DishCounts {
    pub created: u64,
    pub distributed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerStats {
    pub total_donations: u64,
    pub accepted_donations: u64,
    pub finalized_donations: u64,
    pub available_donations: u64,
}

impl From<DonationCounts> for ProducerStats {
    fn from(counts: DonationCounts) -> Self {
        Self {
            total_donations: counts.total,
            accepted_donations: counts.accepted,
            finalized_donations: counts.finalized,
            available_donations: counts
                .total
                .saturating_sub(counts.accepted)
                .saturating_sub(counts.finalized),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookStats {
    pub accepted_donations: u64,
    pub dishes_created: u64,
    pub dishes_distributed: u64,
    pub dishes_available: u64,
}

impl CookStats {
    pub fn new(accepted_donations: u64, dishes: DishCounts) -> Self {
        Self {
            accepted_donations,
            dishes_created: dishes.created,
            dishes_distributed: dishes.distributed,
            dishes_available: dishes.created.saturating_sub(dishes.distributed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorStats {
    pub dishes_distributed: u64,
}

/// Statistics for the acting user's role.
///
/// Serialises untagged, so an `Empty` value becomes `{}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Producer(ProducerStats),
    Cook(CookStats),
    Distributor(DistributorStats),
    Empty(EmptyStats),
}

/// Serialises as an empty JSON object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EmptyStats {}

impl DashboardStats {
    pub const fn empty() -> Self {
        Self::Empty(EmptyStats {})
    }
}
