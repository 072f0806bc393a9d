//! Listing projections that attach user display names to entities.
//!
//! Names are resolved at read time in one batch per listing: callers collect
//! the referenced user ids, fetch their names once and project every entity
//! against the resulting map. A user that no longer exists projects as
//! `None`.

use std::collections::{BTreeSet, HashMap};

use super::{DisplayName, Dish, Donation, UserId};

/// Display names keyed by user id.
pub type DisplayNames = HashMap<UserId, DisplayName>;

/// Donation with the names of the users it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationView {
    pub donation: Donation,
    pub producer_name: Option<DisplayName>,
    pub cook_name: Option<DisplayName>,
}

/// Dish with the names of the users it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishView {
    pub dish: Dish,
    pub cook_name: Option<DisplayName>,
    pub distributor_name: Option<DisplayName>,
}

/// Distinct user ids referenced by `donations`, in a stable order.
pub fn donation_user_ids<'a>(donations: impl IntoIterator<Item = &'a Donation>) -> Vec<UserId> {
    let ids: BTreeSet<UserId> = donations
        .into_iter()
        .flat_map(|donation| [Some(donation.producer_id()), donation.state().cook_id()])
        .flatten()
        .collect();
    ids.into_iter().collect()
}

/// Distinct user ids referenced by `dishes`, in a stable order.
pub fn dish_user_ids<'a>(dishes: impl IntoIterator<Item = &'a Dish>) -> Vec<UserId> {
    let ids: BTreeSet<UserId> = dishes
        .into_iter()
        .flat_map(|dish| [Some(dish.cook_id()), dish.state().distributor_id()])
        .flatten()
        .collect();
    ids.into_iter().collect()
}

fn name_of(names: &DisplayNames, id: Option<UserId>) -> Option<DisplayName> {
    id.and_then(|id| names.get(&id).cloned())
}

pub fn project_donation(donation: Donation, names: &DisplayNames) -> DonationView {
    let producer_name = name_of(names, Some(donation.producer_id()));
    let cook_name = name_of(names, donation.state().cook_id());
    DonationView {
        donation,
        producer_name,
        cook_name,
    }
}

pub fn project_dish(dish: Dish, names: &DisplayNames) -> DishView {
    let cook_name = name_of(names, Some(dish.cook_id()));
    let distributor_name = name_of(names, dish.state().distributor_id());
    DishView {
        dish,
        cook_name,
        distributor_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Description, DonationContent, DonationId, DonationState, Quantity, Title,
    };
    use chrono::Utc;
    use rstest::rstest;

    fn donation(producer: UserId, state: DonationState) -> Donation {
        Donation::from_parts(
            DonationId::random(),
            producer,
            DonationContent {
                title: Title::new("Bread").expect("title"),
                description: Description::new("Day-old loaves").expect("description"),
                quantity: Quantity::new("10 loaves").expect("quantity"),
            },
            state,
            Utc::now(),
        )
    }

    #[rstest]
    fn user_ids_are_deduplicated() {
        let producer = UserId::random();
        let cook = UserId::random();
        let donations = [
            donation(producer, DonationState::Available),
            donation(
                producer,
                DonationState::Accepted {
                    cook_id: cook,
                    accepted_at: Utc::now(),
                },
            ),
        ];
        let ids = donation_user_ids(&donations);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&producer));
        assert!(ids.contains(&cook));
    }

    #[rstest]
    fn projection_resolves_known_names_only() {
        let producer = UserId::random();
        let cook = UserId::random();
        let names = DisplayNames::from([(
            producer,
            DisplayName::new("Padaria Central").expect("name"),
        )]);
        let view = project_donation(
            donation(
                producer,
                DonationState::Accepted {
                    cook_id: cook,
                    accepted_at: Utc::now(),
                },
            ),
            &names,
        );
        assert_eq!(
            view.producer_name.as_ref().map(AsRef::as_ref),
            Some("Padaria Central")
        );
        assert_eq!(view.cook_name, None);
    }
}
