//! Request and response bodies
//!
//! Domain results carry only user ids. Display names are looked up here,
//! at the edge, through a `Names` directory built from profiles.

pub mod dashboard;
pub mod friend;
pub mod group;

use std::collections::HashMap;

use core_kernel::UserId;
use domain_balance::stats::UNKNOWN_USER_NAME;
use domain_balance::Debt;
use domain_ledger::Profile;

/// Display names by user id
#[derive(Debug, Default)]
pub struct Names(HashMap<UserId, String>);

impl Names {
    pub fn from_profiles(profiles: Vec<Profile>) -> Self {
        Self(profiles.into_iter().map(|p| (p.id, p.name)).collect())
    }

    /// Name of a user, or `"Unknown"` without a profile
    pub fn get(&self, user_id: UserId) -> String {
        self.0
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
    }
}

/// Every user a list of debts mentions, sorted and deduplicated
pub fn debt_parties(debts: &[Debt]) -> Vec<UserId> {
    let mut ids: Vec<UserId> = debts.iter().flat_map(|d| [d.from, d.to]).collect();
    ids.sort();
    ids.dedup();
    ids
}
