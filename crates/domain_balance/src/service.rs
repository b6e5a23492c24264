//! Balance service
//!
//! Orchestrates the balance engine over a `LedgerPort`: it fetches the
//! records each computation needs, runs the pure functions of this crate and
//! returns the result. Nothing is cached; every call recomputes from the
//! ledger.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, instrument};

use core_kernel::{GroupId, Money, PortError, UserId};
use domain_ledger::{roster, LedgerPort};

use crate::aggregator::{member_balances, MemberBalance};
use crate::error::BalanceError;
use crate::friends::{
    friend_balance, pair_position, shared_expenses, shared_group_ids, FriendBalance,
    FriendDetails, FriendSummary, GroupRecords, Page, SharedExpense, SharedGroup,
    UNKNOWN_GROUP_NAME,
};
use crate::netting::{net_debts, Debt};
use crate::stats::{
    dashboard_summary, group_stats, outstanding_balance, DashboardSummary, GroupStats,
    OutstandingBalance, UNKNOWN_USER_NAME,
};

/// Entry point for every balance computation
///
/// Cheap to clone; it only holds the shared ledger port.
#[derive(Clone)]
pub struct BalanceService {
    ledger: Arc<dyn LedgerPort>,
}

impl BalanceService {
    /// Creates a service reading from the given ledger
    pub fn new(ledger: Arc<dyn LedgerPort>) -> Self {
        Self { ledger }
    }

    /// Returns the underlying ledger port
    pub fn ledger(&self) -> &Arc<dyn LedgerPort> {
        &self.ledger
    }

    /// Net debts between the members of a group
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn compute_group_debts(&self, group_id: GroupId) -> Result<Vec<Debt>, BalanceError> {
        let expenses = self.ledger.group_expenses(group_id).await?;
        let settlements = self.ledger.group_settlements(group_id).await?;
        debug!(expenses = expenses.len(), settlements = settlements.len(), "Netting group records");

        let debts = net_debts(&expenses, &settlements);
        debug!(debts = debts.len(), "Computed group debts");
        Ok(debts)
    }

    /// Net balance of every current group member
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn compute_member_balances(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<MemberBalance>, BalanceError> {
        let members = self.ledger.group_members(group_id).await?;
        let debts = self.compute_group_debts(group_id).await?;
        Ok(member_balances(&debts, &roster(&members)))
    }

    /// Total spend of a group and the requesting member's balance
    #[instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
    pub async fn compute_group_stats(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<GroupStats, BalanceError> {
        let expenses = self.ledger.group_expenses(group_id).await?;
        let settlements = self.ledger.group_settlements(group_id).await?;
        let debts = net_debts(&expenses, &settlements);
        Ok(group_stats(&expenses, &debts, user_id))
    }

    /// Net balance with a friend across every shared group
    #[instrument(skip(self), fields(user_id = %user_id, friend_id = %friend_id))]
    pub async fn compute_friend_balance(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<FriendBalance, BalanceError> {
        let groups = self.shared_group_records(user_id, friend_id).await?;
        Ok(friend_balance(user_id, friend_id, &groups))
    }

    /// Expenses both users took part in, newest first
    #[instrument(skip(self), fields(user_id = %user_id, friend_id = %friend_id))]
    pub async fn get_shared_transactions(
        &self,
        user_id: UserId,
        friend_id: UserId,
        page: Page,
    ) -> Result<Vec<SharedExpense>, BalanceError> {
        let groups = self.shared_group_records(user_id, friend_id).await?;
        Ok(shared_expenses(user_id, friend_id, &groups, page))
    }

    /// Whether a member still has debts in a group
    #[instrument(skip(self), fields(group_id = %group_id, user_id = %user_id))]
    pub async fn has_outstanding_balance(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<OutstandingBalance, BalanceError> {
        let debts = self.compute_group_debts(group_id).await?;
        Ok(outstanding_balance(&debts, user_id))
    }

    /// Whether any debt remains in a group
    #[instrument(skip(self), fields(group_id = %group_id))]
    pub async fn has_any_outstanding_balances(&self, group_id: GroupId) -> Result<bool, BalanceError> {
        Ok(!self.compute_group_debts(group_id).await?.is_empty())
    }

    /// Everyone who shares a group with the user, with their net balance
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_friends(&self, user_id: UserId) -> Result<Vec<FriendSummary>, BalanceError> {
        let group_ids = self.ledger.user_group_ids(user_id).await?;

        let mut friends: BTreeMap<UserId, (usize, Money)> = BTreeMap::new();
        for group_id in group_ids {
            let members = self.ledger.group_members(group_id).await?;
            let debts = self.compute_group_debts(group_id).await?;

            for member in members.iter().filter(|m| m.user_id != user_id) {
                let entry = friends.entry(member.user_id).or_insert((0, Money::zero()));
                entry.0 += 1;
                entry.1 += pair_position(&debts, user_id, member.user_id);
            }
        }
        debug!(friends = friends.len(), "Collected friends");

        let profiles = self.ledger.get_profiles(friends.keys().copied().collect()).await?;
        let profiles: HashMap<UserId, _> = profiles.into_iter().map(|p| (p.id, p)).collect();

        let mut summaries: Vec<FriendSummary> = friends
            .into_iter()
            .map(|(friend_id, (shared_group_count, net_balance))| {
                let profile = profiles.get(&friend_id);
                FriendSummary {
                    user_id: friend_id,
                    name: profile
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()),
                    email: profile.map(|p| p.email.clone()).unwrap_or_default(),
                    shared_group_count,
                    net_balance,
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.user_id.cmp(&b.user_id))
        });
        Ok(summaries)
    }

    /// A friend's profile and the groups the two users share
    ///
    /// Returns `None` when the friend has no profile or shares no group
    /// with the user.
    #[instrument(skip(self), fields(user_id = %user_id, friend_id = %friend_id))]
    pub async fn friend_details(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<Option<FriendDetails>, BalanceError> {
        let Some(profile) = self.ledger.get_profiles(vec![friend_id]).await?.into_iter().next() else {
            return Ok(None);
        };

        let user_groups = self.ledger.user_group_ids(user_id).await?;
        let friend_groups = self.ledger.user_group_ids(friend_id).await?;
        let shared = shared_group_ids(&user_groups, &friend_groups);
        if shared.is_empty() {
            return Ok(None);
        }

        let mut shared_groups = Vec::with_capacity(shared.len());
        for group_id in shared {
            match self.ledger.get_group(group_id).await {
                Ok(group) => shared_groups.push(SharedGroup {
                    id: group.id,
                    name: group.name,
                    description: group.description,
                }),
                Err(PortError::NotFound { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Some(FriendDetails {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            shared_groups,
        }))
    }

    /// What the user owes and is owed across all their groups
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn dashboard_summary(&self, user_id: UserId) -> Result<DashboardSummary, BalanceError> {
        let group_ids = self.ledger.user_group_ids(user_id).await?;

        let mut group_debts = Vec::with_capacity(group_ids.len());
        for group_id in group_ids {
            group_debts.push(self.compute_group_debts(group_id).await?);
        }

        let mut counterparties: Vec<UserId> = group_debts
            .iter()
            .flatten()
            .filter_map(|d| {
                if d.from == user_id {
                    Some(d.to)
                } else if d.to == user_id {
                    Some(d.from)
                } else {
                    None
                }
            })
            .collect();
        counterparties.sort();
        counterparties.dedup();

        let profiles = self.ledger.get_profiles(counterparties).await?;
        Ok(dashboard_summary(user_id, &group_debts, &profiles))
    }

    async fn shared_group_records(
        &self,
        user_id: UserId,
        friend_id: UserId,
    ) -> Result<Vec<GroupRecords>, BalanceError> {
        let user_groups = self.ledger.user_group_ids(user_id).await?;
        let friend_groups = self.ledger.user_group_ids(friend_id).await?;
        let shared = shared_group_ids(&user_groups, &friend_groups);
        debug!(shared_groups = shared.len(), "Resolved shared groups");

        let mut records = Vec::with_capacity(shared.len());
        for group_id in shared {
            let group_name = match self.ledger.get_group(group_id).await {
                Ok(group) => group.name,
                Err(PortError::NotFound { .. }) => UNKNOWN_GROUP_NAME.to_string(),
                Err(e) => return Err(e.into()),
            };
            records.push(GroupRecords {
                group_id,
                group_name,
                expenses: self.ledger.group_expenses(group_id).await?,
                settlements: self.ledger.group_settlements(group_id).await?,
            });
        }
        Ok(records)
    }
}
