//! Group balance DTOs

use serde::Serialize;

use core_kernel::{GroupId, Money, UserId};
use domain_balance::{Debt, GroupStats, MemberBalance, OutstandingBalance};

use super::Names;

#[derive(Debug, Serialize)]
pub struct DebtResponse {
    pub from: UserId,
    pub from_name: String,
    pub to: UserId,
    pub to_name: String,
    pub amount: Money,
}

impl DebtResponse {
    pub fn new(debt: &Debt, names: &Names) -> Self {
        Self {
            from: debt.from,
            from_name: names.get(debt.from),
            to: debt.to,
            to_name: names.get(debt.to),
            amount: debt.amount,
        }
    }

    pub fn list(debts: &[Debt], names: &Names) -> Vec<Self> {
        debts.iter().map(|d| Self::new(d, names)).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct GroupBalancesResponse {
    pub group_id: GroupId,
    pub debts: Vec<DebtResponse>,
}

#[derive(Debug, Serialize)]
pub struct MemberBalanceResponse {
    pub user_id: UserId,
    pub name: String,
    pub net_balance: Money,
}

impl MemberBalanceResponse {
    pub fn new(balance: MemberBalance, names: &Names) -> Self {
        Self {
            name: names.get(balance.user_id),
            user_id: balance.user_id,
            net_balance: balance.net_balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MemberBalancesResponse {
    pub group_id: GroupId,
    pub members: Vec<MemberBalanceResponse>,
}

#[derive(Debug, Serialize)]
pub struct GroupStatsResponse {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub total_expenses: Money,
    pub user_balance: Money,
}

impl GroupStatsResponse {
    pub fn new(group_id: GroupId, user_id: UserId, stats: GroupStats) -> Self {
        Self {
            group_id,
            user_id,
            total_expenses: stats.total_expenses,
            user_balance: stats.user_balance,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutstandingResponse {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub has_balance: bool,
    pub balance: Money,
    pub debts: Vec<DebtResponse>,
}

impl OutstandingResponse {
    pub fn new(
        group_id: GroupId,
        user_id: UserId,
        outstanding: OutstandingBalance,
        names: &Names,
    ) -> Self {
        Self {
            group_id,
            user_id,
            has_balance: outstanding.has_balance,
            balance: outstanding.balance,
            debts: DebtResponse::list(&outstanding.debts, names),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupOutstandingResponse {
    pub group_id: GroupId,
    pub has_outstanding_balances: bool,
}
