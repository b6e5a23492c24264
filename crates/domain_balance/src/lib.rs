//! Balance Domain
//!
//! Derives who owes whom from a group's recorded expenses and settlements:
//! - Pairwise netting into at most one debt per pair of members
//! - Net balance per member
//! - Friend views across shared groups
//! - Group statistics, outstanding-balance checks and the dashboard summary
//!
//! Every computation is a pure function of the records it is given. The
//! `BalanceService` fetches those records through a `LedgerPort`.

pub mod aggregator;
pub mod error;
pub mod friends;
pub mod netting;
pub mod service;
pub mod stats;

pub use aggregator::{member_balances, net_position, MemberBalance};
pub use error::BalanceError;
pub use friends::{
    friend_balance, pair_position, shared_expenses, shared_group_ids, FriendBalance,
    FriendDetails, FriendSummary, GroupBalanceLine, GroupRecords, Page, SharedExpense,
    SharedGroup,
};
pub use netting::{net_debts, Debt, PairKey};
pub use service::BalanceService;
pub use stats::{
    dashboard_summary, group_stats, outstanding_balance, CounterpartyTotal, DashboardSummary,
    GroupStats, OutstandingBalance,
};
