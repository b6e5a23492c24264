//! Dashboard DTOs

use serde::Serialize;

use core_kernel::Money;
use domain_balance::{CounterpartyTotal, DashboardSummary};

/// Totals of what the requesting user owes and is owed
#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub you_owe: Money,
    pub youre_owed: Money,
    pub net_balance: Money,
    pub active_groups: usize,
    pub you_owe_details: Vec<CounterpartyTotal>,
    pub youre_owed_details: Vec<CounterpartyTotal>,
}

impl From<DashboardSummary> for DashboardStatsResponse {
    fn from(summary: DashboardSummary) -> Self {
        Self {
            net_balance: summary.youre_owed - summary.you_owe,
            you_owe: summary.you_owe,
            youre_owed: summary.youre_owed,
            active_groups: summary.active_groups,
            you_owe_details: summary.you_owe_details,
            youre_owed_details: summary.youre_owed_details,
        }
    }
}
