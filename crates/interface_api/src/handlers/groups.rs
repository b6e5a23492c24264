//! Group balance handlers
//!
//! Only current members of a group may read its balances.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::{GroupId, UserId};
use domain_ledger::roster;

use super::load_names;
use crate::auth::Claims;
use crate::dto::debt_parties;
use crate::dto::group::*;
use crate::{error::ApiError, AppState};

/// Resolves the requesting user and checks they belong to the group
///
/// Unknown groups are 404, non-members 403.
async fn authorize_member(
    state: &AppState,
    claims: &Claims,
    group_id: GroupId,
) -> Result<UserId, ApiError> {
    let user_id = claims.user_id()?;
    state.service.ledger().get_group(group_id).await?;

    let members = state.service.ledger().group_members(group_id).await?;
    if !roster(&members).contains(&user_id) {
        tracing::warn!(%group_id, %user_id, "Group access denied");
        return Err(ApiError::Forbidden(format!(
            "{user_id} is not a member of {group_id}"
        )));
    }
    Ok(user_id)
}

/// Simplified debts of a group
pub async fn get_balances(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupBalancesResponse>, ApiError> {
    let group_id = GroupId::from(id);
    authorize_member(&state, &claims, group_id).await?;

    let debts = state.service.compute_group_debts(group_id).await?;
    let names = load_names(&state, debt_parties(&debts)).await?;

    Ok(Json(GroupBalancesResponse {
        group_id,
        debts: DebtResponse::list(&debts, &names),
    }))
}

/// Net balance of every current member
pub async fn get_member_balances(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<MemberBalancesResponse>, ApiError> {
    let group_id = GroupId::from(id);
    authorize_member(&state, &claims, group_id).await?;

    let balances = state.service.compute_member_balances(group_id).await?;
    let names = load_names(&state, balances.iter().map(|b| b.user_id).collect()).await?;

    Ok(Json(MemberBalancesResponse {
        group_id,
        members: balances
            .into_iter()
            .map(|b| MemberBalanceResponse::new(b, &names))
            .collect(),
    }))
}

/// Group totals from the requesting user's point of view
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupStatsResponse>, ApiError> {
    let group_id = GroupId::from(id);
    let user_id = authorize_member(&state, &claims, group_id).await?;

    let stats = state.service.compute_group_stats(group_id, user_id).await?;
    Ok(Json(GroupStatsResponse::new(group_id, user_id, stats)))
}

/// Whether any member of the group still owes money
pub async fn get_outstanding(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupOutstandingResponse>, ApiError> {
    let group_id = GroupId::from(id);
    authorize_member(&state, &claims, group_id).await?;

    let has_outstanding_balances = state.service.has_any_outstanding_balances(group_id).await?;
    Ok(Json(GroupOutstandingResponse {
        group_id,
        has_outstanding_balances,
    }))
}

/// Whether one member still owes or is owed money
///
/// The member in the path may have left the group; the requester may not.
pub async fn get_member_outstanding(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<OutstandingResponse>, ApiError> {
    let group_id = GroupId::from(id);
    let user_id = UserId::from(user_id);
    authorize_member(&state, &claims, group_id).await?;

    let outstanding = state.service.has_outstanding_balance(group_id, user_id).await?;
    let names = load_names(&state, debt_parties(&outstanding.debts)).await?;

    Ok(Json(OutstandingResponse::new(group_id, user_id, outstanding, &names)))
}
