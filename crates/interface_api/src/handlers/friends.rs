//! Friend handlers

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::UserId;
use domain_balance::{FriendDetails, FriendSummary};

use super::load_names;
use crate::auth::Claims;
use crate::dto::friend::*;
use crate::{error::ApiError, AppState};

/// Everyone who shares a group with the requesting user
pub async fn list_friends(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<FriendSummary>>, ApiError> {
    let user_id = claims.user_id()?;
    Ok(Json(state.service.list_friends(user_id).await?))
}

/// A friend's profile and the groups shared with them
pub async fn get_friend_details(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<FriendDetails>, ApiError> {
    let user_id = claims.user_id()?;
    let friend_id = UserId::from(id);

    state
        .service
        .friend_details(user_id, friend_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Friend {friend_id} not found")))
}

/// Net balance with a friend across shared groups
pub async fn get_friend_balance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<FriendBalanceResponse>, ApiError> {
    let user_id = claims.user_id()?;
    let friend_id = UserId::from(id);

    let balance = state.service.compute_friend_balance(user_id, friend_id).await?;
    let names = load_names(&state, vec![friend_id]).await?;

    Ok(Json(FriendBalanceResponse::new(balance, &names)))
}

/// Expenses both users took part in, newest first
pub async fn list_shared_expenses(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Query(query): Query<SharedExpensesQuery>,
) -> Result<Json<SharedExpensesResponse>, ApiError> {
    query.validate()?;
    let user_id = claims.user_id()?;
    let friend_id = UserId::from(id);
    let page = query.page();

    let expenses = state
        .service
        .get_shared_transactions(user_id, friend_id, page)
        .await?;

    let mut payers: Vec<UserId> = expenses.iter().map(|e| e.paid_by).collect();
    payers.sort();
    payers.dedup();
    let names = load_names(&state, payers).await?;

    Ok(Json(SharedExpensesResponse {
        friend_id,
        limit: page.limit,
        offset: page.offset,
        expenses: expenses
            .into_iter()
            .map(|e| SharedExpenseResponse::new(e, &names))
            .collect(),
    }))
}
