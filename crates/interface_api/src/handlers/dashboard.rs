//! Dashboard handlers

use axum::{extract::State, Extension, Json};

use crate::auth::Claims;
use crate::dto::dashboard::DashboardStatsResponse;
use crate::{error::ApiError, AppState};

/// What the requesting user owes and is owed across all groups
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DashboardStatsResponse>, ApiError> {
    let user_id = claims.user_id()?;
    let summary = state.service.dashboard_summary(user_id).await?;
    Ok(Json(summary.into()))
}
