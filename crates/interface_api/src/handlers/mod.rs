//! Request handlers

pub mod dashboard;
pub mod friends;
pub mod groups;
pub mod health;

use core_kernel::UserId;

use crate::dto::Names;
use crate::error::ApiError;
use crate::AppState;

/// Looks up display names for the given users
async fn load_names(state: &AppState, ids: Vec<UserId>) -> Result<Names, ApiError> {
    if ids.is_empty() {
        return Ok(Names::default());
    }
    let profiles = state.service.ledger().get_profiles(ids).await?;
    Ok(Names::from_profiles(profiles))
}
