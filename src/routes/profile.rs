use std::sync::Arc;

use actix_web::{get, put, web};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{User, UserRow};
use crate::types::profile::ProfileUpdate;
use crate::AppState;

#[get("/{user_id}")]
pub async fn get_profile(
    app_state: web::Data<Arc<AppState>>,
    _authenticated_user: AuthenticatedUser,
    user_id: web::Path<Uuid>,
) -> Result<web::Json<User>, ApiError> {
    let row = UserRow::get(&app_state.pool, user_id.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(web::Json(row.into_user()))
}

#[put("/{user_id}")]
pub async fn update_profile(
    app_state: web::Data<Arc<AppState>>,
    authenticated_user: AuthenticatedUser,
    user_id: web::Path<Uuid>,
    payload: web::Json<ProfileUpdate>,
) -> Result<web::Json<User>, ApiError> {
    let user_id = user_id.into_inner();

    // A session only edits its own profile.
    if authenticated_user.user_id != user_id {
        return Err(ApiError::Unauthorized(
            "Session token does not match user".to_string(),
        ));
    }

    let row = UserRow::update_profile(&app_state.pool, user_id, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(web::Json(row.into_user()))
}
