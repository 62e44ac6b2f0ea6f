use std::sync::Arc;

use actix_web::{get, web};

use crate::error::ApiError;
use crate::models::{User, UserRow};
use crate::AppState;

/// Every tutor record, unfiltered. Subject matching happens client-side
/// against the full set.
#[get("/tutors")]
pub async fn list_tutors(
    app_state: web::Data<Arc<AppState>>,
) -> Result<web::Json<Vec<User>>, ApiError> {
    let tutors = UserRow::list_tutors(&app_state.pool)
        .await?
        .into_iter()
        .map(UserRow::into_user)
        .collect();
    Ok(web::Json(tutors))
}
