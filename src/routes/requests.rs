use std::sync::Arc;

use actix_web::{get, post, put, web, HttpResponse};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::TutoringRequest;
use crate::types::requests::{CreateTutoringRequest, RequestFilter, UpdateTutoringRequest};
use crate::AppState;

#[post("")]
pub async fn create_request(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<CreateTutoringRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    if payload.student_name.trim().is_empty()
        || payload.subject.trim().is_empty()
        || payload.level.trim().is_empty()
        || payload.description.trim().is_empty()
        || payload.student_availability.trim().is_empty()
    {
        return Err(ApiError::Validation(
            "Missing required fields for tutoring request".to_string(),
        ));
    }

    let request = TutoringRequest::create(&app_state.pool, &payload).await?;
    Ok(HttpResponse::Created().json(request))
}

#[get("")]
pub async fn list_requests(
    app_state: web::Data<Arc<AppState>>,
    filter: web::Query<RequestFilter>,
) -> Result<web::Json<Vec<TutoringRequest>>, ApiError> {
    let requests = TutoringRequest::list(&app_state.pool, &filter).await?;
    Ok(web::Json(requests))
}

#[get("/{request_id}")]
pub async fn get_request(
    app_state: web::Data<Arc<AppState>>,
    request_id: web::Path<Uuid>,
) -> Result<web::Json<TutoringRequest>, ApiError> {
    let request = TutoringRequest::get(&app_state.pool, request_id.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Tutoring request not found".to_string()))?;
    Ok(web::Json(request))
}

#[put("/{request_id}")]
pub async fn update_request(
    app_state: web::Data<Arc<AppState>>,
    request_id: web::Path<Uuid>,
    payload: web::Json<UpdateTutoringRequest>,
) -> Result<web::Json<TutoringRequest>, ApiError> {
    let request = TutoringRequest::update(&app_state.pool, request_id.into_inner(), &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tutoring request not found".to_string()))?;
    Ok(web::Json(request))
}
