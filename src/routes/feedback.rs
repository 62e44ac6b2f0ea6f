use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::error::ApiError;
use crate::models::SessionFeedback;
use crate::types::feedback::{CreateSessionFeedback, FeedbackFilter};
use crate::AppState;

#[post("")]
pub async fn create_feedback(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<CreateSessionFeedback>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    validate_feedback(&payload)?;

    let feedback = SessionFeedback::create(&app_state.pool, &payload).await?;
    Ok(HttpResponse::Created().json(feedback))
}

#[get("")]
pub async fn list_feedbacks(
    app_state: web::Data<Arc<AppState>>,
    filter: web::Query<FeedbackFilter>,
) -> Result<web::Json<Vec<SessionFeedback>>, ApiError> {
    let feedbacks = SessionFeedback::list(&app_state.pool, filter.request_id).await?;
    Ok(web::Json(feedbacks))
}

fn validate_feedback(payload: &CreateSessionFeedback) -> Result<(), ApiError> {
    if !(1..=5).contains(&payload.rating) {
        return Err(ApiError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    if payload.topics_covered.trim().is_empty() {
        return Err(ApiError::Validation(
            "Missing required fields for session feedback".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn valid_payload() -> CreateSessionFeedback {
        CreateSessionFeedback {
            request_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            tutor_id: Uuid::new_v4(),
            rating: 5,
            student_comments: None,
            tutor_comments: None,
            topics_covered: "Espaces vectoriels, applications linéaires".to_string(),
            session_date: Utc::now(),
            duration_minutes: Some(90),
        }
    }

    #[test]
    fn accepts_ratings_one_through_five() {
        for rating in 1..=5 {
            let payload = CreateSessionFeedback {
                rating,
                ..valid_payload()
            };
            assert!(validate_feedback(&payload).is_ok(), "rating {rating}");
        }
    }

    #[test]
    fn rejects_out_of_range_ratings() {
        for rating in [0, 6, -1] {
            let payload = CreateSessionFeedback {
                rating,
                ..valid_payload()
            };
            assert!(matches!(
                validate_feedback(&payload),
                Err(ApiError::Validation(_))
            ));
        }
    }

    #[test]
    fn rejects_blank_topics() {
        let payload = CreateSessionFeedback {
            topics_covered: "   ".to_string(),
            ..valid_payload()
        };
        assert!(matches!(
            validate_feedback(&payload),
            Err(ApiError::Validation(_))
        ));
    }
}
