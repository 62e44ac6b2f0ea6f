use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionFeedback {
    pub request_id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub rating: i16,
    pub student_comments: Option<String>,
    pub tutor_comments: Option<String>,
    pub topics_covered: String,
    pub session_date: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackFilter {
    pub request_id: Option<Uuid>,
}
