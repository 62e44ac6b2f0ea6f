use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::types::feedback::CreateSessionFeedback;

/// Post-session feedback. One record per completed session is expected, but
/// neither the request reference nor uniqueness is checked on insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SessionFeedback {
    pub id: Uuid,
    pub request_id: Uuid,
    pub student_id: Uuid,
    pub tutor_id: Uuid,
    pub rating: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutor_comments: Option<String>,
    pub topics_covered: String,
    pub session_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl SessionFeedback {
    pub async fn create(pool: &PgPool, new_feedback: &CreateSessionFeedback) -> Result<Self> {
        let feedback = sqlx::query_as::<_, SessionFeedback>(
            r#"
            INSERT INTO session_feedbacks (
                id, request_id, student_id, tutor_id, rating,
                student_comments, tutor_comments, topics_covered,
                session_date, duration_minutes, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_feedback.request_id)
        .bind(new_feedback.student_id)
        .bind(new_feedback.tutor_id)
        .bind(new_feedback.rating)
        .bind(&new_feedback.student_comments)
        .bind(&new_feedback.tutor_comments)
        .bind(&new_feedback.topics_covered)
        .bind(new_feedback.session_date)
        .bind(new_feedback.duration_minutes)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(feedback)
    }

    pub async fn list(pool: &PgPool, request_id: Option<Uuid>) -> Result<Vec<Self>> {
        let feedbacks = match request_id {
            Some(request_id) => {
                sqlx::query_as::<_, SessionFeedback>(
                    "SELECT * FROM session_feedbacks WHERE request_id = $1 \
                     ORDER BY created_at DESC",
                )
                .bind(request_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SessionFeedback>(
                    "SELECT * FROM session_feedbacks ORDER BY created_at DESC",
                )
                .fetch_all(pool)
                .await?
            }
        };
        Ok(feedbacks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feedback_json_keeps_optionals_only_when_set() {
        let feedback = SessionFeedback {
            id: Uuid::new_v4(),
            request_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            tutor_id: Uuid::new_v4(),
            rating: 4,
            student_comments: Some("Très utile".to_string()),
            tutor_comments: None,
            topics_covered: "Espaces vectoriels".to_string(),
            session_date: Utc::now(),
            duration_minutes: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&feedback).unwrap();
        assert_eq!(value["rating"], json!(4));
        assert_eq!(value["studentComments"], json!("Très utile"));
        assert_eq!(value["topicsCovered"], json!("Espaces vectoriels"));
        assert!(value.get("tutorComments").is_none());
        assert!(value.get("durationMinutes").is_none());
    }
}
