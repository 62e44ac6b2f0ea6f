use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::requests::{CreateTutoringRequest, RequestFilter, UpdateTutoringRequest};

/// Lifecycle of a tutoring request. The field is plain data: callers may set
/// any value through `update`, there is no transition table (observed
/// contract of the matching flow, which is entirely client-driven).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Matched,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TutoringRequest {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub subject: String,
    pub level: String,
    pub description: String,
    pub student_availability: String,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutor_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TutoringRequest {
    /// Inserts a new request. Status is forced to `pending` no matter what
    /// the caller sent.
    pub async fn create(pool: &PgPool, new_request: &CreateTutoringRequest) -> Result<Self> {
        let request = sqlx::query_as::<_, TutoringRequest>(
            r#"
            INSERT INTO tutoring_requests (
                id, student_id, student_name, subject, level,
                description, student_availability, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_request.student_id)
        .bind(&new_request.student_name)
        .bind(&new_request.subject)
        .bind(&new_request.level)
        .bind(&new_request.description)
        .bind(&new_request.student_availability)
        .bind(RequestStatus::Pending)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(request)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let request =
            sqlx::query_as::<_, TutoringRequest>("SELECT * FROM tutoring_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(request)
    }

    /// Filtered listing: every provided filter key must match (logical AND),
    /// newest first. No filter returns the full set.
    pub async fn list(pool: &PgPool, filter: &RequestFilter) -> Result<Vec<Self>> {
        let mut query = Self::list_query(filter);
        let requests = query
            .build_query_as::<TutoringRequest>()
            .fetch_all(pool)
            .await?;
        Ok(requests)
    }

    fn list_query(filter: &RequestFilter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT * FROM tutoring_requests");
        let mut prefix = " WHERE ";

        if let Some(student_id) = filter.student_id {
            builder.push(prefix).push("student_id = ").push_bind(student_id);
            prefix = " AND ";
        }
        if let Some(tutor_id) = filter.tutor_id {
            builder.push(prefix).push("tutor_id = ").push_bind(tutor_id);
            prefix = " AND ";
        }
        if let Some(status) = filter.status {
            builder.push(prefix).push("status = ").push_bind(status);
        }

        builder.push(" ORDER BY created_at DESC");
        builder
    }

    /// Applies only the provided fields, verbatim. A request can be moved
    /// straight from `pending` to `completed`; nothing here objects. An
    /// empty partial returns the stored record unchanged.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        update: &UpdateTutoringRequest,
    ) -> Result<Option<Self>> {
        if update.is_empty() {
            return Self::get(pool, id).await;
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE tutoring_requests SET ");
        let mut fields = builder.separated(", ");

        if let Some(status) = update.status {
            fields.push("status = ");
            fields.push_bind_unseparated(status);
        }
        if let Some(tutor_id) = update.tutor_id {
            fields.push("tutor_id = ");
            fields.push_bind_unseparated(tutor_id);
        }
        if let Some(tutor_name) = &update.tutor_name {
            fields.push("tutor_name = ");
            fields.push_bind_unseparated(tutor_name.clone());
        }
        if let Some(scheduled_time) = update.scheduled_time {
            fields.push("scheduled_time = ");
            fields.push_bind_unseparated(scheduled_time);
        }

        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let request = builder
            .build_query_as::<TutoringRequest>()
            .fetch_optional(pool)
            .await?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(RequestStatus::Pending).unwrap(),
            json!("pending")
        );
        assert_eq!(
            serde_json::from_value::<RequestStatus>(json!("cancelled")).unwrap(),
            RequestStatus::Cancelled
        );
        assert!(serde_json::from_value::<RequestStatus>(json!("archived")).is_err());
    }

    #[test]
    fn empty_filter_lists_everything_newest_first() {
        let query = TutoringRequest::list_query(&RequestFilter::default());
        assert_eq!(
            query.sql(),
            "SELECT * FROM tutoring_requests ORDER BY created_at DESC"
        );
    }

    #[test]
    fn provided_filter_keys_are_and_composed() {
        let filter = RequestFilter {
            student_id: Some(Uuid::new_v4()),
            tutor_id: None,
            status: Some(RequestStatus::Pending),
        };
        let query = TutoringRequest::list_query(&filter);
        assert_eq!(
            query.sql(),
            "SELECT * FROM tutoring_requests WHERE student_id = $1 AND status = $2 \
             ORDER BY created_at DESC"
        );
    }

    #[test]
    fn request_json_uses_camel_case_and_omits_unset_tutor_fields() {
        let request = TutoringRequest {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            student_name: "Alice".to_string(),
            subject: "Algebra".to_string(),
            level: "2nd year".to_string(),
            description: "Linear maps".to_string(),
            student_availability: "Mardi et Jeudi après 17h".to_string(),
            status: RequestStatus::Pending,
            tutor_id: None,
            tutor_name: None,
            scheduled_time: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["studentName"], json!("Alice"));
        assert_eq!(value["status"], json!("pending"));
        assert!(value.get("tutorId").is_none());
        assert!(value.get("scheduledTime").is_none());
        assert!(value.get("createdAt").is_some());
    }
}
