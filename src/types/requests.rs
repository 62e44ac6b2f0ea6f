use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::RequestStatus;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTutoringRequest {
    pub student_id: Uuid,
    pub student_name: String,
    pub subject: String,
    pub level: String,
    pub description: String,
    pub student_availability: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFilter {
    pub student_id: Option<Uuid>,
    pub tutor_id: Option<Uuid>,
    pub status: Option<RequestStatus>,
}

/// The only fields a matching flow ever touches. Provided values are applied
/// verbatim, absent ones left alone.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTutoringRequest {
    pub status: Option<RequestStatus>,
    pub tutor_id: Option<Uuid>,
    pub tutor_name: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl UpdateTutoringRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.tutor_id.is_none()
            && self.tutor_name.is_none()
            && self.scheduled_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_accepts_partial_camel_case_json() {
        let update: UpdateTutoringRequest = serde_json::from_str(
            r#"{"tutorId":"7f1a58f6-5f19-4d3e-9be2-6be7a9e43e7a","tutorName":"Bob","status":"matched"}"#,
        )
        .unwrap();
        assert_eq!(update.status, Some(RequestStatus::Matched));
        assert_eq!(update.tutor_name.as_deref(), Some("Bob"));
        assert!(update.scheduled_time.is_none());
        assert!(!update.is_empty());
    }

    #[test]
    fn empty_update_is_detected() {
        let update: UpdateTutoringRequest = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
    }
}
