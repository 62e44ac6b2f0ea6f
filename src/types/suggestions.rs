use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestMaterialsRequest {
    /// Free-text feedback from the session, topics covered included.
    pub session_feedback: String,
    pub student_level: String,
    pub tutor_experience: String,
    /// The module or subject that was tutored.
    pub module: String,
}

/// Advisory output of the suggestion call. Never persisted; shape-checked
/// against exactly these three fields and nothing more.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningMaterialSuggestion {
    pub student_materials: Vec<String>,
    pub tutor_materials: Vec<String>,
    pub explanation: String,
}
