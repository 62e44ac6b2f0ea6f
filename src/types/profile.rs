use serde::Deserialize;
use utoipa::ToSchema;

/// Partial profile update. Email and role are deliberately absent: neither
/// is mutable through this path. Fields that do not belong to the stored
/// account kind are ignored on merge.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    // student fields
    pub program: Option<String>,
    pub level: Option<String>,
    pub difficult_subjects: Option<Vec<String>>,
    // tutor fields
    pub teachable_subjects: Option<Vec<String>>,
    pub experience: Option<String>,
    pub availability: Option<String>,
    pub bio: Option<String>,
}
