use std::sync::Arc;

use actix_web::{post, web};
use anyhow::anyhow;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, ResponseFormat,
};
use tracing::{error, info};

use crate::error::ApiError;
use crate::prompts::Prompts;
use crate::types::suggestions::{LearningMaterialSuggestion, SuggestMaterialsRequest};
use crate::AppState;

const SUGGESTION_MODEL: &str = "gpt-4o-mini";

/// One round trip to the completion endpoint. The reply is shape-checked
/// against the three expected fields and returned as-is, never persisted.
#[post("")]
pub async fn suggest_materials(
    app_state: web::Data<Arc<AppState>>,
    payload: web::Json<SuggestMaterialsRequest>,
) -> Result<web::Json<LearningMaterialSuggestion>, ApiError> {
    let payload = payload.into_inner();
    info!("Suggesting materials for module: {}", payload.module);

    let request = CreateChatCompletionRequestArgs::default()
        .model(SUGGESTION_MODEL)
        .max_tokens(1024u32)
        .response_format(ResponseFormat::JsonObject)
        .messages([
            ChatCompletionRequestSystemMessageArgs::default()
                .content(Prompts::SUGGEST_MATERIALS_SYSTEM)
                .build()
                .map_err(|e| ApiError::Internal(anyhow!("invalid system message: {e}")))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(Prompts::suggest_materials(&payload))
                .build()
                .map_err(|e| ApiError::Internal(anyhow!("invalid user message: {e}")))?
                .into(),
        ])
        .build()
        .map_err(|e| ApiError::Internal(anyhow!("invalid completion request: {e}")))?;

    let response = app_state.oai_client.chat().create(request).await.map_err(|e| {
        error!("Suggestion call failed: {:?}", e);
        ApiError::Internal(anyhow!("suggestion call failed: {e}"))
    })?;

    let content = response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .ok_or_else(|| ApiError::Internal(anyhow!("empty completion response")))?;

    let suggestion = parse_suggestion(&content)?;
    Ok(web::Json(suggestion))
}

fn parse_suggestion(content: &str) -> Result<LearningMaterialSuggestion, ApiError> {
    serde_json::from_str(strip_code_fence(content)).map_err(|e| {
        error!("Malformed suggestion reply: {}", e);
        ApiError::Internal(anyhow!("malformed suggestion reply: {e}"))
    })
}

// Some models wrap JSON in a markdown fence despite the response format.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "studentMaterials": ["Khan Academy: eigenvalues"],
        "tutorMaterials": ["Socratic questioning techniques"],
        "explanation": "The student struggled with eigenvalues."
    }"#;

    #[test]
    fn plain_json_reply_parses() {
        let suggestion = parse_suggestion(REPLY).unwrap();
        assert_eq!(suggestion.student_materials.len(), 1);
        assert_eq!(suggestion.tutor_materials.len(), 1);
        assert!(suggestion.explanation.contains("eigenvalues"));
    }

    #[test]
    fn fenced_reply_parses_too() {
        let fenced = format!("```json\n{REPLY}\n```");
        assert!(parse_suggestion(&fenced).is_ok());
        let bare_fence = format!("```\n{REPLY}\n```");
        assert!(parse_suggestion(&bare_fence).is_ok());
    }

    #[test]
    fn missing_field_is_rejected() {
        let partial = r#"{"studentMaterials": [], "tutorMaterials": []}"#;
        assert!(parse_suggestion(partial).is_err());
    }

    #[test]
    fn empty_lists_are_a_valid_answer() {
        let empty = r#"{"studentMaterials": [], "tutorMaterials": [], "explanation": "Not enough information in the feedback."}"#;
        let suggestion = parse_suggestion(empty).unwrap();
        assert!(suggestion.student_materials.is_empty());
        assert!(suggestion.tutor_materials.is_empty());
    }
}
