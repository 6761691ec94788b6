use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{required_text, VariationsRequest, VariationsResponse};

const VARIATIONS_FAILED: &str = "Failed to generate variations. Please try again.";

/// POST /api/generate-variations
#[post("/generate-variations")]
pub async fn generate_variations(
    req: web::Json<VariationsRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let composer = state.composer()?;
    let content =
        required_text(&req.content).ok_or_else(|| ApiError::bad_request("Content is required"))?;

    let set = composer
        .variations(content)
        .await
        .map_err(|e| ApiError::from_category(e, VARIATIONS_FAILED))?;

    info!("Generated {} variations", set.len());
    Ok(HttpResponse::Ok().json(VariationsResponse {
        variations: set.into_texts(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_state, call_json, state_without_key, Reply};
    use actix_web::http::StatusCode;
    use contentgen_llm::UpstreamError;
    use serde_json::json;

    #[actix_web::test]
    async fn test_formal_then_conversational() {
        let (state, recorded) = app_state(Reply::Echo);

        let (status, body) = call_json(
            state,
            "/api/generate-variations",
            json!({ "content": "Launch day is Friday" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let variations = body["variations"].as_array().unwrap();
        assert_eq!(variations.len(), 2);
        assert!(variations[0].as_str().unwrap().contains("formal"));
        assert!(variations[1].as_str().unwrap().contains("conversational"));
        assert_eq!(recorded.lock().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_missing_content() {
        let (state, _) = app_state(Reply::Echo);
        let (status, body) = call_json(state, "/api/generate-variations", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Content is required" }));

        let (status, _) =
            call_json(state_without_key(), "/api/generate-variations", json!({})).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_unclassified_failure_uses_route_message() {
        let (state, _) = app_state(Reply::Fail(UpstreamError::Rejected {
            status: 400,
            message: "Request contains an invalid argument.".into(),
        }));

        let (status, body) =
            call_json(state, "/api/generate-variations", json!({ "content": "x" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": VARIATIONS_FAILED }));
    }
}
