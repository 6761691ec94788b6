use actix_web::{post, web, HttpResponse};
use contentgen_common::ContentGenError;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{required_text, KeywordsRequest, KeywordsResponse};

/// POST /api/extract-keywords
#[post("/extract-keywords")]
pub async fn extract_keywords(
    req: web::Json<KeywordsRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let content =
        required_text(&req.content).ok_or_else(|| ApiError::bad_request("Content is required"))?;

    let keywords = state
        .keywords
        .extract(content)
        .await
        .map_err(ContentGenError::from)?;

    Ok(HttpResponse::Ok().json(KeywordsResponse { keywords }))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::{app_state_with_keywords, call_json, Reply};
    use actix_web::http::StatusCode;
    use contentgen_keywords::KeywordExtractor;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    const MODEL_FILES: &[&str] = &["keyword_extractor_model.pkl", "keyword_mlb.pkl"];

    fn extractor(dir: &TempDir, script_body: &str, with_models: bool) -> KeywordExtractor {
        let script = dir.path().join("extract_keywords.sh");
        std::fs::write(&script, script_body).unwrap();
        let model_dir = dir.path().join("ml_models");
        std::fs::create_dir_all(&model_dir).unwrap();
        if with_models {
            for file in MODEL_FILES {
                std::fs::write(model_dir.join(file), b"model").unwrap();
            }
        }
        KeywordExtractor::new("/bin/sh", script, model_dir, MODEL_FILES, Duration::from_secs(10))
    }

    #[actix_web::test]
    async fn test_keywords_returned() {
        let dir = TempDir::new().unwrap();
        let state = app_state_with_keywords(
            Reply::Text("unused"),
            extractor(&dir, "echo '[\"finance\", \"growth\"]'\n", true),
        );

        let (status, body) =
            call_json(state, "/api/extract-keywords", json!({ "content": "earnings" })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "keywords": ["finance", "growth"] }));
    }

    #[actix_web::test]
    async fn test_missing_models() {
        let dir = TempDir::new().unwrap();
        let state = app_state_with_keywords(Reply::Text("unused"), extractor(&dir, "echo '[]'\n", false));

        let (status, body) =
            call_json(state, "/api/extract-keywords", json!({ "content": "earnings" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Keyword extraction model files are missing" })
        );
    }

    #[actix_web::test]
    async fn test_process_failure_hides_stderr() {
        let dir = TempDir::new().unwrap();
        let state = app_state_with_keywords(
            Reply::Text("unused"),
            extractor(&dir, "echo 'Traceback: /opt/secret' >&2\nexit 1\n", true),
        );

        let (status, body) =
            call_json(state, "/api/extract-keywords", json!({ "content": "earnings" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["error"].as_str().unwrap().contains("/opt/secret"));
    }

    #[actix_web::test]
    async fn test_missing_content() {
        let dir = TempDir::new().unwrap();
        let state = app_state_with_keywords(Reply::Text("unused"), extractor(&dir, "echo '[]'\n", true));

        let (status, body) = call_json(state, "/api/extract-keywords", json!({ "content": "" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Content is required" }));
    }
}
