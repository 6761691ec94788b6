use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{required_text, SummarizeRequest, SummarizeResponse};

const SUMMARY_FAILED: &str = "Failed to generate summary. Please try again.";

/// POST /api/summarize
#[post("/summarize")]
pub async fn summarize(
    req: web::Json<SummarizeRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let composer = state.composer()?;
    let content =
        required_text(&req.content).ok_or_else(|| ApiError::bad_request("Content is required"))?;
    let length = req.length.unwrap_or_default();

    let summary = composer
        .summarize(content, length)
        .await
        .map_err(|e| ApiError::from_category(e, SUMMARY_FAILED))?;

    info!("Summary generated - {} chars", summary.len());
    Ok(HttpResponse::Ok().json(SummarizeResponse { summary }))
}
