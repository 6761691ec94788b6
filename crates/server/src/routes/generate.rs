use actix_web::{post, web, HttpResponse};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    required_text, GenerateRequest, GenerateResponse, TemplateRequest, TemplateResponse,
};

const GENERATION_FAILED: &str = "Failed to generate content. Please try again.";

/// POST /api/generate
#[post("/generate")]
pub async fn generate(
    req: web::Json<GenerateRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let composer = state.composer()?;
    let prompt =
        required_text(&req.prompt).ok_or_else(|| ApiError::bad_request("Content is required"))?;

    let content = composer
        .generate(prompt, required_text(&req.audience))
        .await
        .map_err(|e| ApiError::from_category(e, GENERATION_FAILED))?;

    Ok(HttpResponse::Ok().json(GenerateResponse { content }))
}

/// POST /api/generate-template
#[post("/generate-template")]
pub async fn generate_template(
    req: web::Json<TemplateRequest>,
    state: web::Data<Arc<AppState>>,
) -> Result<HttpResponse, ApiError> {
    let composer = state.composer()?;
    let ai_prompt = required_text(&req.ai_prompt)
        .ok_or_else(|| ApiError::bad_request("Content is required"))?;

    let output = composer
        .compose(&req.form, ai_prompt, required_text(&req.audience))
        .await
        .map_err(|e| ApiError::from_category(e, GENERATION_FAILED))?;

    Ok(HttpResponse::Ok().json(TemplateResponse { output }))
}
