use actix_web::{get, web, HttpResponse};
use std::sync::Arc;

use crate::state::AppState;
use crate::types::HealthResponse;

/// GET /api/health
#[get("/health")]
pub async fn health(state: web::Data<Arc<AppState>>) -> HttpResponse {
    let composer = state.composer.as_deref();

    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        model: composer.map(|c| c.model().to_string()),
        generation_configured: composer.is_some(),
        keywords_ready: state.keywords.check_ready().is_ok(),
    })
}
