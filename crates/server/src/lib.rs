//! ContentGen HTTP server
//!
//! Actix-web REST API in front of the generation composer and the keyword
//! extraction process.

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use contentgen_common::{AppConfig, ContentGenError, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use crate::error::ApiError;
use crate::state::AppState;

const INVALID_BODY: &str = "Invalid request body";

/// Register the `/api` scope and its JSON body handling
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default().error_handler(|err, req| {
        warn!("Rejected request body for {}: {}", req.path(), err);
        ApiError::bad_request(INVALID_BODY).into()
    });

    cfg.service(
        web::scope("/api")
            .app_data(json)
            .service(routes::summarize::summarize)
            .service(routes::variations::generate_variations)
            .service(routes::keywords::extract_keywords)
            .service(routes::generate::generate)
            .service(routes::generate::generate_template)
            .service(routes::system::health),
    );
}

/// Build application state and serve until shutdown
pub async fn start_server(config: AppConfig) -> Result<()> {
    let bind_addr = config.server_bind_address();
    let state = Arc::new(AppState::new(config)?);
    let shared = state.clone();

    info!("Starting HTTP server on {}", bind_addr);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(shared.clone()))
            .configure(configure)
    })
    .bind(&bind_addr)
    .map_err(|e| ContentGenError::config(format!("Failed to bind {}: {}", bind_addr, e)))?
    .run();

    let result = server.await;

    if let Some(composer) = &state.composer {
        composer.cancel_all();
    }
    info!("HTTP server stopped");

    result.map_err(ContentGenError::from)
}
