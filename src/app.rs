use axum::{
    routing::{get, patch},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::database::DatabaseManager;
use crate::handlers::drinks;
use crate::middleware::envelope_errors;

/// Builds the full application router with global middleware applied.
pub fn app() -> Router {
    let mut router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // Drinks menu
        .route("/drinks", get(drinks::list).post(drinks::create))
        .route("/drinks-detail", get(drinks::list_detail))
        .route("/drinks/:id", patch(drinks::update).delete(drinks::remove))
        // Every failure leaves through the same envelope, including
        // framework-generated 404/405 and body rejections.
        .layer(axum::middleware::map_response(envelope_errors))
        .layer(TraceLayer::new_for_http());

    if config::config().security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Coffeeshop API",
            "version": version,
            "description": "Drinks menu API with bearer-token permission tiers",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "drinks": "GET /drinks (public, short view)",
                "drinks_detail": "GET /drinks-detail (requires get:drinks-detail)",
                "drinks_create": "POST /drinks (requires post:drinks)",
                "drinks_update": "PATCH /drinks/:id (requires patch:drinks)",
                "drinks_delete": "DELETE /drinks/:id (requires delete:drinks)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": 503,
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
