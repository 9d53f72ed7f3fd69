use axum::{extract::State, middleware, routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::request_span_middleware,
    modules::{
        accounts::routes::accounts_routes, attendance::routes::attendance_routes,
        core::routes::core_routes, curriculum::routes::curriculum_routes,
        operations::routes::operations_routes,
    },
};

pub fn create_router(state: AppState) -> Router {
    // The React client is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .nest("/accounts", accounts_routes())
        .nest("/curriculum", curriculum_routes())
        .nest("/attendance", attendance_routes())
        .nest("/operations", operations_routes())
        .nest("/core", core_routes())
        .layer(middleware::from_fn(request_span_middleware))
        .layer(cors)
        .with_state(state)
}

async fn hello() -> &'static str {
    "CMS Backend says hello!\n"
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();

    Json(json!({
        "status": "ok",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
