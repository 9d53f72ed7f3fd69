use axum::routing::{get, post};
use axum::Router;

use super::handlers::{admin_stats, submit_contact};
use crate::app_state::AppState;

pub fn core_routes() -> Router<AppState> {
    Router::new()
        .route("/admin-stats", get(admin_stats))
        .route("/contact", post(submit_contact))
}
