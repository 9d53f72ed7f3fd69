use axum::routing::{get, post};
use axum::Router;

use super::handlers::{fetch_data, fetch_students, save_attendance, staff_stats, student_stats};
use crate::app_state::AppState;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/fetch-students", post(fetch_students))
        .route("/save", post(save_attendance))
        .route("/fetch-data", post(fetch_data))
        .route("/staff-stats", get(staff_stats))
        .route("/student-stats", get(student_stats))
}
