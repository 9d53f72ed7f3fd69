use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    apply_staff_leave, apply_student_leave, feedback_history, leave_action, list_all_feedback,
    list_all_leaves, list_results, reply_feedback, save_result, staff_leave_history,
    student_leave_history, submit_feedback,
};
use crate::app_state::AppState;

pub fn operations_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/leave/staff",
            get(staff_leave_history).post(apply_staff_leave),
        )
        .route(
            "/leave/student",
            get(student_leave_history).post(apply_student_leave),
        )
        .route("/leave", get(list_all_leaves))
        .route("/leave/action", post(leave_action))
        .route("/feedback", get(feedback_history).post(submit_feedback))
        .route(
            "/feedback/admin",
            get(list_all_feedback).post(reply_feedback),
        )
        .route("/manage-results", get(list_results).post(save_result))
}
