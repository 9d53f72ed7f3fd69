use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    delete_staff, delete_student, get_profile, get_staff, get_student, list_staff, list_students,
    login, logout, register, update_profile, update_staff, update_student,
};
use crate::app_state::AppState;

pub fn accounts_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/staff", get(list_staff))
        .route(
            "/staff/{id}",
            get(get_staff).put(update_staff).delete(delete_staff),
        )
        .route("/students", get(list_students))
        .route(
            "/students/{id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}
