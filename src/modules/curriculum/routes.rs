use axum::routing::get;
use axum::Router;

use super::handlers::{
    create_course, create_session, create_subject, delete_course, delete_session, delete_subject,
    get_course, get_session, get_subject, list_courses, list_sessions, list_subjects,
    update_course, update_session, update_subject,
};
use crate::app_state::AppState;

pub fn curriculum_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/subjects", get(list_subjects).post(create_subject))
        .route(
            "/subjects/{id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route("/sessions", get(list_sessions).post(create_session))
        .route(
            "/sessions/{id}",
            get(get_session).put(update_session).delete(delete_session),
        )
}
