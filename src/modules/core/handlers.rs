use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::NewContactPayload;
use crate::db::repositories::{DashboardRepository, OperationsRepository};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Top-level cards and chart slices for the HOD landing view. Counting
/// queries only; recomputed on every call.
pub async fn admin_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;

    let counts = DashboardRepository::counts(&state.db).await?;
    let subjects_per_course = DashboardRepository::subjects_per_course(&state.db).await?;
    let students_per_course = DashboardRepository::students_per_course(&state.db).await?;
    let students_per_subject = DashboardRepository::students_per_subject(&state.db).await?;

    let staff_student_ratio = vec![
        json!({ "name": "Students", "value": counts.total_students }),
        json!({ "name": "Staffs", "value": counts.total_staffs }),
    ];

    Ok(Json(json!({
        "cards": counts,
        "charts": {
            "staff_student_ratio": staff_student_ratio,
            "subjects_per_course": subjects_per_course,
            "students_per_course": students_per_course,
            "students_per_subject": students_per_subject,
        },
    })))
}

/// Landing page contact form; the one unauthenticated write endpoint.
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<NewContactPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let contact = OperationsRepository::create_contact(
        &state.db,
        &payload.name,
        &payload.email,
        &payload.message,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Message received", "contact": contact })),
    ))
}
