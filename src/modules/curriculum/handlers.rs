use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{
    NewCourse, NewSessionYear, NewSubject, UpdateCourse, UpdateSessionYear, UpdateSubject, UserRole,
};
use crate::db::repositories::{CurriculumRepository, SubjectScope, UserRepository};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RoleProfile};

// Courses

pub async fn list_courses(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let courses = CurriculumRepository::list_courses(&state.db).await?;
    Ok(Json(json!(courses)))
}

pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewCourse>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;
    payload.validate()?;
    let course = CurriculumRepository::create_course(&state.db, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(json!(course))))
}

pub async fn get_course(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let course = CurriculumRepository::get_course(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    Ok(Json(json!(course)))
}

pub async fn update_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCourse>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    payload.validate()?;
    let course = CurriculumRepository::update_course(&state.db, id, &payload.name)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    Ok(Json(json!(course)))
}

pub async fn delete_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    if !CurriculumRepository::delete_course(&state.db, id).await? {
        return Err(AppError::NotFound("Course not found".to_string()));
    }
    Ok(Json(json!({ "message": "Course deleted" })))
}

// Session years

pub async fn list_sessions(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let sessions = CurriculumRepository::list_session_years(&state.db).await?;
    Ok(Json(json!(sessions)))
}

pub async fn create_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewSessionYear>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;
    payload.validate()?;
    if payload.end_date < payload.start_date {
        return Err(AppError::Validation(
            "end_date must not precede start_date".to_string(),
        ));
    }
    let session =
        CurriculumRepository::create_session_year(&state.db, payload.start_date, payload.end_date)
            .await?;
    Ok((StatusCode::CREATED, Json(json!(session))))
}

pub async fn get_session(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let session = CurriculumRepository::get_session_year(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session year not found".to_string()))?;
    Ok(Json(json!(session)))
}

pub async fn update_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSessionYear>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    payload.validate()?;
    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
        if end < start {
            return Err(AppError::Validation(
                "end_date must not precede start_date".to_string(),
            ));
        }
    }
    let session =
        CurriculumRepository::update_session_year(&state.db, id, payload.start_date, payload.end_date)
            .await?
            .ok_or_else(|| AppError::NotFound("Session year not found".to_string()))?;
    Ok(Json(json!(session)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    if !CurriculumRepository::delete_session_year(&state.db, id).await? {
        return Err(AppError::NotFound("Session year not found".to_string()));
    }
    Ok(Json(json!({ "message": "Session year deleted" })))
}

// Subjects

/// Listing is narrowed by role in the query itself: admins see all subjects,
/// staff only those they own, students only those of their course.
pub async fn list_subjects(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let scope = subject_scope(&auth);
    let subjects = CurriculumRepository::list_subjects(&state.db, scope).await?;
    Ok(Json(json!(subjects)))
}

pub async fn create_subject(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewSubject>,
) -> AppResult<impl IntoResponse> {
    auth.require_admin()?;
    payload.validate()?;

    let owner = UserRepository::find_by_id(&state.db, payload.staff_user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Owning staff user not found".to_string()))?;
    if owner.role != UserRole::Staff {
        return Err(AppError::Validation(
            "staff_user_id must reference a staff user".to_string(),
        ));
    }

    let subject = CurriculumRepository::create_subject(
        &state.db,
        &payload.name,
        payload.course_id,
        payload.staff_user_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(json!(subject))))
}

pub async fn get_subject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let subject = CurriculumRepository::get_subject_detail(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;

    // Out-of-scope subjects are indistinguishable from missing ones
    let visible = match &auth.profile {
        RoleProfile::Admin(_) => true,
        RoleProfile::Staff(_) => subject.staff_user_id == auth.user.id,
        RoleProfile::Student(profile) => profile.course_id == Some(subject.course_id),
    };
    if !visible {
        return Err(AppError::NotFound("Subject not found".to_string()));
    }

    Ok(Json(json!(subject)))
}

pub async fn update_subject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSubject>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    payload.validate()?;

    if let Some(staff_user_id) = payload.staff_user_id {
        let owner = UserRepository::find_by_id(&state.db, staff_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Owning staff user not found".to_string()))?;
        if owner.role != UserRole::Staff {
            return Err(AppError::Validation(
                "staff_user_id must reference a staff user".to_string(),
            ));
        }
    }

    let subject = CurriculumRepository::update_subject(
        &state.db,
        id,
        payload.name.as_deref(),
        payload.course_id,
        payload.staff_user_id,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;
    Ok(Json(json!(subject)))
}

pub async fn delete_subject(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    if !CurriculumRepository::delete_subject(&state.db, id).await? {
        return Err(AppError::NotFound("Subject not found".to_string()));
    }
    Ok(Json(json!({ "message": "Subject deleted" })))
}

fn subject_scope(auth: &AuthUser) -> SubjectScope {
    match &auth.profile {
        RoleProfile::Admin(_) => SubjectScope::All,
        RoleProfile::Staff(_) => SubjectScope::OwnedBy(auth.user.id),
        RoleProfile::Student(profile) => match profile.course_id {
            Some(course_id) => SubjectScope::InCourse(course_id),
            None => SubjectScope::Unplaced,
        },
    }
}
