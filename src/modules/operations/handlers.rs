use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{
    ApplicantRole, FeedbackReplyPayload, LeaveActionPayload, LeaveStatus, NewFeedbackPayload,
    NewLeavePayload, SaveResultPayload,
};
use crate::db::repositories::{CurriculumRepository, OperationsRepository, UserRepository};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RoleProfile};

// Leave

pub async fn staff_leave_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let profile = auth.require_staff()?;
    let leaves =
        OperationsRepository::list_leaves_for(&state.db, ApplicantRole::Staff, profile.id).await?;
    Ok(Json(json!(leaves)))
}

pub async fn apply_staff_leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewLeavePayload>,
) -> AppResult<impl IntoResponse> {
    let profile = auth.require_staff()?;
    payload.validate()?;

    let leave = OperationsRepository::create_leave(
        &state.db,
        ApplicantRole::Staff,
        profile.id,
        &payload.leave_date,
        &payload.leave_message,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Leave applied successfully", "leave": leave })),
    ))
}

pub async fn student_leave_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let profile = auth.require_student()?;
    let leaves =
        OperationsRepository::list_leaves_for(&state.db, ApplicantRole::Student, profile.id)
            .await?;
    Ok(Json(json!(leaves)))
}

pub async fn apply_student_leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewLeavePayload>,
) -> AppResult<impl IntoResponse> {
    let profile = auth.require_student()?;
    payload.validate()?;

    let leave = OperationsRepository::create_leave(
        &state.db,
        ApplicantRole::Student,
        profile.id,
        &payload.leave_date,
        &payload.leave_message,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Leave applied successfully", "leave": leave })),
    ))
}

pub async fn list_all_leaves(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let leaves = OperationsRepository::list_all_leaves(&state.db).await?;
    Ok(Json(json!(leaves)))
}

/// Admin approves (1) or rejects (2) a leave request. A request may be
/// re-transitioned; the latest decision wins.
pub async fn leave_action(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<LeaveActionPayload>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    payload.validate()?;

    let status = LeaveStatus::try_from(payload.status)
        .ok()
        .filter(|s| matches!(s, LeaveStatus::Approved | LeaveStatus::Rejected))
        .ok_or_else(|| {
            AppError::Validation("status must be 1 (approved) or 2 (rejected)".to_string())
        })?;

    let updated =
        OperationsRepository::set_leave_status(&state.db, payload.leave_id, payload.role, status)
            .await?;
    if !updated {
        return Err(AppError::NotFound("Leave record not found".to_string()));
    }

    Ok(Json(json!({
        "message": format!("Leave status updated to {}", payload.status),
    })))
}

// Feedback

fn feedback_author(auth: &AuthUser) -> AppResult<(ApplicantRole, i64)> {
    match &auth.profile {
        RoleProfile::Staff(profile) => Ok((ApplicantRole::Staff, profile.id)),
        RoleProfile::Student(profile) => Ok((ApplicantRole::Student, profile.id)),
        RoleProfile::Admin(_) => Err(AppError::Authorization(
            "Only staff and students can submit feedback".to_string(),
        )),
    }
}

pub async fn feedback_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let (role, author_id) = feedback_author(&auth)?;
    let feedback = OperationsRepository::list_feedback_for(&state.db, role, author_id).await?;
    Ok(Json(json!(feedback)))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewFeedbackPayload>,
) -> AppResult<impl IntoResponse> {
    let (role, author_id) = feedback_author(&auth)?;
    payload.validate()?;

    let feedback =
        OperationsRepository::create_feedback(&state.db, role, author_id, &payload.feedback)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Feedback sent successfully", "feedback": feedback })),
    ))
}

pub async fn list_all_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let feedback = OperationsRepository::list_all_feedback(&state.db).await?;
    Ok(Json(json!(feedback)))
}

/// Admin reply; a repeated reply overwrites the previous one.
pub async fn reply_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<FeedbackReplyPayload>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    payload.validate()?;

    let updated = OperationsRepository::set_feedback_reply(
        &state.db,
        payload.id,
        payload.role,
        &payload.reply,
    )
    .await?;
    if !updated {
        return Err(AppError::NotFound("Feedback not found".to_string()));
    }

    Ok(Json(json!({ "message": "Reply submitted" })))
}

// Results

#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    pub subject_id: Option<i64>,
}

/// Staff record marks for students of a subject they own; one record per
/// (student, subject), saved again it upserts.
pub async fn save_result(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SaveResultPayload>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_staff()?;
    payload.validate()?;

    let subject = CurriculumRepository::get_subject(&state.db, payload.subject_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;
    if subject.staff_user_id != auth.user.id {
        return Err(AppError::Authorization(
            "You do not own this subject".to_string(),
        ));
    }

    UserRepository::student_overview(&state.db, payload.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student record not found".to_string()))?;

    let record = OperationsRepository::upsert_result(
        &state.db,
        payload.student_id,
        payload.subject_id,
        payload.exam_marks,
        payload.assignment_marks,
    )
    .await?;

    Ok(Json(json!({ "message": "Marks saved", "result": record })))
}

/// Students read their own report card; staff read one of their subjects.
pub async fn list_results(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ResultQuery>,
) -> AppResult<Json<serde_json::Value>> {
    match &auth.profile {
        RoleProfile::Student(profile) => {
            let results = OperationsRepository::results_for_student(&state.db, profile.id).await?;
            Ok(Json(json!(results)))
        }
        RoleProfile::Staff(_) => {
            let subject_id = query.subject_id.ok_or_else(|| {
                AppError::Validation("subject_id is required for staff".to_string())
            })?;
            let subject = CurriculumRepository::get_subject(&state.db, subject_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;
            if subject.staff_user_id != auth.user.id {
                return Err(AppError::Authorization(
                    "You do not own this subject".to_string(),
                ));
            }
            let results = OperationsRepository::results_for_subject(&state.db, subject_id).await?;
            Ok(Json(json!(results)))
        }
        RoleProfile::Admin(_) => Err(AppError::Authorization(
            "Only staff and students can read results".to_string(),
        )),
    }
}
