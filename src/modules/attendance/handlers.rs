use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{FetchAttendancePayload, RosterPayload, SaveAttendancePayload, Subject};
use crate::db::repositories::{AttendanceRepository, CurriculumRepository};
use crate::db::DatabaseError;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RoleProfile};

/// present / total × 100, rounded to 2 decimal places; 0 when there are no
/// marks at all.
pub(crate) fn percentage(present: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = present as f64 / total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Subject resolution shared by the read paths: the owning staff member and
/// admins may look at a subject's attendance.
async fn readable_subject(
    state: &AppState,
    auth: &AuthUser,
    subject_id: i64,
) -> AppResult<Subject> {
    let subject = CurriculumRepository::get_subject(&state.db, subject_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subject not found".to_string()))?;

    match &auth.profile {
        RoleProfile::Admin(_) => Ok(subject),
        RoleProfile::Staff(_) if subject.staff_user_id == auth.user.id => Ok(subject),
        RoleProfile::Staff(_) => Err(AppError::Authorization(
            "You do not own this subject".to_string(),
        )),
        RoleProfile::Student(_) => Err(AppError::Authorization(
            "Staff access required".to_string(),
        )),
    }
}

/// Students eligible to be marked for (subject, session year): enrolled in
/// the subject's course for that session year.
pub async fn fetch_students(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RosterPayload>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    let subject = readable_subject(&state, &auth, payload.subject_id).await?;

    CurriculumRepository::get_session_year(&state.db, payload.session_year_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session year not found".to_string()))?;

    let students =
        AttendanceRepository::roster(&state.db, subject.course_id, payload.session_year_id)
            .await?;
    Ok(Json(json!(students)))
}

/// Bulk save: upsert the session keyed by (subject, date, session year), then
/// one mark per student. Re-saving the same triple converges to the latest
/// input. Entries naming an unknown student fail individually and are
/// reported back; everything else still lands.
pub async fn save_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SaveAttendancePayload>,
) -> AppResult<impl IntoResponse> {
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

    CurriculumRepository::get_session_year(&state.db, payload.session_year_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session year not found".to_string()))?;

    let mut tx = state.db.begin().await.map_err(DatabaseError::from)?;
    let session = AttendanceRepository::upsert_session(
        &mut tx,
        payload.subject_id,
        payload.attendance_date,
        payload.session_year_id,
    )
    .await?;

    let mut saved = 0usize;
    let mut failed = Vec::new();
    for entry in &payload.marks {
        if AttendanceRepository::student_exists(&mut tx, entry.student_id).await? {
            AttendanceRepository::upsert_mark(&mut tx, entry.student_id, session.id, entry.present)
                .await?;
            saved += 1;
        } else {
            failed.push(json!({
                "student_id": entry.student_id,
                "error": "invalid student",
            }));
        }
    }
    tx.commit().await.map_err(DatabaseError::from)?;

    tracing::info!(
        attendance_id = session.id,
        saved,
        failed = failed.len(),
        "attendance saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Attendance saved successfully",
            "attendance_id": session.id,
            "saved": saved,
            "failed": failed,
        })),
    ))
}

/// Sessions with their marks for (subject, session year), optionally one date.
pub async fn fetch_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<FetchAttendancePayload>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;
    readable_subject(&state, &auth, payload.subject_id).await?;

    let rows = AttendanceRepository::session_rows(
        &state.db,
        payload.subject_id,
        payload.session_year_id,
        payload.attendance_date,
    )
    .await?;

    // Rows arrive ordered by date; (subject, date, session year) is unique,
    // so one session's rows are contiguous.
    #[derive(serde::Serialize)]
    struct SessionView {
        id: i64,
        attendance_date: time::Date,
        marks: Vec<serde_json::Value>,
    }

    let mut sessions: Vec<SessionView> = Vec::new();
    for row in rows {
        if sessions.last().map(|s| s.id) != Some(row.session_id) {
            sessions.push(SessionView {
                id: row.session_id,
                attendance_date: row.attendance_date,
                marks: Vec::new(),
            });
        }
        if let (Some(session), Some(student_id), Some(present)) =
            (sessions.last_mut(), row.student_id, row.present)
        {
            session.marks.push(json!({
                "student_id": student_id,
                "name": row.student_name,
                "present": present,
            }));
        }
    }

    Ok(Json(json!(sessions)))
}

/// Sessions taken by this staff member, total and per subject.
pub async fn staff_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_staff()?;

    let per_subject = AttendanceRepository::staff_session_counts(&state.db, auth.user.id).await?;
    let total_sessions: i64 = per_subject.iter().map(|c| c.sessions_taken).sum();

    Ok(Json(json!({
        "total_sessions": total_sessions,
        "per_subject": per_subject,
    })))
}

/// Present/absent breakdown per subject of the student's course, plus the
/// overall rollup. Recomputed from current records on every call.
pub async fn student_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let profile = auth.require_student()?;

    let counts = match profile.course_id {
        Some(course_id) => {
            AttendanceRepository::student_mark_counts(&state.db, profile.id, course_id).await?
        }
        None => Vec::new(),
    };

    let mut overall_present = 0i64;
    let mut overall_total = 0i64;
    let per_subject: Vec<serde_json::Value> = counts
        .into_iter()
        .map(|c| {
            overall_present += c.present;
            overall_total += c.total;
            json!({
                "subject_id": c.subject_id,
                "subject_name": c.subject_name,
                "present": c.present,
                "absent": c.total - c.present,
                "total": c.total,
                "percentage": percentage(c.present, c.total),
            })
        })
        .collect();

    Ok(Json(json!({
        "overall": {
            "present": overall_present,
            "absent": overall_total - overall_present,
            "total": overall_total,
            "percentage": percentage(overall_present, overall_total),
        },
        "per_subject": per_subject,
    })))
}
