use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use secrecy::ExposeSecret;
use serde_json::json;
use validator::Validate;

use crate::app_state::AppState;
use crate::auth::{jwt, password};
use crate::db::models::{
    LoginPayload, RegisterPayload, UpdateProfilePayload, UpdateStaffPayload, UpdateStudentPayload,
    UserRole,
};
use crate::db::repositories::{DashboardRepository, UserRepository};
use crate::db::DatabaseError;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, RoleProfile};

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    if payload.password.expose_secret().is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }

    let role = UserRole::from_email(&payload.email).ok_or_else(|| {
        AppError::Validation(
            "Invalid format. Email must include .hod, .staff, or .student before the @ \
             (e.g., alex.staff@domain.com)"
                .to_string(),
        )
    })?;

    if UserRepository::email_exists(&state.db, &payload.email).await? {
        return Err(AppError::Validation("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(payload.password.expose_secret())?;

    let mut tx = state.db.begin().await.map_err(DatabaseError::from)?;
    let user = UserRepository::create_user(
        &mut tx,
        &payload.email,
        &password_hash,
        &payload.first_name,
        &payload.last_name,
        role,
    )
    .await?;
    UserRepository::create_role_profile(&mut tx, user.id, role).await?;
    tx.commit().await.map_err(DatabaseError::from)?;

    tracing::info!(user_id = user.id, role = role.as_str(), "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "role": role,
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    // Identical response for unknown email and wrong password
    let invalid = || AppError::Authentication("Invalid credentials".to_string());

    let user = UserRepository::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(payload.password.expose_secret(), &user.password_hash) {
        return Err(invalid());
    }

    UserRepository::touch_last_login(&state.db, user.id).await?;

    let token = jwt::issue_token(
        user.id,
        user.role,
        &state.env.auth.jwt_secret,
        state.env.auth.token_ttl_minutes,
    )?;

    Ok(Json(json!({
        "access_token": token,
        "token_type": "Bearer",
        "role": user.role,
        "user": user,
        "message": "Login successful",
    })))
}

pub async fn logout(_auth: AuthUser) -> Json<serde_json::Value> {
    // Tokens are stateless; nothing to revoke server-side
    Json(json!({ "message": "Logged out successfully" }))
}

/// Role-dispatched landing view: each role gets its profile plus the
/// counts its dashboard cards are built from.
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let body = match &auth.profile {
        RoleProfile::Admin(profile) => {
            let counts = DashboardRepository::counts(&state.db).await?;
            json!({
                "my_profile": { "id": profile.id, "user": auth.user },
                "dashboard_stats": {
                    "total_students": counts.total_students,
                    "total_staffs": counts.total_staffs,
                },
                "role": UserRole::Admin,
            })
        }
        RoleProfile::Staff(profile) => {
            let cards =
                DashboardRepository::staff_cards(&state.db, auth.user.id, profile.id).await?;
            json!({
                "my_profile": {
                    "id": profile.id,
                    "address": profile.address,
                    "user": auth.user,
                },
                "cards": cards,
                "role": UserRole::Staff,
            })
        }
        RoleProfile::Student(profile) => json!({
            "my_profile": {
                "id": profile.id,
                "gender": profile.gender,
                "address": profile.address,
                "course_id": profile.course_id,
                "session_year_id": profile.session_year_id,
                "user": auth.user,
            },
            "role": UserRole::Student,
        }),
    };

    Ok(Json(body))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> AppResult<Json<serde_json::Value>> {
    payload.validate()?;

    let mut tx = state.db.begin().await.map_err(DatabaseError::from)?;
    UserRepository::update_names(
        &mut tx,
        auth.user.id,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?;

    match &auth.profile {
        RoleProfile::Admin(_) => {}
        RoleProfile::Staff(profile) => {
            UserRepository::update_staff_profile(&mut tx, profile.id, payload.address.as_deref())
                .await?;
        }
        RoleProfile::Student(profile) => {
            UserRepository::update_student_profile(
                &mut tx,
                profile.id,
                payload.gender.as_deref(),
                payload.address.as_deref(),
                None,
                None,
            )
            .await?;
        }
    }
    tx.commit().await.map_err(DatabaseError::from)?;

    Ok(Json(json!({ "message": "Profile updated successfully" })))
}

// Staff management (admin)

pub async fn list_staff(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let staff = UserRepository::list_staff(&state.db).await?;
    Ok(Json(json!(staff)))
}

pub async fn get_staff(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let staff = UserRepository::staff_overview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff record not found".to_string()))?;
    Ok(Json(json!(staff)))
}

pub async fn update_staff(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStaffPayload>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    payload.validate()?;

    let staff = UserRepository::staff_overview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff record not found".to_string()))?;

    let mut tx = state.db.begin().await.map_err(DatabaseError::from)?;
    UserRepository::update_names(
        &mut tx,
        staff.user_id,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?;
    UserRepository::update_staff_profile(&mut tx, id, payload.address.as_deref()).await?;
    tx.commit().await.map_err(DatabaseError::from)?;

    let updated = UserRepository::staff_overview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff record not found".to_string()))?;
    Ok(Json(json!(updated)))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;

    let staff = UserRepository::staff_overview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Staff record not found".to_string()))?;

    let mut tx = state.db.begin().await.map_err(DatabaseError::from)?;
    UserRepository::delete_user(&mut tx, staff.user_id).await?;
    tx.commit().await.map_err(DatabaseError::from)?;

    Ok(Json(json!({ "message": "Staff member deleted" })))
}

// Student management (admin)

pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let students = UserRepository::list_students(&state.db).await?;
    Ok(Json(json!(students)))
}

pub async fn get_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    let student = UserRepository::student_overview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student record not found".to_string()))?;
    Ok(Json(json!(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStudentPayload>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;
    payload.validate()?;

    let student = UserRepository::student_overview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student record not found".to_string()))?;

    let mut tx = state.db.begin().await.map_err(DatabaseError::from)?;
    UserRepository::update_names(
        &mut tx,
        student.user_id,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?;
    UserRepository::update_student_profile(
        &mut tx,
        id,
        payload.gender.as_deref(),
        payload.address.as_deref(),
        payload.course_id,
        payload.session_year_id,
    )
    .await?;
    tx.commit().await.map_err(DatabaseError::from)?;

    let updated = UserRepository::student_overview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student record not found".to_string()))?;
    Ok(Json(json!(updated)))
}

pub async fn delete_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;

    let student = UserRepository::student_overview(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student record not found".to_string()))?;

    let mut tx = state.db.begin().await.map_err(DatabaseError::from)?;
    UserRepository::delete_user(&mut tx, student.user_id).await?;
    tx.commit().await.map_err(DatabaseError::from)?;

    Ok(Json(json!({ "message": "Student deleted" })))
}
