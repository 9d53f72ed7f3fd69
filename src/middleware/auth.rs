use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::app_state::AppState;
use crate::auth::jwt;
use crate::db::models::{AdminProfile, StaffProfile, StudentProfile, User, UserRole};
use crate::db::repositories::UserRepository;
use crate::error::{AppError, AppResult};

/// The caller's role profile, resolved once per request and carried in the
/// request context so handlers never re-derive it.
#[derive(Debug, Clone)]
pub enum RoleProfile {
    Admin(AdminProfile),
    Staff(StaffProfile),
    Student(StudentProfile),
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub profile: RoleProfile,
}

impl AuthUser {
    pub fn require_admin(&self) -> AppResult<&AdminProfile> {
        match &self.profile {
            RoleProfile::Admin(profile) => Ok(profile),
            _ => Err(AppError::Authorization("Admin access required".to_string())),
        }
    }

    pub fn require_staff(&self) -> AppResult<&StaffProfile> {
        match &self.profile {
            RoleProfile::Staff(profile) => Ok(profile),
            _ => Err(AppError::Authorization("Staff access required".to_string())),
        }
    }

    pub fn require_student(&self) -> AppResult<&StudentProfile> {
        match &self.profile {
            RoleProfile::Student(profile) => Ok(profile),
            _ => Err(AppError::Authorization(
                "Student access required".to_string(),
            )),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Malformed authorization header".to_string()))?;

        let claims = jwt::decode_token(token, &state.env.auth.jwt_secret)?;

        let user = UserRepository::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| AppError::Authentication("Unknown user".to_string()))?;

        let profile = match user.role {
            UserRole::Admin => UserRepository::admin_profile_by_user(&state.db, user.id)
                .await?
                .map(RoleProfile::Admin),
            UserRole::Staff => UserRepository::staff_profile_by_user(&state.db, user.id)
                .await?
                .map(RoleProfile::Staff),
            UserRole::Student => UserRepository::student_profile_by_user(&state.db, user.id)
                .await?
                .map(RoleProfile::Student),
        }
        .ok_or_else(|| AppError::Authentication("Role profile not found".to_string()))?;

        Ok(AuthUser { user, profile })
    }
}
