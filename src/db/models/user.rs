use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Staff,
    Student,
}

impl UserRole {
    /// Role token is the second dot-separated segment of the email local part,
    /// e.g. `alex.staff@domain.com` registers as Staff.
    pub fn from_email(email: &str) -> Option<Self> {
        let local = email.split('@').next()?;
        let token = local.split('.').nth(1)?;
        match token.to_lowercase().as_str() {
            "hod" => Some(UserRole::Admin),
            "staff" => Some(UserRole::Staff),
            "student" => Some(UserRole::Student),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Staff => "staff",
            UserRole::Student => "student",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub last_login_at: Option<OffsetDateTime>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AdminProfile {
    pub id: i64,
    pub user_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(email)]
    pub email: String,
    pub password: SecretBox<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email)]
    pub email: String,
    pub password: SecretBox<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfilePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_token_maps_to_roles() {
        assert_eq!(
            UserRole::from_email("alice.student@x.com"),
            Some(UserRole::Student)
        );
        assert_eq!(UserRole::from_email("bob.hod@x.com"), Some(UserRole::Admin));
        assert_eq!(
            UserRole::from_email("carol.STAFF@x.com"),
            Some(UserRole::Staff)
        );
    }

    #[test]
    fn unknown_or_missing_token_is_rejected() {
        assert_eq!(UserRole::from_email("dave@x.com"), None);
        assert_eq!(UserRole::from_email("eve.teacher@x.com"), None);
    }
}
