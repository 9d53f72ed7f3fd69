use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StudentProfile {
    pub id: i64,
    pub user_id: i64,
    pub gender: String,
    pub address: String,
    pub course_id: Option<i64>,
    pub session_year_id: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StudentOverview {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub gender: String,
    pub address: String,
    pub course_id: Option<i64>,
    pub course_name: Option<String>,
    pub session_year_id: Option<i64>,
}

/// Admin update: names, profile fields, and curriculum placement.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStudentPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub course_id: Option<i64>,
    pub session_year_id: Option<i64>,
}
