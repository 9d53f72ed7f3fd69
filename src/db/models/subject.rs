use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
    pub course_id: i64,
    pub staff_user_id: i64,
}

/// Subject joined with its course and owning staff names for listings.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SubjectDetail {
    pub id: i64,
    pub name: String,
    pub course_id: i64,
    pub course_name: String,
    pub staff_user_id: i64,
    pub staff_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewSubject {
    #[validate(length(min = 1))]
    pub name: String,
    pub course_id: i64,
    pub staff_user_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubject {
    pub name: Option<String>,
    pub course_id: Option<i64>,
    pub staff_user_id: Option<i64>,
}
