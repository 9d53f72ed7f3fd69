use serde::{Deserialize, Serialize};
use validator::Validate;

/// Exactly one record per (student, subject); saving again upserts.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ResultRecord {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub exam_marks: f64,
    pub assignment_marks: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveResultPayload {
    pub student_id: i64,
    pub subject_id: i64,
    #[validate(range(min = 0.0))]
    pub exam_marks: f64,
    #[validate(range(min = 0.0))]
    pub assignment_marks: f64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ResultOverview {
    pub id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub subject_id: i64,
    pub subject_name: String,
    pub exam_marks: f64,
    pub assignment_marks: f64,
}
