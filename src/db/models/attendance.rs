use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use validator::Validate;

/// One taken-attendance event for a subject on a date within a session year.
/// Uniquely identified by (subject_id, attendance_date, session_year_id).
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AttendanceSession {
    pub id: i64,
    pub subject_id: i64,
    pub attendance_date: Date,
    pub session_year_id: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One present/absent mark per (student, attendance session).
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct AttendanceMark {
    pub id: i64,
    pub student_id: i64,
    pub attendance_session_id: i64,
    pub present: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RosterPayload {
    pub subject_id: i64,
    pub session_year_id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MarkEntry {
    pub student_id: i64,
    pub present: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SaveAttendancePayload {
    pub subject_id: i64,
    pub attendance_date: Date,
    pub session_year_id: i64,
    pub marks: Vec<MarkEntry>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FetchAttendancePayload {
    pub subject_id: i64,
    pub session_year_id: i64,
    pub attendance_date: Option<Date>,
}

/// Student eligible to be marked for a subject in a session year.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RosterStudent {
    pub id: i64,
    pub name: String,
}

/// Flattened (session, mark) row; mark columns are null for sessions
/// with no marks recorded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionMarkRow {
    pub session_id: i64,
    pub attendance_date: Date,
    pub student_id: Option<i64>,
    pub student_name: Option<String>,
    pub present: Option<bool>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SubjectSessionCount {
    pub subject_id: i64,
    pub subject_name: String,
    pub sessions_taken: i64,
}

/// Per-subject mark counts for one student.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubjectMarkCounts {
    pub subject_id: i64,
    pub subject_name: String,
    pub present: i64,
    pub total: i64,
}
