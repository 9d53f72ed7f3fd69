use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

/// Which role profile a leave request or feedback message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicantRole {
    Staff,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[repr(i32)]
#[serde(try_from = "i32", into = "i32")]
pub enum LeaveStatus {
    Pending = 0,
    Approved = 1,
    Rejected = 2,
}

impl From<LeaveStatus> for i32 {
    fn from(status: LeaveStatus) -> i32 {
        status as i32
    }
}

impl TryFrom<i32> for LeaveStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(LeaveStatus::Pending),
            1 => Ok(LeaveStatus::Approved),
            2 => Ok(LeaveStatus::Rejected),
            other => Err(format!("invalid leave status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct LeaveRequest {
    pub id: i64,
    pub applicant_role: ApplicantRole,
    pub applicant_id: i64,
    pub leave_date: String,
    pub message: String,
    pub status: LeaveStatus,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewLeavePayload {
    #[validate(length(min = 1))]
    pub leave_date: String,
    #[validate(length(min = 1))]
    pub leave_message: String,
}

/// Admin approves (1) or rejects (2) a request; other values are invalid.
#[derive(Debug, Deserialize, Validate)]
pub struct LeaveActionPayload {
    pub leave_id: i64,
    pub role: ApplicantRole,
    pub status: i32,
}

/// Leave row joined with the applicant's name for the admin review list.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct LeaveOverview {
    pub id: i64,
    pub applicant_role: ApplicantRole,
    pub applicant_name: String,
    pub leave_date: String,
    pub message: String,
    pub status: LeaveStatus,
    pub created_at: OffsetDateTime,
}
