use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StaffProfile {
    pub id: i64,
    pub user_id: i64,
    pub address: String,
}

/// Staff row joined with its backing user, as returned by management listings.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct StaffOverview {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStaffPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
}
