use serde::{Deserialize, Serialize};
use time::Date;
use validator::Validate;

/// One academic year scoping enrollment and attendance.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SessionYear {
    pub id: i64,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewSessionYear {
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSessionYear {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}
