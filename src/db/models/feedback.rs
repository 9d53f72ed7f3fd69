use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use super::leave::ApplicantRole;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct FeedbackMessage {
    pub id: i64,
    pub author_role: ApplicantRole,
    pub author_id: i64,
    pub message: String,
    pub reply: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewFeedbackPayload {
    #[validate(length(min = 1, message = "Feedback text is required"))]
    pub feedback: String,
}

/// Admin reply; repeated calls overwrite the reply, there is no thread.
#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackReplyPayload {
    pub id: i64,
    pub role: ApplicantRole,
    #[validate(length(min = 1))]
    pub reply: String,
}

/// Feedback row joined with the author's name for the admin panel.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct FeedbackOverview {
    pub id: i64,
    pub author_role: ApplicantRole,
    pub author_name: String,
    pub message: String,
    pub reply: String,
    pub created_at: OffsetDateTime,
}
