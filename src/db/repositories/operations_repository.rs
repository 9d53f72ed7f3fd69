use sqlx::SqlitePool;
use time::OffsetDateTime;

use crate::db::models::{
    ApplicantRole, ContactMessage, FeedbackMessage, FeedbackOverview, LeaveOverview, LeaveRequest,
    LeaveStatus, ResultOverview, ResultRecord,
};
use crate::db::DatabaseError;

const LEAVE_COLUMNS: &str =
    "id, applicant_role, applicant_id, leave_date, message, status, created_at";

const FEEDBACK_COLUMNS: &str = "id, author_role, author_id, message, reply, created_at";

const RESULT_OVERVIEW_SELECT: &str = "
    SELECT r.id, r.student_id, TRIM(u.first_name || ' ' || u.last_name) AS student_name,
           r.subject_id, s.name AS subject_name, r.exam_marks, r.assignment_marks
    FROM result_records r
    JOIN student_profiles sp ON sp.id = r.student_id
    JOIN users u ON u.id = sp.user_id
    JOIN subjects s ON s.id = r.subject_id";

pub struct OperationsRepository;

impl OperationsRepository {
    // Leave

    pub async fn create_leave(
        pool: &SqlitePool,
        role: ApplicantRole,
        applicant_id: i64,
        leave_date: &str,
        message: &str,
    ) -> Result<LeaveRequest, DatabaseError> {
        let leave = sqlx::query_as::<_, LeaveRequest>(&format!(
            "INSERT INTO leave_requests (applicant_role, applicant_id, leave_date, message, status, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5)
             RETURNING {LEAVE_COLUMNS}"
        ))
        .bind(role)
        .bind(applicant_id)
        .bind(leave_date)
        .bind(message)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(pool)
        .await?;
        Ok(leave)
    }

    pub async fn list_leaves_for(
        pool: &SqlitePool,
        role: ApplicantRole,
        applicant_id: i64,
    ) -> Result<Vec<LeaveRequest>, DatabaseError> {
        let leaves = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests
             WHERE applicant_role = ?1 AND applicant_id = ?2
             ORDER BY created_at DESC"
        ))
        .bind(role)
        .bind(applicant_id)
        .fetch_all(pool)
        .await?;
        Ok(leaves)
    }

    pub async fn list_all_leaves(pool: &SqlitePool) -> Result<Vec<LeaveOverview>, DatabaseError> {
        let leaves = sqlx::query_as::<_, LeaveOverview>(
            "SELECT l.id, l.applicant_role,
                    TRIM(COALESCE(su.first_name, tu.first_name, '') || ' '
                         || COALESCE(su.last_name, tu.last_name, '')) AS applicant_name,
                    l.leave_date, l.message, l.status, l.created_at
             FROM leave_requests l
             LEFT JOIN staff_profiles sp
                    ON l.applicant_role = 'staff' AND sp.id = l.applicant_id
             LEFT JOIN users su ON su.id = sp.user_id
             LEFT JOIN student_profiles stp
                    ON l.applicant_role = 'student' AND stp.id = l.applicant_id
             LEFT JOIN users tu ON tu.id = stp.user_id
             ORDER BY l.created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(leaves)
    }

    /// Overwrites whatever the current status is; re-transition is permitted.
    pub async fn set_leave_status(
        pool: &SqlitePool,
        leave_id: i64,
        role: ApplicantRole,
        status: LeaveStatus,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE leave_requests SET status = ?1 WHERE id = ?2 AND applicant_role = ?3",
        )
        .bind(status)
        .bind(leave_id)
        .bind(role)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // Feedback

    pub async fn create_feedback(
        pool: &SqlitePool,
        role: ApplicantRole,
        author_id: i64,
        message: &str,
    ) -> Result<FeedbackMessage, DatabaseError> {
        let feedback = sqlx::query_as::<_, FeedbackMessage>(&format!(
            "INSERT INTO feedback_messages (author_role, author_id, message, reply, created_at)
             VALUES (?1, ?2, ?3, '', ?4)
             RETURNING {FEEDBACK_COLUMNS}"
        ))
        .bind(role)
        .bind(author_id)
        .bind(message)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(pool)
        .await?;
        Ok(feedback)
    }

    pub async fn list_feedback_for(
        pool: &SqlitePool,
        role: ApplicantRole,
        author_id: i64,
    ) -> Result<Vec<FeedbackMessage>, DatabaseError> {
        let feedback = sqlx::query_as::<_, FeedbackMessage>(&format!(
            "SELECT {FEEDBACK_COLUMNS} FROM feedback_messages
             WHERE author_role = ?1 AND author_id = ?2
             ORDER BY created_at DESC"
        ))
        .bind(role)
        .bind(author_id)
        .fetch_all(pool)
        .await?;
        Ok(feedback)
    }

    pub async fn list_all_feedback(
        pool: &SqlitePool,
    ) -> Result<Vec<FeedbackOverview>, DatabaseError> {
        let feedback = sqlx::query_as::<_, FeedbackOverview>(
            "SELECT f.id, f.author_role,
                    TRIM(COALESCE(su.first_name, tu.first_name, '') || ' '
                         || COALESCE(su.last_name, tu.last_name, '')) AS author_name,
                    f.message, f.reply, f.created_at
             FROM feedback_messages f
             LEFT JOIN staff_profiles sp
                    ON f.author_role = 'staff' AND sp.id = f.author_id
             LEFT JOIN users su ON su.id = sp.user_id
             LEFT JOIN student_profiles stp
                    ON f.author_role = 'student' AND stp.id = f.author_id
             LEFT JOIN users tu ON tu.id = stp.user_id
             ORDER BY f.created_at DESC",
        )
        .fetch_all(pool)
        .await?;
        Ok(feedback)
    }

    pub async fn set_feedback_reply(
        pool: &SqlitePool,
        feedback_id: i64,
        role: ApplicantRole,
        reply: &str,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE feedback_messages SET reply = ?1 WHERE id = ?2 AND author_role = ?3",
        )
        .bind(reply)
        .bind(feedback_id)
        .bind(role)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // Results

    /// Insert-or-update the record keyed by (student, subject); concurrent
    /// saves serialize through the uniqueness constraint.
    pub async fn upsert_result(
        pool: &SqlitePool,
        student_id: i64,
        subject_id: i64,
        exam_marks: f64,
        assignment_marks: f64,
    ) -> Result<ResultRecord, DatabaseError> {
        let record = sqlx::query_as::<_, ResultRecord>(
            "INSERT INTO result_records (student_id, subject_id, exam_marks, assignment_marks)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (student_id, subject_id)
             DO UPDATE SET exam_marks = excluded.exam_marks,
                           assignment_marks = excluded.assignment_marks
             RETURNING id, student_id, subject_id, exam_marks, assignment_marks",
        )
        .bind(student_id)
        .bind(subject_id)
        .bind(exam_marks)
        .bind(assignment_marks)
        .fetch_one(pool)
        .await?;
        Ok(record)
    }

    pub async fn results_for_student(
        pool: &SqlitePool,
        student_id: i64,
    ) -> Result<Vec<ResultOverview>, DatabaseError> {
        let results = sqlx::query_as::<_, ResultOverview>(&format!(
            "{RESULT_OVERVIEW_SELECT} WHERE r.student_id = ?1 ORDER BY s.name"
        ))
        .bind(student_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    pub async fn results_for_subject(
        pool: &SqlitePool,
        subject_id: i64,
    ) -> Result<Vec<ResultOverview>, DatabaseError> {
        let results = sqlx::query_as::<_, ResultOverview>(&format!(
            "{RESULT_OVERVIEW_SELECT} WHERE r.subject_id = ?1 ORDER BY u.last_name, u.first_name"
        ))
        .bind(subject_id)
        .fetch_all(pool)
        .await?;
        Ok(results)
    }

    // Contact

    pub async fn create_contact(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<ContactMessage, DatabaseError> {
        let contact = sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contact_messages (name, email, message, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, name, email, message, created_at",
        )
        .bind(name)
        .bind(email)
        .bind(message)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(pool)
        .await?;
        Ok(contact)
    }
}
