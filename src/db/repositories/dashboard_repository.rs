use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::DatabaseError;

/// One slice of a dashboard chart, `{"name": ..., "value": ...}`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ChartItem {
    pub name: String,
    pub value: i64,
}

/// Card counts for the staff landing view.
#[derive(Debug, Clone, Serialize)]
pub struct StaffCards {
    pub total_subjects: i64,
    pub students_under_me: i64,
    pub total_attendance_taken: i64,
    pub total_leave_taken: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCounts {
    pub total_students: i64,
    pub total_staffs: i64,
    pub total_courses: i64,
    pub total_subjects: i64,
    pub total_feedback: i64,
    pub total_contacts: i64,
}

pub struct DashboardRepository;

impl DashboardRepository {
    pub async fn counts(pool: &SqlitePool) -> Result<DashboardCounts, DatabaseError> {
        Ok(DashboardCounts {
            total_students: Self::count(pool, "SELECT COUNT(*) FROM student_profiles").await?,
            total_staffs: Self::count(pool, "SELECT COUNT(*) FROM staff_profiles").await?,
            total_courses: Self::count(pool, "SELECT COUNT(*) FROM courses").await?,
            total_subjects: Self::count(pool, "SELECT COUNT(*) FROM subjects").await?,
            total_feedback: Self::count(pool, "SELECT COUNT(*) FROM feedback_messages").await?,
            total_contacts: Self::count(pool, "SELECT COUNT(*) FROM contact_messages").await?,
        })
    }

    pub async fn subjects_per_course(pool: &SqlitePool) -> Result<Vec<ChartItem>, DatabaseError> {
        let items = sqlx::query_as::<_, ChartItem>(
            "SELECT c.name, COUNT(s.id) AS value
             FROM courses c
             LEFT JOIN subjects s ON s.course_id = c.id
             GROUP BY c.id, c.name
             ORDER BY c.name",
        )
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn students_per_course(pool: &SqlitePool) -> Result<Vec<ChartItem>, DatabaseError> {
        let items = sqlx::query_as::<_, ChartItem>(
            "SELECT c.name, COUNT(sp.id) AS value
             FROM courses c
             LEFT JOIN student_profiles sp ON sp.course_id = c.id
             GROUP BY c.id, c.name
             ORDER BY c.name",
        )
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    /// Distinct students with a result record in each subject.
    pub async fn students_per_subject(pool: &SqlitePool) -> Result<Vec<ChartItem>, DatabaseError> {
        let items = sqlx::query_as::<_, ChartItem>(
            "SELECT s.name, COUNT(DISTINCT r.student_id) AS value
             FROM subjects s
             LEFT JOIN result_records r ON r.subject_id = s.id
             GROUP BY s.id, s.name
             ORDER BY s.name",
        )
        .fetch_all(pool)
        .await?;
        Ok(items)
    }

    pub async fn staff_cards(
        pool: &SqlitePool,
        staff_user_id: i64,
        staff_profile_id: i64,
    ) -> Result<StaffCards, DatabaseError> {
        let total_subjects: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM subjects WHERE staff_user_id = ?1")
                .bind(staff_user_id)
                .fetch_one(pool)
                .await?;

        let students_under_me: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT sp.id) FROM student_profiles sp
             WHERE sp.course_id IN (SELECT course_id FROM subjects WHERE staff_user_id = ?1)",
        )
        .bind(staff_user_id)
        .fetch_one(pool)
        .await?;

        let total_attendance_taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_sessions a
             JOIN subjects s ON s.id = a.subject_id
             WHERE s.staff_user_id = ?1",
        )
        .bind(staff_user_id)
        .fetch_one(pool)
        .await?;

        let total_leave_taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM leave_requests
             WHERE applicant_role = 'staff' AND applicant_id = ?1",
        )
        .bind(staff_profile_id)
        .fetch_one(pool)
        .await?;

        Ok(StaffCards {
            total_subjects,
            students_under_me,
            total_attendance_taken,
            total_leave_taken,
        })
    }

    async fn count(pool: &SqlitePool, sql: &str) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
        Ok(count)
    }
}
