use sqlx::{Sqlite, SqlitePool, Transaction};
use time::{Date, OffsetDateTime};

use crate::db::models::{
    AttendanceSession, RosterStudent, SessionMarkRow, SubjectMarkCounts, SubjectSessionCount,
};
use crate::db::DatabaseError;

pub struct AttendanceRepository;

impl AttendanceRepository {
    /// Insert-or-update the session keyed by (subject, date, session year).
    /// The single-statement upsert serializes concurrent saves of the same
    /// key through the uniqueness constraint.
    pub async fn upsert_session(
        tx: &mut Transaction<'_, Sqlite>,
        subject_id: i64,
        attendance_date: Date,
        session_year_id: i64,
    ) -> Result<AttendanceSession, DatabaseError> {
        let now = OffsetDateTime::now_utc();
        let session = sqlx::query_as::<_, AttendanceSession>(
            "INSERT INTO attendance_sessions
                (subject_id, attendance_date, session_year_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (subject_id, attendance_date, session_year_id)
             DO UPDATE SET updated_at = excluded.updated_at
             RETURNING id, subject_id, attendance_date, session_year_id, created_at, updated_at",
        )
        .bind(subject_id)
        .bind(attendance_date)
        .bind(session_year_id)
        .bind(now)
        .fetch_one(&mut **tx)
        .await?;
        Ok(session)
    }

    pub async fn student_exists(
        tx: &mut Transaction<'_, Sqlite>,
        student_id: i64,
    ) -> Result<bool, DatabaseError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM student_profiles WHERE id = ?1")
                .bind(student_id)
                .fetch_one(&mut **tx)
                .await?;
        Ok(count > 0)
    }

    /// Insert-or-update one mark keyed by (student, session). Re-saving with a
    /// changed present flag converges to the latest value, never duplicates.
    pub async fn upsert_mark(
        tx: &mut Transaction<'_, Sqlite>,
        student_id: i64,
        attendance_session_id: i64,
        present: bool,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO attendance_marks (student_id, attendance_session_id, present)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (student_id, attendance_session_id)
             DO UPDATE SET present = excluded.present",
        )
        .bind(student_id)
        .bind(attendance_session_id)
        .bind(present)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Students eligible to be marked: enrolled in the subject's course for
    /// the given session year.
    pub async fn roster(
        pool: &SqlitePool,
        course_id: i64,
        session_year_id: i64,
    ) -> Result<Vec<RosterStudent>, DatabaseError> {
        let students = sqlx::query_as::<_, RosterStudent>(
            "SELECT sp.id, TRIM(u.first_name || ' ' || u.last_name) AS name
             FROM student_profiles sp
             JOIN users u ON u.id = sp.user_id
             WHERE sp.course_id = ?1 AND sp.session_year_id = ?2
             ORDER BY u.last_name, u.first_name",
        )
        .bind(course_id)
        .bind(session_year_id)
        .fetch_all(pool)
        .await?;
        Ok(students)
    }

    /// Sessions for (subject, session year), optionally narrowed to one date,
    /// flattened with their marks. Sessions without marks yield one row with
    /// null mark columns.
    pub async fn session_rows(
        pool: &SqlitePool,
        subject_id: i64,
        session_year_id: i64,
        attendance_date: Option<Date>,
    ) -> Result<Vec<SessionMarkRow>, DatabaseError> {
        const BASE: &str = "
            SELECT a.id AS session_id, a.attendance_date, m.student_id,
                   TRIM(u.first_name || ' ' || u.last_name) AS student_name, m.present
            FROM attendance_sessions a
            LEFT JOIN attendance_marks m ON m.attendance_session_id = a.id
            LEFT JOIN student_profiles sp ON sp.id = m.student_id
            LEFT JOIN users u ON u.id = sp.user_id
            WHERE a.subject_id = ?1 AND a.session_year_id = ?2";

        let rows = match attendance_date {
            Some(date) => {
                sqlx::query_as::<_, SessionMarkRow>(&format!(
                    "{BASE} AND a.attendance_date = ?3
                     ORDER BY a.attendance_date DESC, u.last_name, u.first_name"
                ))
                .bind(subject_id)
                .bind(session_year_id)
                .bind(date)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SessionMarkRow>(&format!(
                    "{BASE} ORDER BY a.attendance_date DESC, u.last_name, u.first_name"
                ))
                .bind(subject_id)
                .bind(session_year_id)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(rows)
    }

    /// Sessions taken per subject for one staff member's dashboard.
    pub async fn staff_session_counts(
        pool: &SqlitePool,
        staff_user_id: i64,
    ) -> Result<Vec<SubjectSessionCount>, DatabaseError> {
        let counts = sqlx::query_as::<_, SubjectSessionCount>(
            "SELECT s.id AS subject_id, s.name AS subject_name, COUNT(a.id) AS sessions_taken
             FROM subjects s
             LEFT JOIN attendance_sessions a ON a.subject_id = s.id
             WHERE s.staff_user_id = ?1
             GROUP BY s.id, s.name
             ORDER BY s.name",
        )
        .bind(staff_user_id)
        .fetch_all(pool)
        .await?;
        Ok(counts)
    }

    /// Present/total mark counts per subject of the student's course. Marks
    /// are scoped to (student, subject) across all session years.
    pub async fn student_mark_counts(
        pool: &SqlitePool,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<SubjectMarkCounts>, DatabaseError> {
        let counts = sqlx::query_as::<_, SubjectMarkCounts>(
            "SELECT s.id AS subject_id, s.name AS subject_name,
                    COALESCE(SUM(CASE WHEN m.present = 1 THEN 1 ELSE 0 END), 0) AS present,
                    COUNT(m.id) AS total
             FROM subjects s
             LEFT JOIN attendance_sessions a ON a.subject_id = s.id
             LEFT JOIN attendance_marks m
                    ON m.attendance_session_id = a.id AND m.student_id = ?1
             WHERE s.course_id = ?2
             GROUP BY s.id, s.name
             ORDER BY s.name",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_all(pool)
        .await?;
        Ok(counts)
    }
}
