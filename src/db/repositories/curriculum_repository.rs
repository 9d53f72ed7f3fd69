use sqlx::SqlitePool;
use time::Date;

use crate::db::models::{Course, SessionYear, Subject, SubjectDetail};
use crate::db::DatabaseError;

const SUBJECT_DETAIL_SELECT: &str = "
    SELECT s.id, s.name, s.course_id, c.name AS course_name, s.staff_user_id,
           TRIM(u.first_name || ' ' || u.last_name) AS staff_name
    FROM subjects s
    JOIN courses c ON c.id = s.course_id
    JOIN users u ON u.id = s.staff_user_id";

/// Role-derived narrowing applied to subject listings. Always expressed as a
/// WHERE clause so counts and any future pagination stay correct.
#[derive(Debug, Clone, Copy)]
pub enum SubjectScope {
    All,
    OwnedBy(i64),
    InCourse(i64),
    /// Student without a course placement; resolves to an empty list.
    Unplaced,
}

pub struct CurriculumRepository;

impl CurriculumRepository {
    // Courses

    pub async fn list_courses(pool: &SqlitePool) -> Result<Vec<Course>, DatabaseError> {
        let courses = sqlx::query_as::<_, Course>("SELECT id, name FROM courses ORDER BY name")
            .fetch_all(pool)
            .await?;
        Ok(courses)
    }

    pub async fn get_course(pool: &SqlitePool, id: i64) -> Result<Option<Course>, DatabaseError> {
        let course = sqlx::query_as::<_, Course>("SELECT id, name FROM courses WHERE id = ?1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(course)
    }

    pub async fn create_course(pool: &SqlitePool, name: &str) -> Result<Course, DatabaseError> {
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (name) VALUES (?1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(course)
    }

    pub async fn update_course(
        pool: &SqlitePool,
        id: i64,
        name: &str,
    ) -> Result<Option<Course>, DatabaseError> {
        let course = sqlx::query_as::<_, Course>(
            "UPDATE courses SET name = ?1 WHERE id = ?2 RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(course)
    }

    pub async fn delete_course(pool: &SqlitePool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Session years

    pub async fn list_session_years(pool: &SqlitePool) -> Result<Vec<SessionYear>, DatabaseError> {
        let sessions = sqlx::query_as::<_, SessionYear>(
            "SELECT id, start_date, end_date FROM session_years ORDER BY start_date",
        )
        .fetch_all(pool)
        .await?;
        Ok(sessions)
    }

    pub async fn get_session_year(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<SessionYear>, DatabaseError> {
        let session = sqlx::query_as::<_, SessionYear>(
            "SELECT id, start_date, end_date FROM session_years WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(session)
    }

    pub async fn create_session_year(
        pool: &SqlitePool,
        start_date: Date,
        end_date: Date,
    ) -> Result<SessionYear, DatabaseError> {
        let session = sqlx::query_as::<_, SessionYear>(
            "INSERT INTO session_years (start_date, end_date) VALUES (?1, ?2)
             RETURNING id, start_date, end_date",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(pool)
        .await?;
        Ok(session)
    }

    pub async fn update_session_year(
        pool: &SqlitePool,
        id: i64,
        start_date: Option<Date>,
        end_date: Option<Date>,
    ) -> Result<Option<SessionYear>, DatabaseError> {
        let session = sqlx::query_as::<_, SessionYear>(
            "UPDATE session_years SET
                start_date = COALESCE(?1, start_date),
                end_date = COALESCE(?2, end_date)
             WHERE id = ?3
             RETURNING id, start_date, end_date",
        )
        .bind(start_date)
        .bind(end_date)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(session)
    }

    pub async fn delete_session_year(pool: &SqlitePool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM session_years WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Subjects

    pub async fn list_subjects(
        pool: &SqlitePool,
        scope: SubjectScope,
    ) -> Result<Vec<SubjectDetail>, DatabaseError> {
        let subjects = match scope {
            SubjectScope::All => {
                sqlx::query_as::<_, SubjectDetail>(&format!(
                    "{SUBJECT_DETAIL_SELECT} ORDER BY s.name"
                ))
                .fetch_all(pool)
                .await?
            }
            SubjectScope::OwnedBy(staff_user_id) => {
                sqlx::query_as::<_, SubjectDetail>(&format!(
                    "{SUBJECT_DETAIL_SELECT} WHERE s.staff_user_id = ?1 ORDER BY s.name"
                ))
                .bind(staff_user_id)
                .fetch_all(pool)
                .await?
            }
            SubjectScope::InCourse(course_id) => {
                sqlx::query_as::<_, SubjectDetail>(&format!(
                    "{SUBJECT_DETAIL_SELECT} WHERE s.course_id = ?1 ORDER BY s.name"
                ))
                .bind(course_id)
                .fetch_all(pool)
                .await?
            }
            SubjectScope::Unplaced => Vec::new(),
        };
        Ok(subjects)
    }

    pub async fn get_subject(pool: &SqlitePool, id: i64) -> Result<Option<Subject>, DatabaseError> {
        let subject = sqlx::query_as::<_, Subject>(
            "SELECT id, name, course_id, staff_user_id FROM subjects WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(subject)
    }

    pub async fn get_subject_detail(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<SubjectDetail>, DatabaseError> {
        let subject = sqlx::query_as::<_, SubjectDetail>(&format!(
            "{SUBJECT_DETAIL_SELECT} WHERE s.id = ?1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(subject)
    }

    pub async fn create_subject(
        pool: &SqlitePool,
        name: &str,
        course_id: i64,
        staff_user_id: i64,
    ) -> Result<Subject, DatabaseError> {
        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name, course_id, staff_user_id) VALUES (?1, ?2, ?3)
             RETURNING id, name, course_id, staff_user_id",
        )
        .bind(name)
        .bind(course_id)
        .bind(staff_user_id)
        .fetch_one(pool)
        .await?;
        Ok(subject)
    }

    pub async fn update_subject(
        pool: &SqlitePool,
        id: i64,
        name: Option<&str>,
        course_id: Option<i64>,
        staff_user_id: Option<i64>,
    ) -> Result<Option<Subject>, DatabaseError> {
        let subject = sqlx::query_as::<_, Subject>(
            "UPDATE subjects SET
                name = COALESCE(?1, name),
                course_id = COALESCE(?2, course_id),
                staff_user_id = COALESCE(?3, staff_user_id)
             WHERE id = ?4
             RETURNING id, name, course_id, staff_user_id",
        )
        .bind(name)
        .bind(course_id)
        .bind(staff_user_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(subject)
    }

    pub async fn delete_subject(pool: &SqlitePool, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
