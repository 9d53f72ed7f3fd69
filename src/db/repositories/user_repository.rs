use sqlx::{Sqlite, SqlitePool, Transaction};
use time::OffsetDateTime;

use crate::db::models::{AdminProfile, StaffOverview, StaffProfile, StudentOverview, StudentProfile, User, UserRole};
use crate::db::DatabaseError;

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, created_at, updated_at, last_login_at";

const STAFF_OVERVIEW_SELECT: &str = "
    SELECT sp.id, sp.user_id, TRIM(u.first_name || ' ' || u.last_name) AS full_name,
           u.email, sp.address
    FROM staff_profiles sp
    JOIN users u ON u.id = sp.user_id";

const STUDENT_OVERVIEW_SELECT: &str = "
    SELECT sp.id, sp.user_id, TRIM(u.first_name || ' ' || u.last_name) AS full_name,
           u.email, sp.gender, sp.address, sp.course_id, c.name AS course_name,
           sp.session_year_id
    FROM student_profiles sp
    JOIN users u ON u.id = sp.user_id
    LEFT JOIN courses c ON c.id = sp.course_id";

pub struct UserRepository;

impl UserRepository {
    pub async fn email_exists(pool: &SqlitePool, email: &str) -> Result<bool, DatabaseError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1")
                .bind(email.to_lowercase())
                .fetch_one(pool)
                .await?;
        Ok(count > 0)
    }

    pub async fn create_user(
        tx: &mut Transaction<'_, Sqlite>,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> Result<User, DatabaseError> {
        let now = OffsetDateTime::now_utc();
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email.to_lowercase())
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(role)
        .bind(now)
        .fetch_one(&mut **tx)
        .await?;
        Ok(user)
    }

    /// Create the empty role profile backing a freshly registered user.
    pub async fn create_role_profile(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        role: UserRole,
    ) -> Result<(), DatabaseError> {
        let sql = match role {
            UserRole::Admin => "INSERT INTO admin_profiles (user_id) VALUES (?1)",
            UserRole::Staff => "INSERT INTO staff_profiles (user_id) VALUES (?1)",
            UserRole::Student => "INSERT INTO student_profiles (user_id) VALUES (?1)",
        };
        sqlx::query(sql).bind(user_id).execute(&mut **tx).await?;
        Ok(())
    }

    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email.to_lowercase())
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(user)
    }

    pub async fn touch_last_login(pool: &SqlitePool, user_id: i64) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE users SET last_login_at = ?1 WHERE id = ?2")
            .bind(OffsetDateTime::now_utc())
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn update_names(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE users SET
                first_name = COALESCE(?1, first_name),
                last_name = COALESCE(?2, last_name),
                updated_at = ?3
             WHERE id = ?4",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(OffsetDateTime::now_utc())
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Removing the user row cascades to its role profile, and with it
    /// the person's login capability.
    pub async fn delete_user(
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
    ) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    // Role profile lookups, resolved once at authentication

    pub async fn admin_profile_by_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<AdminProfile>, DatabaseError> {
        let profile = sqlx::query_as::<_, AdminProfile>(
            "SELECT id, user_id FROM admin_profiles WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(profile)
    }

    pub async fn staff_profile_by_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<StaffProfile>, DatabaseError> {
        let profile = sqlx::query_as::<_, StaffProfile>(
            "SELECT id, user_id, address FROM staff_profiles WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(profile)
    }

    pub async fn student_profile_by_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<StudentProfile>, DatabaseError> {
        let profile = sqlx::query_as::<_, StudentProfile>(
            "SELECT id, user_id, gender, address, course_id, session_year_id
             FROM student_profiles WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(profile)
    }

    pub async fn update_staff_profile(
        tx: &mut Transaction<'_, Sqlite>,
        profile_id: i64,
        address: Option<&str>,
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE staff_profiles SET address = COALESCE(?1, address) WHERE id = ?2")
            .bind(address)
            .bind(profile_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    pub async fn update_student_profile(
        tx: &mut Transaction<'_, Sqlite>,
        profile_id: i64,
        gender: Option<&str>,
        address: Option<&str>,
        course_id: Option<i64>,
        session_year_id: Option<i64>,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE student_profiles SET
                gender = COALESCE(?1, gender),
                address = COALESCE(?2, address),
                course_id = COALESCE(?3, course_id),
                session_year_id = COALESCE(?4, session_year_id)
             WHERE id = ?5",
        )
        .bind(gender)
        .bind(address)
        .bind(course_id)
        .bind(session_year_id)
        .bind(profile_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    // Management listings

    pub async fn list_staff(pool: &SqlitePool) -> Result<Vec<StaffOverview>, DatabaseError> {
        let staff = sqlx::query_as::<_, StaffOverview>(&format!(
            "{STAFF_OVERVIEW_SELECT} ORDER BY u.last_name, u.first_name"
        ))
        .fetch_all(pool)
        .await?;
        Ok(staff)
    }

    pub async fn staff_overview(
        pool: &SqlitePool,
        profile_id: i64,
    ) -> Result<Option<StaffOverview>, DatabaseError> {
        let staff = sqlx::query_as::<_, StaffOverview>(&format!(
            "{STAFF_OVERVIEW_SELECT} WHERE sp.id = ?1"
        ))
        .bind(profile_id)
        .fetch_optional(pool)
        .await?;
        Ok(staff)
    }

    pub async fn list_students(pool: &SqlitePool) -> Result<Vec<StudentOverview>, DatabaseError> {
        let students = sqlx::query_as::<_, StudentOverview>(&format!(
            "{STUDENT_OVERVIEW_SELECT} ORDER BY u.last_name, u.first_name"
        ))
        .fetch_all(pool)
        .await?;
        Ok(students)
    }

    pub async fn student_overview(
        pool: &SqlitePool,
        profile_id: i64,
    ) -> Result<Option<StudentOverview>, DatabaseError> {
        let student = sqlx::query_as::<_, StudentOverview>(&format!(
            "{STUDENT_OVERVIEW_SELECT} WHERE sp.id = ?1"
        ))
        .bind(profile_id)
        .fetch_optional(pool)
        .await?;
        Ok(student)
    }
}
