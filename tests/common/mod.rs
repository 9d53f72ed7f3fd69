#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use cms_backend::app::create_router;
use cms_backend::app_state::AppState;
use cms_backend::config::{
    AppConfig, AuthConfig, Config, DatabaseConfig, Environment, ServerConfig,
};
use cms_backend::db::connect_pool;

pub const PASSWORD: &str = "correct-horse-battery";

static DB_SEQ: AtomicU32 = AtomicU32::new(0);

fn temp_db_url(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let seq = DB_SEQ.fetch_add(1, Ordering::SeqCst);
    let path = std::env::temp_dir().join(format!(
        "cms-backend-{}-{}-{}-{}.db",
        prefix,
        std::process::id(),
        nanos,
        seq
    ));
    format!("sqlite://{}", path.display())
}

fn test_config(db_url: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".parse().expect("loopback"),
            port: 0,
        },
        database: DatabaseConfig {
            url: db_url.to_string(),
            max_connections: Some(5),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_minutes: 60,
        },
        app: AppConfig {
            name: "CMS Backend (test)".to_string(),
            environment: Environment::Development,
        },
    }
}

/// Fresh app over a private file-backed database with migrations applied.
pub async fn test_app(prefix: &str) -> Router {
    let url = temp_db_url(prefix);
    let pool = connect_pool(&url, 5).await.expect("connect test db");
    create_router(AppState::new(pool, test_config(&url)))
}

/// Drive one request through the router and decode the JSON body.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("route request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("parse response json")
    };
    (status, value)
}

pub async fn register(app: &Router, email: &str, first_name: &str, last_name: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/accounts/register",
        None,
        Some(json!({
            "email": email,
            "password": PASSWORD,
            "first_name": first_name,
            "last_name": last_name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {}: {}", email, body);
    body
}

pub async fn login(app: &Router, email: &str) -> Value {
    let (status, body) = request(
        app,
        "POST",
        "/accounts/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {}: {}", email, body);
    body
}

pub fn token_of(login_body: &Value) -> String {
    login_body["access_token"]
        .as_str()
        .expect("access token")
        .to_string()
}

pub async fn register_and_login(
    app: &Router,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> String {
    register(app, email, first_name, last_name).await;
    token_of(&login(app, email).await)
}

/// The standard scenario: an admin, one staff member owning one subject, and
/// one student placed in the subject's course and session year.
pub struct School {
    pub admin_token: String,
    pub staff_token: String,
    pub staff_user_id: i64,
    pub student_token: String,
    pub student_profile_id: i64,
    pub course_id: i64,
    pub session_year_id: i64,
    pub subject_id: i64,
}

pub async fn seed_school(app: &Router) -> School {
    let admin_token = register_and_login(app, "head.hod@college.edu", "Hana", "Head").await;

    register(app, "sam.staff@college.edu", "Sam", "Staff").await;
    let staff_login = login(app, "sam.staff@college.edu").await;
    let staff_token = token_of(&staff_login);
    let staff_user_id = staff_login["user"]["id"].as_i64().expect("staff user id");

    let student_token =
        register_and_login(app, "stella.student@college.edu", "Stella", "Student").await;

    let (status, course) = request(
        app,
        "POST",
        "/curriculum/courses",
        Some(&admin_token),
        Some(json!({ "name": "Computer Science" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create course: {}", course);
    let course_id = course["id"].as_i64().expect("course id");

    let (status, session) = request(
        app,
        "POST",
        "/curriculum/sessions",
        Some(&admin_token),
        Some(json!({ "start_date": "2025-06-01", "end_date": "2026-03-31" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create session: {}", session);
    let session_year_id = session["id"].as_i64().expect("session id");

    let (status, subject) = request(
        app,
        "POST",
        "/curriculum/subjects",
        Some(&admin_token),
        Some(json!({
            "name": "Data Structures",
            "course_id": course_id,
            "staff_user_id": staff_user_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create subject: {}", subject);
    let subject_id = subject["id"].as_i64().expect("subject id");

    let student_profile_id = place_student(
        app,
        &admin_token,
        "stella.student@college.edu",
        course_id,
        session_year_id,
    )
    .await;

    School {
        admin_token,
        staff_token,
        staff_user_id,
        student_token,
        student_profile_id,
        course_id,
        session_year_id,
        subject_id,
    }
}

/// Assign a registered student to a course and session year; returns the
/// student profile id.
pub async fn place_student(
    app: &Router,
    admin_token: &str,
    email: &str,
    course_id: i64,
    session_year_id: i64,
) -> i64 {
    let (status, students) =
        request(app, "GET", "/accounts/students", Some(admin_token), None).await;
    assert_eq!(status, StatusCode::OK, "list students: {}", students);

    let profile_id = students
        .as_array()
        .expect("student list")
        .iter()
        .find(|s| s["email"] == email)
        .and_then(|s| s["id"].as_i64())
        .expect("student profile id");

    let (status, body) = request(
        app,
        "PUT",
        &format!("/accounts/students/{}", profile_id),
        Some(admin_token),
        Some(json!({ "course_id": course_id, "session_year_id": session_year_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "place student: {}", body);

    profile_id
}
