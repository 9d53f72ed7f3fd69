mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{register, request, seed_school};

#[tokio::test]
async fn roster_lists_students_of_the_subjects_course_and_session() {
    let app = common::test_app("roster").await;
    let school = seed_school(&app).await;

    // A student in the same course but left unplaced for the session year
    register(&app, "uma.student@college.edu", "Uma", "Unplaced").await;

    let (status, roster) = request(
        &app,
        "POST",
        "/attendance/fetch-students",
        Some(&school.staff_token),
        Some(json!({
            "subject_id": school.subject_id,
            "session_year_id": school.session_year_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", roster);

    let roster = roster.as_array().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["id"], school.student_profile_id);
    assert_eq!(roster[0]["name"], "Stella Student");
}

#[tokio::test]
async fn saving_twice_converges_to_the_second_save() {
    let app = common::test_app("save-converge").await;
    let school = seed_school(&app).await;

    let save = |present: bool| {
        json!({
            "subject_id": school.subject_id,
            "attendance_date": "2025-09-01",
            "session_year_id": school.session_year_id,
            "marks": [{ "student_id": school.student_profile_id, "present": present }],
        })
    };

    let (status, first) = request(
        &app,
        "POST",
        "/attendance/save",
        Some(&school.staff_token),
        Some(save(true)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", first);

    let (status, second) = request(
        &app,
        "POST",
        "/attendance/save",
        Some(&school.staff_token),
        Some(save(false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", second);
    assert_eq!(first["attendance_id"], second["attendance_id"]);

    let (status, sessions) = request(
        &app,
        "POST",
        "/attendance/fetch-data",
        Some(&school.staff_token),
        Some(json!({
            "subject_id": school.subject_id,
            "session_year_id": school.session_year_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1, "exactly one session for the triple");
    let marks = sessions[0]["marks"].as_array().unwrap();
    assert_eq!(marks.len(), 1, "exactly one mark per student");
    assert_eq!(marks[0]["present"], false, "second save wins");
}

#[tokio::test]
async fn invalid_students_fail_individually_without_discarding_the_rest() {
    let app = common::test_app("save-partial").await;
    let school = seed_school(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/attendance/save",
        Some(&school.staff_token),
        Some(json!({
            "subject_id": school.subject_id,
            "attendance_date": "2025-09-02",
            "session_year_id": school.session_year_id,
            "marks": [
                { "student_id": school.student_profile_id, "present": true },
                { "student_id": 99999, "present": true },
            ],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["saved"], 1);

    let failed = body["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["student_id"], 99999);
    assert_eq!(failed[0]["error"], "invalid student");
}

#[tokio::test]
async fn only_the_owning_staff_may_save() {
    let app = common::test_app("save-authz").await;
    let school = seed_school(&app).await;

    register(&app, "bella.staff@college.edu", "Bella", "Brown").await;
    let bella_token = common::token_of(&common::login(&app, "bella.staff@college.edu").await);

    let payload = json!({
        "subject_id": school.subject_id,
        "attendance_date": "2025-09-03",
        "session_year_id": school.session_year_id,
        "marks": [],
    });

    let (status, _) = request(
        &app,
        "POST",
        "/attendance/save",
        Some(&bella_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "POST",
        "/attendance/save",
        Some(&school.student_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_stats_compute_rounded_percentages() {
    let app = common::test_app("student-stats").await;
    let school = seed_school(&app).await;

    // Three sessions: present, present, absent
    for (date, present) in [
        ("2025-09-01", true),
        ("2025-09-08", true),
        ("2025-09-15", false),
    ] {
        let (status, body) = request(
            &app,
            "POST",
            "/attendance/save",
            Some(&school.staff_token),
            Some(json!({
                "subject_id": school.subject_id,
                "attendance_date": date,
                "session_year_id": school.session_year_id,
                "marks": [{ "student_id": school.student_profile_id, "present": present }],
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }

    let (status, stats) = request(
        &app,
        "GET",
        "/attendance/student-stats",
        Some(&school.student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", stats);

    let per_subject = stats["per_subject"].as_array().unwrap();
    assert_eq!(per_subject.len(), 1);
    assert_eq!(per_subject[0]["present"], 2);
    assert_eq!(per_subject[0]["absent"], 1);
    assert_eq!(per_subject[0]["total"], 3);
    assert_eq!(per_subject[0]["percentage"], 66.67);

    assert_eq!(stats["overall"]["percentage"], 66.67);
}

#[tokio::test]
async fn student_with_no_marks_has_zero_percentage() {
    let app = common::test_app("zero-percentage").await;
    let school = seed_school(&app).await;

    let (status, stats) = request(
        &app,
        "GET",
        "/attendance/student-stats",
        Some(&school.student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let per_subject = stats["per_subject"].as_array().unwrap();
    assert_eq!(per_subject.len(), 1);
    assert_eq!(per_subject[0]["total"], 0);
    assert_eq!(per_subject[0]["percentage"], 0.0);
    assert_eq!(stats["overall"]["percentage"], 0.0);
}

#[tokio::test]
async fn staff_stats_count_sessions_per_subject() {
    let app = common::test_app("staff-stats").await;
    let school = seed_school(&app).await;

    for date in ["2025-09-01", "2025-09-08"] {
        request(
            &app,
            "POST",
            "/attendance/save",
            Some(&school.staff_token),
            Some(json!({
                "subject_id": school.subject_id,
                "attendance_date": date,
                "session_year_id": school.session_year_id,
                "marks": [{ "student_id": school.student_profile_id, "present": true }],
            })),
        )
        .await;
    }

    let (status, stats) = request(
        &app,
        "GET",
        "/attendance/staff-stats",
        Some(&school.staff_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", stats);
    assert_eq!(stats["total_sessions"], 2);

    let per_subject = stats["per_subject"].as_array().unwrap();
    assert_eq!(per_subject.len(), 1);
    assert_eq!(per_subject[0]["sessions_taken"], 2);
}

#[tokio::test]
async fn concurrent_duplicate_saves_produce_one_session() {
    let app = common::test_app("save-concurrent").await;
    let school = seed_school(&app).await;

    let payload = json!({
        "subject_id": school.subject_id,
        "attendance_date": "2025-09-04",
        "session_year_id": school.session_year_id,
        "marks": [{ "student_id": school.student_profile_id, "present": true }],
    });

    let (first, second) = tokio::join!(
        request(
            &app,
            "POST",
            "/attendance/save",
            Some(&school.staff_token),
            Some(payload.clone()),
        ),
        request(
            &app,
            "POST",
            "/attendance/save",
            Some(&school.staff_token),
            Some(payload.clone()),
        ),
    );
    assert_eq!(first.0, StatusCode::CREATED, "{}", first.1);
    assert_eq!(second.0, StatusCode::CREATED, "{}", second.1);
    assert_eq!(first.1["attendance_id"], second.1["attendance_id"]);

    let (_, sessions) = request(
        &app,
        "POST",
        "/attendance/fetch-data",
        Some(&school.staff_token),
        Some(json!({
            "subject_id": school.subject_id,
            "session_year_id": school.session_year_id,
            "attendance_date": "2025-09-04",
        })),
    )
    .await;
    assert_eq!(sessions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn admin_may_read_attendance_but_students_may_not() {
    let app = common::test_app("fetch-authz").await;
    let school = seed_school(&app).await;

    let payload = json!({
        "subject_id": school.subject_id,
        "session_year_id": school.session_year_id,
    });

    let (status, _) = request(
        &app,
        "POST",
        "/attendance/fetch-data",
        Some(&school.admin_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &app,
        "POST",
        "/attendance/fetch-data",
        Some(&school.student_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
