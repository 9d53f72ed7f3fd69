mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{request, seed_school};

#[tokio::test]
async fn leave_lifecycle_pending_then_admin_decision() {
    let app = common::test_app("leave-lifecycle").await;
    let school = seed_school(&app).await;

    let (status, created) = request(
        &app,
        "POST",
        "/operations/leave/staff",
        Some(&school.staff_token),
        Some(json!({ "leave_date": "2025-10-02", "leave_message": "Medical appointment" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["leave"]["status"], 0);
    let leave_id = created["leave"]["id"].as_i64().unwrap();

    // Visible to the admin with the applicant's name
    let (status, all) = request(
        &app,
        "GET",
        "/operations/leave",
        Some(&school.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["applicant_name"], "Sam Staff");
    assert_eq!(all[0]["applicant_role"], "staff");

    // Approve
    let (status, _) = request(
        &app,
        "POST",
        "/operations/leave/action",
        Some(&school.admin_token),
        Some(json!({ "leave_id": leave_id, "role": "staff", "status": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The requester sees the decision
    let (_, mine) = request(
        &app,
        "GET",
        "/operations/leave/staff",
        Some(&school.staff_token),
        None,
    )
    .await;
    assert_eq!(mine.as_array().unwrap()[0]["status"], 1);

    // Re-transition is permitted; the latest decision wins
    let (status, _) = request(
        &app,
        "POST",
        "/operations/leave/action",
        Some(&school.admin_token),
        Some(json!({ "leave_id": leave_id, "role": "staff", "status": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, mine) = request(
        &app,
        "GET",
        "/operations/leave/staff",
        Some(&school.staff_token),
        None,
    )
    .await;
    assert_eq!(mine.as_array().unwrap()[0]["status"], 2);
}

#[tokio::test]
async fn leave_action_validates_status_and_target() {
    let app = common::test_app("leave-action-validate").await;
    let school = seed_school(&app).await;

    let (status, _) = request(
        &app,
        "POST",
        "/operations/leave/action",
        Some(&school.admin_token),
        Some(json!({ "leave_id": 1, "role": "staff", "status": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &app,
        "POST",
        "/operations/leave/action",
        Some(&school.admin_token),
        Some(json!({ "leave_id": 12345, "role": "staff", "status": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Not for staff to decide
    let (status, _) = request(
        &app,
        "POST",
        "/operations/leave/action",
        Some(&school.staff_token),
        Some(json!({ "leave_id": 1, "role": "staff", "status": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_leave_is_separate_from_staff_leave() {
    let app = common::test_app("leave-student").await;
    let school = seed_school(&app).await;

    let (status, created) = request(
        &app,
        "POST",
        "/operations/leave/student",
        Some(&school.student_token),
        Some(json!({ "leave_date": "2025-11-10", "leave_message": "Family event" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);

    let (_, staff_leaves) = request(
        &app,
        "GET",
        "/operations/leave/staff",
        Some(&school.staff_token),
        None,
    )
    .await;
    assert_eq!(staff_leaves.as_array().unwrap().len(), 0);

    let (_, student_leaves) = request(
        &app,
        "GET",
        "/operations/leave/student",
        Some(&school.student_token),
        None,
    )
    .await;
    assert_eq!(student_leaves.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn feedback_reply_is_overwritten_not_threaded() {
    let app = common::test_app("feedback").await;
    let school = seed_school(&app).await;

    let (status, created) = request(
        &app,
        "POST",
        "/operations/feedback",
        Some(&school.student_token),
        Some(json!({ "feedback": "The library closes too early" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["feedback"]["reply"], "");
    let feedback_id = created["feedback"]["id"].as_i64().unwrap();

    for reply in ["We will look into it", "Extended to 10pm"] {
        let (status, _) = request(
            &app,
            "POST",
            "/operations/feedback/admin",
            Some(&school.admin_token),
            Some(json!({ "id": feedback_id, "role": "student", "reply": reply })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, mine) = request(
        &app,
        "GET",
        "/operations/feedback",
        Some(&school.student_token),
        None,
    )
    .await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["reply"], "Extended to 10pm");

    // Admin panel labels the author
    let (_, all) = request(
        &app,
        "GET",
        "/operations/feedback/admin",
        Some(&school.admin_token),
        None,
    )
    .await;
    let all = all.as_array().unwrap();
    assert_eq!(all[0]["author_name"], "Stella Student");
    assert_eq!(all[0]["author_role"], "student");
}

#[tokio::test]
async fn result_record_upserts_per_student_subject() {
    let app = common::test_app("results-upsert").await;
    let school = seed_school(&app).await;

    let save = |exam: f64, assignment: f64| {
        json!({
            "student_id": school.student_profile_id,
            "subject_id": school.subject_id,
            "exam_marks": exam,
            "assignment_marks": assignment,
        })
    };

    let (status, first) = request(
        &app,
        "POST",
        "/operations/manage-results",
        Some(&school.staff_token),
        Some(save(55.0, 60.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", first);

    let (status, second) = request(
        &app,
        "POST",
        "/operations/manage-results",
        Some(&school.staff_token),
        Some(save(72.5, 80.0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", second);
    assert_eq!(first["result"]["id"], second["result"]["id"]);

    // The student sees exactly one record with the latest marks
    let (status, results) = request(
        &app,
        "GET",
        "/operations/manage-results",
        Some(&school.student_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["exam_marks"], 72.5);
    assert_eq!(results[0]["assignment_marks"], 80.0);
    assert_eq!(results[0]["subject_name"], "Data Structures");
}

#[tokio::test]
async fn results_respect_subject_ownership() {
    let app = common::test_app("results-authz").await;
    let school = seed_school(&app).await;

    common::register(&app, "bella.staff@college.edu", "Bella", "Brown").await;
    let bella_token = common::token_of(&common::login(&app, "bella.staff@college.edu").await);

    let payload = json!({
        "student_id": school.student_profile_id,
        "subject_id": school.subject_id,
        "exam_marks": 10.0,
        "assignment_marks": 10.0,
    });

    let (status, _) = request(
        &app,
        "POST",
        "/operations/manage-results",
        Some(&bella_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request(
        &app,
        "POST",
        "/operations/manage-results",
        Some(&school.student_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn contact_form_is_public_and_counted_in_admin_stats() {
    let app = common::test_app("contact-stats").await;
    let school = seed_school(&app).await;

    let (status, body) = request(
        &app,
        "POST",
        "/core/contact",
        None,
        Some(json!({
            "name": "Prospective Parent",
            "email": "parent@example.com",
            "message": "When do admissions open?",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (status, stats) = request(
        &app,
        "GET",
        "/core/admin-stats",
        Some(&school.admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", stats);
    assert_eq!(stats["cards"]["total_students"], 1);
    assert_eq!(stats["cards"]["total_staffs"], 1);
    assert_eq!(stats["cards"]["total_courses"], 1);
    assert_eq!(stats["cards"]["total_subjects"], 1);
    assert_eq!(stats["cards"]["total_contacts"], 1);

    let subjects_per_course = stats["charts"]["subjects_per_course"].as_array().unwrap();
    assert_eq!(subjects_per_course[0]["name"], "Computer Science");
    assert_eq!(subjects_per_course[0]["value"], 1);

    // Not for anyone below the HOD
    let (status, _) = request(
        &app,
        "GET",
        "/core/admin-stats",
        Some(&school.staff_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
