mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use common::{request, setup, token_for};

#[tokio::test]
async fn admins_manage_the_posting_lifecycle() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let token = token_for(admin.id, "admin");

    let (status, body) = request(
        &ctx.app,
        "POST",
        "/api/admin/jobs",
        Some(&token),
        Some(json!({
            "title": "Platform Engineer",
            "description": "Own the deployment pipeline.",
            "required_skills": "Rust, Postgres",
            "experience_level": "Senior",
            "job_type": "Full-time"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Job posting created successfully");
    let job = &body["data"]["job"];
    assert_eq!(job["is_active"], true);
    assert_eq!(job["created_by"], admin.id.to_string());
    let job_id = job["id"].as_str().unwrap().to_string();

    let (status, body) = request(
        &ctx.app,
        "PATCH",
        &format!("/api/admin/jobs/{job_id}"),
        Some(&token),
        Some(json!({"is_active": false, "qualifications": "BSc or equivalent"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["job"]["is_active"], false);
    assert_eq!(body["data"]["job"]["qualifications"], "BSc or equivalent");

    // Deactivated postings disappear from the public surface but stay
    // visible to staff.
    let (status, _) = request(&ctx.app, "GET", &format!("/api/jobs/{job_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = request(
        &ctx.app,
        "GET",
        &format!("/api/admin/jobs/{job_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
        &ctx.app,
        "DELETE",
        &format!("/api/admin/jobs/{job_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job posting deleted successfully");

    let (status, _) = request(
        &ctx.app,
        "GET",
        &format!("/api/admin/jobs/{job_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn posting_creation_validates_tier_and_type() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let token = token_for(admin.id, "admin");

    let (status, _) = request(
        &ctx.app,
        "POST",
        "/api/admin/jobs",
        Some(&token),
        Some(json!({
            "title": "Ghost Role",
            "description": "Should not exist",
            "experience_level": "Wizard",
            "job_type": "Full-time"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &ctx.app,
        "POST",
        "/api/admin/jobs",
        Some(&token),
        Some(json!({
            "title": "Ghost Role",
            "description": "Should not exist",
            "experience_level": "Senior",
            "job_type": "Gig"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn applicants_cannot_manage_postings() {
    let ctx = setup();
    let user = ctx.store.seed_user("user@example.com", "applicant");
    let token = token_for(user.id, "applicant");

    let (status, _) = request(
        &ctx.app,
        "POST",
        "/api/admin/jobs",
        Some(&token),
        Some(json!({
            "title": "Not Allowed",
            "description": "Nope",
            "experience_level": "Junior",
            "job_type": "Internship"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn staff_listing_can_include_closed_postings() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    ctx.store.seed_job("Open Role", true, None);
    ctx.store.seed_job("Paused Role", false, None);
    let token = token_for(admin.id, "admin");

    let (status, body) = request(&ctx.app, "GET", "/api/admin/jobs", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["jobs"].as_array().unwrap().len(), 1);

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/admin/jobs?include_closed=true",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["jobs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn staff_list_applications_per_posting() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let job = ctx.store.seed_job("Busy Role", true, None);
    let other_job = ctx.store.seed_job("Quiet Role", true, None);

    let base = Utc::now() - Duration::hours(3);
    for i in 0..3i64 {
        let user = ctx
            .store
            .seed_user(&format!("app{i}@example.com"), "applicant");
        ctx.store.seed_profile(user.id, "App", "Licant", None);
        ctx.store
            .seed_application_at(user.id, job.id, "Submitted", base + Duration::hours(i));
    }
    let outsider = ctx.store.seed_user("elsewhere@example.com", "applicant");
    ctx.store.seed_profile(outsider.id, "Else", "Where", None);
    ctx.store
        .seed_application_at(outsider.id, other_job.id, "Submitted", Utc::now());

    let (status, body) = request(
        &ctx.app,
        "GET",
        &format!("/api/admin/jobs/{}/applications", job.id),
        Some(&token_for(admin.id, "admin")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["data"]["applications"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    // Newest first.
    assert_eq!(rows[0]["email"], "app2@example.com");
    assert_eq!(body["data"]["pagination"]["total"], 3);
}
