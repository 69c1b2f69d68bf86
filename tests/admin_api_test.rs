mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use common::{request, setup, token_for};
use job_portal_backend::store::Store;

#[tokio::test]
async fn delete_user_cascades_applications_and_profile() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let target = ctx.store.seed_user("target@example.com", "applicant");
    ctx.store.seed_profile(target.id, "Tar", "Get", None);
    for i in 0..3 {
        let job = ctx.store.seed_job(&format!("Job {i}"), true, None);
        ctx.store
            .seed_application_at(target.id, job.id, "Submitted", Utc::now());
    }

    let (status, body) = request(
        &ctx.app,
        "DELETE",
        &format!("/api/admin/users/{}", target.id),
        Some(&token_for(admin.id, "admin")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
    assert_eq!(body["data"]["deleted_user_email"], "target@example.com");

    assert_eq!(ctx.store.application_count_for(target.id), 0);
    assert_eq!(ctx.store.profile_count(), 0);
    let gone = ctx.store.fetch_user(target.id).await.expect("user read");
    assert!(gone.is_none());
}

#[tokio::test]
async fn principals_cannot_delete_themselves() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");

    let (status, body) = request(
        &ctx.app,
        "DELETE",
        &format!("/api/admin/users/{}", admin.id),
        Some(&token_for(admin.id, "admin")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You cannot delete your own account");
    assert_eq!(ctx.store.user_count(), 1);
}

#[tokio::test]
async fn super_admin_accounts_cannot_be_deleted() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let root = ctx.store.seed_user("root@example.com", "super_admin");

    let (status, body) = request(
        &ctx.app,
        "DELETE",
        &format!("/api/admin/users/{}", root.id),
        Some(&token_for(admin.id, "admin")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot delete super admin accounts");
    assert_eq!(ctx.store.user_count(), 2);
}

#[tokio::test]
async fn failed_cascade_is_all_or_nothing() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let target = ctx.store.seed_user("target@example.com", "applicant");
    ctx.store.seed_profile(target.id, "Tar", "Get", None);
    for i in 0..2 {
        let job = ctx.store.seed_job(&format!("Job {i}"), true, None);
        ctx.store
            .seed_application_at(target.id, job.id, "Submitted", Utc::now());
    }

    ctx.store.fail_next_write();
    let (status, body) = request(
        &ctx.app,
        "DELETE",
        &format!("/api/admin/users/{}", target.id),
        Some(&token_for(admin.id, "admin")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    // Nothing was removed: user, profile, and both applications remain.
    assert!(ctx.store.fetch_user(target.id).await.expect("user read").is_some());
    assert_eq!(ctx.store.profile_count(), 1);
    assert_eq!(ctx.store.application_count_for(target.id), 2);
}

#[tokio::test]
async fn role_update_validates_role_and_target() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let target = ctx.store.seed_user("promote@example.com", "applicant");
    let token = token_for(admin.id, "admin");

    let (status, body) = request(
        &ctx.app,
        "PUT",
        &format!("/api/admin/users/{}/role", target.id),
        Some(&token),
        Some(json!({"role": "moderator"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Invalid role. Must be applicant, admin, or super_admin"
    );

    let (status, _) = request(
        &ctx.app,
        "PUT",
        &format!("/api/admin/users/{}/role", Uuid::new_v4()),
        Some(&token),
        Some(json!({"role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = request(
        &ctx.app,
        "PUT",
        &format!("/api/admin/users/{}/role", target.id),
        Some(&token),
        Some(json!({"role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User role updated to admin successfully");
    assert_eq!(body["data"]["new_role"], "admin");

    let updated = ctx
        .store
        .fetch_user(target.id)
        .await
        .expect("user read")
        .expect("user present");
    assert_eq!(updated.role, "admin");
}

#[tokio::test]
async fn dashboard_reports_the_aggregation_scenario() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");

    // 3 postings: 2 active, 1 inactive.
    let open_a = ctx.store.seed_job("Open A", true, None);
    let open_b = ctx.store.seed_job("Open B", true, None);
    let paused = ctx.store.seed_job("Paused", false, None);

    // 5 applications: 3 Submitted, 1 Under Review, 1 Rejected.
    let seeds = [
        ("s1@example.com", open_a.id, "Submitted", Some("Junior")),
        ("s2@example.com", open_a.id, "Submitted", Some("Junior")),
        ("s3@example.com", open_b.id, "Submitted", None),
        ("r1@example.com", open_b.id, "Under Review", Some("Senior")),
        ("x1@example.com", paused.id, "Rejected", None),
    ];
    let now = Utc::now();
    for (email, job_id, status, level) in seeds {
        let user = ctx.store.seed_user(email, "applicant");
        ctx.store.seed_profile(user.id, "App", "Licant", level);
        ctx.store.seed_application_at(user.id, job_id, status, now);
    }

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/admin/dashboard/stats",
        Some(&token_for(admin.id, "admin")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["stats"]["total_applicants"], 5);
    assert_eq!(data["stats"]["total_jobs"], 3);
    assert_eq!(data["stats"]["total_applications"], 5);
    assert_eq!(data["stats"]["active_jobs"], 2);
    assert_eq!(data["stats"]["pending_applications"], 4);

    let histogram = data["application_status"].as_array().unwrap();
    let histogram_total: i64 = histogram
        .iter()
        .map(|row| row["count"].as_i64().unwrap())
        .sum();
    assert_eq!(histogram_total, 5);

    let recent = data["recent_applications"].as_array().unwrap();
    assert_eq!(recent.len(), 5);

    // Only active postings compete for the top-5 list.
    let popular = data["popular_jobs"].as_array().unwrap();
    assert_eq!(popular.len(), 2);
    for row in popular {
        assert_ne!(row["title"], "Paused");
        assert_eq!(row["application_count"], 2);
    }

    let trends = data["monthly_trends"].as_array().unwrap();
    let trend_total: i64 = trends.iter().map(|row| row["count"].as_i64().unwrap()).sum();
    assert_eq!(trend_total, 5);

    let levels = data["level_distribution"].as_array().unwrap();
    let junior = levels
        .iter()
        .find(|row| row["level"] == "Junior")
        .expect("junior bucket");
    assert_eq!(junior["count"], 2);
    let unspecified = levels
        .iter()
        .find(|row| row["level"] == "Not Specified")
        .expect("not-specified bucket");
    assert_eq!(unspecified["count"], 2);
}

#[tokio::test]
async fn admin_surface_is_closed_to_applicants() {
    let ctx = setup();
    let applicant = ctx.store.seed_user("user@example.com", "applicant");
    let token = token_for(applicant.id, "applicant");

    for uri in [
        "/api/admin/dashboard/stats",
        "/api/admin/users",
        "/api/admin/applications",
    ] {
        let (status, body) = request(&ctx.app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "expected 403 for {uri}");
        assert_eq!(body["message"], "Access denied. Insufficient permissions.");
    }
}

#[tokio::test]
async fn admin_application_listing_supports_filters() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let token = token_for(admin.id, "admin");

    let job_a = ctx.store.seed_job("Job A", true, None);
    let job_b = ctx.store.seed_job("Job B", true, None);
    let now = Utc::now();

    let alice = ctx.store.seed_user("alice@example.com", "applicant");
    ctx.store.seed_profile(alice.id, "Alice", "Smith", Some("Senior"));
    ctx.store.seed_application_at(alice.id, job_a.id, "Submitted", now);

    let bob = ctx.store.seed_user("bob@example.com", "applicant");
    ctx.store.seed_profile(bob.id, "Bob", "Jones", Some("Junior"));
    ctx.store.seed_application_at(bob.id, job_b.id, "Shortlisted", now);

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/admin/applications?status=Shortlisted",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"]["applications"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "bob@example.com");

    let (status, body) = request(
        &ctx.app,
        "GET",
        &format!("/api/admin/applications?job_id={}", job_a.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"]["applications"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "alice@example.com");

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/admin/applications?experience_level=Senior",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"]["applications"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["first_name"], "Alice");

    let today = Utc::now().date_naive();
    let (status, body) = request(
        &ctx.app,
        "GET",
        &format!("/api/admin/applications?start_date={today}&end_date={today}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"]["applications"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn user_listing_and_detail_cover_profiles_and_counts() {
    let ctx = setup();
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let token = token_for(admin.id, "admin");

    let alice = ctx.store.seed_user("alice@example.com", "applicant");
    ctx.store.seed_profile(alice.id, "Alice", "Smith", Some("Senior"));
    let job = ctx.store.seed_job("Job A", true, None);
    let now = Utc::now();
    ctx.store.seed_application_at(alice.id, job.id, "Accepted", now);

    let (status, body) = request(
        &ctx.app,
        "GET",
        "/api/admin/users?role=applicant&search=alice",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "alice@example.com");
    assert_eq!(users[0]["application_count"], 1);

    let (status, body) = request(
        &ctx.app,
        "GET",
        &format!("/api/admin/users/{}", alice.id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let user = &body["data"]["user"];
    assert_eq!(user["first_name"], "Alice");
    assert_eq!(user["total_applications"], 1);
    assert_eq!(user["accepted_applications"], 1);
    assert_eq!(user["rejected_applications"], 0);
    let applications = body["data"]["applications"].as_array().unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["job_title"], "Job A");
}
