mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use common::{request, setup, token_for, TestContext};
use job_portal_backend::store::Store;

struct Reviewed {
    ctx: TestContext,
    admin_token: String,
    admin_id: Uuid,
    application_id: Uuid,
}

fn seed_reviewable() -> Reviewed {
    let ctx = setup();
    let applicant = ctx.store.seed_user("jane@example.com", "applicant");
    ctx.store
        .seed_profile(applicant.id, "Jane", "Doe", Some("Junior"));
    let job = ctx.store.seed_job("Backend Engineer", true, None);
    let application =
        ctx.store
            .seed_application_at(applicant.id, job.id, "Submitted", Utc::now());
    let admin = ctx.store.seed_user("admin@example.com", "admin");
    let admin_token = token_for(admin.id, "admin");
    Reviewed {
        ctx,
        admin_token,
        admin_id: admin.id,
        application_id: application.id,
    }
}

#[tokio::test]
async fn update_appends_exactly_one_ledger_entry() {
    let r = seed_reviewable();
    let uri = format!("/api/admin/applications/{}/status", r.application_id);

    let (status, body) = request(
        &r.ctx.app,
        "PATCH",
        &uri,
        Some(&r.admin_token),
        Some(json!({"status": "Under Review", "admin_notes": "Looks promising"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Application status updated successfully");
    assert_eq!(body["data"]["application"]["status"], "Under Review");
    assert_eq!(body["data"]["application"]["admin_notes"], "Looks promising");

    let history = r
        .ctx
        .store
        .list_history(r.application_id)
        .await
        .expect("history read");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].new_status, "Under Review");
    assert_eq!(history[0].changed_by, r.admin_id);
    assert_eq!(
        history[0].notes,
        "Status changed to: Under Review. Notes: Looks promising"
    );

    let sent = r.ctx.sink.delivered();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "jane@example.com");
    assert_eq!(sent[0].payload["status"], "Under Review");
    assert_eq!(sent[0].payload["admin_notes"], "Looks promising");
    assert_eq!(sent[0].payload["job_title"], "Backend Engineer");
}

#[tokio::test]
async fn every_transition_logs_once_including_reversals() {
    let r = seed_reviewable();
    let uri = format!("/api/admin/applications/{}/status", r.application_id);

    // Forward, terminal, and backwards again: all permitted, all audited.
    let sequence = ["Under Review", "Shortlisted", "Accepted", "Under Review", "Rejected"];
    for status_value in sequence {
        let (status, _) = request(
            &r.ctx.app,
            "PATCH",
            &uri,
            Some(&r.admin_token),
            Some(json!({"status": status_value})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let history = r
        .ctx
        .store
        .list_history(r.application_id)
        .await
        .expect("history read");
    assert_eq!(history.len(), sequence.len());
    let logged: Vec<&str> = history.iter().map(|entry| entry.new_status.as_str()).collect();
    assert_eq!(logged, sequence);
    assert_eq!(r.ctx.sink.delivered().len(), sequence.len());
}

#[tokio::test]
async fn unrecognized_status_is_rejected_without_side_effects() {
    let r = seed_reviewable();
    let uri = format!("/api/admin/applications/{}/status", r.application_id);

    let (status, body) = request(
        &r.ctx.app,
        "PATCH",
        &uri,
        Some(&r.admin_token),
        Some(json!({"status": "Hired"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let history = r
        .ctx
        .store
        .list_history(r.application_id)
        .await
        .expect("history read");
    assert!(history.is_empty());
    assert!(r.ctx.sink.delivered().is_empty());
}

#[tokio::test]
async fn unrecognized_level_and_offer_are_rejected() {
    let r = seed_reviewable();
    let uri = format!("/api/admin/applications/{}/status", r.application_id);

    let (status, _) = request(
        &r.ctx.app,
        "PATCH",
        &uri,
        Some(&r.admin_token),
        Some(json!({"status": "Accepted", "assigned_level": "Principal"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &r.ctx.app,
        "PATCH",
        &uri,
        Some(&r.admin_token),
        Some(json!({"status": "Accepted", "offer_type": "Contract"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn assigned_level_and_offer_type_are_persisted() {
    let r = seed_reviewable();
    let uri = format!("/api/admin/applications/{}/status", r.application_id);

    let (status, body) = request(
        &r.ctx.app,
        "PATCH",
        &uri,
        Some(&r.admin_token),
        Some(json!({
            "status": "Accepted",
            "admin_notes": "Welcome aboard",
            "assigned_level": "Senior",
            "offer_type": "Full-time Employment"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let application = &body["data"]["application"];
    assert_eq!(application["assigned_level"], "Senior");
    assert_eq!(application["offer_type"], "Full-time Employment");
}

#[tokio::test]
async fn missing_application_is_not_found() {
    let r = seed_reviewable();
    let uri = format!("/api/admin/applications/{}/status", Uuid::new_v4());

    let (status, _) = request(
        &r.ctx.app,
        "PATCH",
        &uri,
        Some(&r.admin_token),
        Some(json!({"status": "Accepted"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn applicants_cannot_drive_the_review_workflow() {
    let r = seed_reviewable();
    let applicant = r.ctx.store.seed_user("sneaky@example.com", "applicant");
    let uri = format!("/api/admin/applications/{}/status", r.application_id);

    let (status, _) = request(
        &r.ctx.app,
        "PATCH",
        &uri,
        Some(&token_for(applicant.id, "applicant")),
        Some(json!({"status": "Accepted"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let history = r
        .ctx
        .store
        .list_history(r.application_id)
        .await
        .expect("history read");
    assert!(history.is_empty());
}

#[tokio::test]
async fn sink_failure_never_fails_the_transition() {
    let r = seed_reviewable();
    let uri = format!("/api/admin/applications/{}/status", r.application_id);

    r.ctx.sink.fail_next_delivery();
    let (status, body) = request(
        &r.ctx.app,
        "PATCH",
        &uri,
        Some(&r.admin_token),
        Some(json!({"status": "Shortlisted"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["application"]["status"], "Shortlisted");

    // The transition committed and was audited even though delivery failed.
    let history = r
        .ctx
        .store
        .list_history(r.application_id)
        .await
        .expect("history read");
    assert_eq!(history.len(), 1);
    assert!(r.ctx.sink.delivered().is_empty());
}

#[tokio::test]
async fn history_endpoint_returns_the_ledger_in_order() {
    let r = seed_reviewable();
    let status_uri = format!("/api/admin/applications/{}/status", r.application_id);
    for status_value in ["Under Review", "Shortlisted"] {
        let (status, _) = request(
            &r.ctx.app,
            "PATCH",
            &status_uri,
            Some(&r.admin_token),
            Some(json!({"status": status_value})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let history_uri = format!("/api/admin/applications/{}/history", r.application_id);
    let (status, body) = request(&r.ctx.app, "GET", &history_uri, Some(&r.admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["new_status"], "Under Review");
    assert_eq!(entries[1]["new_status"], "Shortlisted");

    // Ledger for an unknown application is a 404, and applicants never see it.
    let missing_uri = format!("/api/admin/applications/{}/history", Uuid::new_v4());
    let (status, _) = request(&r.ctx.app, "GET", &missing_uri, Some(&r.admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
