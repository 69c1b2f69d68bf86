use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        application_dto::{ApplicationListQuery, ApplicationListResponse},
        job_dto::{CreateJobPayload, JobListQuery, JobListResponse, JobResponse, UpdateJobPayload},
        ApiResponse,
    },
    error::Result,
    policy::Principal,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("job_type" = Option<String>, Query, description = "Filter by job type"),
        ("experience_level" = Option<String>, Query, description = "Filter by experience tier"),
        ("search" = Option<String>, Query, description = "Search in title and description")
    ),
    responses(
        (status = 200, description = "List of job postings open for applications")
    )
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let principal = principal.map(|Extension(p)| p);
    let (jobs, pagination) = state.jobs.list(query, principal.as_ref()).await?;
    Ok(Json(ApiResponse::ok(
        "Jobs retrieved successfully",
        JobListResponse { jobs, pagination },
    )))
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job posting ID")),
    responses(
        (status = 200, description = "Job posting found"),
        (status = 404, description = "Job posting not found or closed")
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let principal = principal.map(|Extension(p)| p);
    let job = state.jobs.get(id, principal.as_ref()).await?;
    Ok(Json(ApiResponse::ok(
        "Job retrieved successfully",
        JobResponse { job },
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/jobs",
    responses(
        (status = 201, description = "Job posting created"),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Staff role required")
    )
)]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.jobs.create(&principal, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Job posting created successfully",
            JobResponse { job },
        )),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/admin/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job posting ID")),
    responses(
        (status = 200, description = "Job posting updated"),
        (status = 404, description = "Job posting not found")
    )
)]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.jobs.update(&principal, id, payload).await?;
    Ok(Json(ApiResponse::ok(
        "Job posting updated successfully",
        JobResponse { job },
    )))
}

#[utoipa::path(
    delete,
    path = "/api/admin/jobs/{id}",
    params(("id" = Uuid, Path, description = "Job posting ID")),
    responses(
        (status = 200, description = "Job posting deleted"),
        (status = 404, description = "Job posting not found")
    )
)]
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.jobs.delete(&principal, id).await?;
    Ok(Json(ApiResponse::message_only(
        "Job posting deleted successfully",
    )))
}

/// Staff view of everyone who applied to one posting.
pub async fn list_job_applications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let (applications, pagination) = state
        .applications
        .list_for_job(&principal, id, query)
        .await?;
    Ok(Json(ApiResponse::ok(
        "Applications retrieved successfully",
        ApplicationListResponse {
            applications,
            pagination,
        },
    )))
}
