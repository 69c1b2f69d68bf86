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
        application_dto::{
            ApplicationListQuery, ApplicationListResponse, ApplicationResponse,
            SubmitApplicationPayload,
        },
        ApiResponse,
    },
    error::Result,
    policy::Principal,
    AppState,
};

pub async fn submit_application(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SubmitApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.applications.submit(&principal, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Application submitted successfully",
            ApplicationResponse { application },
        )),
    ))
}

pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let (applications, pagination) = state.applications.list_for_user(&principal, query).await?;
    Ok(Json(ApiResponse::ok(
        "Applications retrieved successfully",
        ApplicationListResponse {
            applications,
            pagination,
        },
    )))
}

pub async fn get_application(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.applications.get(&principal, id).await?;
    Ok(Json(ApiResponse::ok(
        "Application retrieved successfully",
        ApplicationResponse { application },
    )))
}

pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.applications.withdraw(&principal, id).await?;
    Ok(Json(ApiResponse::message_only(
        "Application withdrawn successfully",
    )))
}
