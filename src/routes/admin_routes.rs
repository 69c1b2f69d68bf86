use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        admin_dto::{UpdateRolePayload, UserListQuery, UserListResponse},
        application_dto::{
            AdminApplicationListQuery, ApplicationListResponse, ApplicationResponse,
            UpdateStatusPayload,
        },
        ApiResponse,
    },
    error::Result,
    policy::Principal,
    AppState,
};

pub async fn list_all_applications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<AdminApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let (applications, pagination) = state.applications.list_all(&principal, query).await?;
    Ok(Json(ApiResponse::ok(
        "Applications retrieved successfully",
        ApplicationListResponse {
            applications,
            pagination,
        },
    )))
}

pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.reviews.update_status(&principal, id, payload).await?;
    Ok(Json(ApiResponse::ok(
        "Application status updated successfully",
        ApplicationResponse { application },
    )))
}

pub async fn get_application_history(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let history = state.reviews.history(&principal, id).await?;
    Ok(Json(ApiResponse::ok(
        "Application history retrieved successfully",
        history,
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("experience_level" = Option<String>, Query, description = "Filter by profile tier"),
        ("search" = Option<String>, Query, description = "Search email, name, skills")
    ),
    responses(
        (status = 200, description = "Users retrieved"),
        (status = 403, description = "Staff role required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse> {
    let (users, pagination) = state.admin.list_users(&principal, query).await?;
    Ok(Json(ApiResponse::ok(
        "Users retrieved successfully",
        UserListResponse { users, pagination },
    )))
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.admin.get_user_detail(&principal, id).await?;
    Ok(Json(ApiResponse::ok("User retrieved successfully", detail)))
}

pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let change = state.admin.set_user_role(&principal, id, payload).await?;
    Ok(Json(ApiResponse::ok(
        format!("User role updated to {} successfully", change.new_role),
        change,
    )))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let deleted = state.admin.delete_user(&principal, id).await?;
    Ok(Json(ApiResponse::ok("User deleted successfully", deleted)))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard statistics snapshot"),
        (status = 403, description = "Staff role required")
    )
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse> {
    let stats = state.dashboard.stats(&principal).await?;
    Ok(Json(ApiResponse::ok(
        "Dashboard stats retrieved successfully",
        stats,
    )))
}
