use std::sync::Arc;

use uuid::Uuid;

use crate::dto::admin_dto::{
    DeleteUserResponse, RoleChangeResponse, UpdateRolePayload, UserDetailResponse,
    UserListQuery,
};
use crate::dto::Pagination;
use crate::error::{Error, Result};
use crate::models::user::UserOverview;
use crate::policy::{permits, Operation, Principal, Role};
use crate::store::{ApplicationFilter, Page, Store, UserFilter};

/// User administration: role changes and account removal with its cascade.
#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn Store>,
}

impl AdminService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Removes the target's applications, profile, and user row as one
    /// transaction. A principal cannot delete itself, and super_admin
    /// accounts cannot be deleted by anyone.
    pub async fn delete_user(
        &self,
        principal: &Principal,
        target_id: Uuid,
    ) -> Result<DeleteUserResponse> {
        if !permits(principal.role, Operation::DeleteUser) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let target = self
            .store
            .fetch_user(target_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;

        if target.id == principal.id {
            return Err(Error::BadRequest(
                "You cannot delete your own account".into(),
            ));
        }
        if Role::parse(&target.role) == Some(Role::SuperAdmin) {
            return Err(Error::Forbidden(
                "Cannot delete super admin accounts".into(),
            ));
        }

        self.store.delete_user_cascade(target_id).await?;

        tracing::info!(user_id = %target_id, email = %target.email, "user deleted");

        Ok(DeleteUserResponse {
            deleted_user_id: target.id,
            deleted_user_email: target.email,
        })
    }

    pub async fn set_user_role(
        &self,
        principal: &Principal,
        target_id: Uuid,
        payload: UpdateRolePayload,
    ) -> Result<RoleChangeResponse> {
        if !permits(principal.role, Operation::ChangeUserRole) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let new_role = Role::parse(&payload.role).ok_or_else(|| {
            Error::BadRequest("Invalid role. Must be applicant, admin, or super_admin".into())
        })?;

        let target = self
            .store
            .fetch_user(target_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;

        let updated = self.store.update_user_role(target_id, new_role.as_str()).await?;
        if !updated {
            return Err(Error::NotFound("User not found".into()));
        }

        Ok(RoleChangeResponse {
            user_id: target.id,
            email: target.email,
            new_role: new_role.as_str().to_string(),
        })
    }

    pub async fn list_users(
        &self,
        principal: &Principal,
        query: UserListQuery,
    ) -> Result<(Vec<UserOverview>, Pagination)> {
        if !permits(principal.role, Operation::ListUsers) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(10).clamp(1, 100);

        let (items, total) = self
            .store
            .list_users(UserFilter {
                role: query.role,
                experience_level: query.experience_level,
                search: query.search,
                page: Page {
                    limit,
                    offset: (page - 1) * limit,
                },
            })
            .await?;

        Ok((items, Pagination::new(page, limit, total)))
    }

    pub async fn get_user_detail(
        &self,
        principal: &Principal,
        target_id: Uuid,
    ) -> Result<UserDetailResponse> {
        if !permits(principal.role, Operation::ViewUserDetail) {
            return Err(Error::Forbidden(
                "Access denied. Insufficient permissions.".into(),
            ));
        }

        let user = self
            .store
            .fetch_user_detail(target_id)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".into()))?;

        let (applications, _total) = self
            .store
            .list_user_applications(
                target_id,
                ApplicationFilter {
                    status: None,
                    page: Page {
                        limit: 100,
                        offset: 0,
                    },
                },
            )
            .await?;

        Ok(UserDetailResponse { user, applications })
    }
}
