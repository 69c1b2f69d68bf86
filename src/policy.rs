//! Access policy: a pure predicate from (role, operation) to allowed/denied.
//!
//! Every core operation receives an explicit [`Principal`] and asks
//! [`permits`] before touching the store. There is no session state and no
//! caching; the answer is recomputed on every call.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Applicant,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Applicant, Role::Admin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Applicant => "applicant",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "applicant" => Some(Role::Applicant),
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    /// The admin capability set; super_admin is a superset of admin.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations the core recognizes. Routing and services consult the same
/// predicate rather than re-deriving role disjunctions at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SubmitApplication,
    ListOwnApplications,
    ViewOwnApplication,
    WithdrawOwnApplication,
    ListAllApplications,
    ViewAnyApplication,
    ChangeApplicationStatus,
    ViewApplicationHistory,
    ManageJobPostings,
    ListUsers,
    ViewUserDetail,
    DeleteUser,
    ChangeUserRole,
    ViewDashboard,
}

pub fn permits(role: Role, operation: Operation) -> bool {
    match operation {
        Operation::SubmitApplication
        | Operation::ListOwnApplications
        | Operation::ViewOwnApplication
        | Operation::WithdrawOwnApplication => true,
        Operation::ListAllApplications
        | Operation::ViewAnyApplication
        | Operation::ChangeApplicationStatus
        | Operation::ViewApplicationHistory
        | Operation::ManageJobPostings
        | Operation::ListUsers
        | Operation::ViewUserDetail
        | Operation::DeleteUser
        | Operation::ChangeUserRole
        | Operation::ViewDashboard => role.is_staff(),
    }
}

/// The authenticated actor behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}
