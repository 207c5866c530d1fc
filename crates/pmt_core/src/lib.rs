//! Data-access core for the project/task manager.
//! Holds the in-memory entity store, the projections built on it and the
//! reactive services that publish those projections.

pub mod backend;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use backend::{Action, Backend, BackendError, BackendResult, Clock, PermissionPolicy};
pub use config::{ConfigError, Environment, LogLevel};
pub use logging::{default_log_level, init_logging, init_logging_for, logging_status, LoggingError};
pub use model::dto::{
    GetProjectDetailsResponse, GetProjectMemberResponse, GetProjectSummaryResponse,
    GetRoleResponse, GetStatusesResponse, GetTaskDetailsResponse, GetTaskEventResponse,
    GetUserResponse, GetUsersResponse, PatchTaskRequest, PostProjectRequest, PostTaskRequest,
    StatusResponse, Task,
};
pub use model::entity::{EntityKind, ValidationError};
pub use service::accessor::{Accessor, Snapshot};
pub use service::project_service::{ProjectDetailsService, ProjectService};
pub use service::reference_service::{RoleService, StatusService};
pub use service::signal::{Signal, SubscriptionId};
pub use service::task_history_service::TaskHistoryService;
pub use service::task_service::{TaskDetailsService, TaskService};
pub use service::user_service::UserService;
pub use store::{EntityStore, InMemoryStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
