//! Entity store contracts and the in-memory implementation.
//!
//! # Responsibility
//! - Hold the authoritative record sets for every entity kind.
//! - Reject invalid or duplicate records on write.
//!
//! # Invariants
//! - `get_all_*` returns records in insertion order, unfiltered.
//! - Write paths call the entity's `validate()` before mutating.
//! - Removing a project or task cascades to its dependent records.

use crate::model::entity::{
    EntityKind, ProjectEntity, ProjectId, ProjectMemberEntity, RoleEntity, StatusEntity,
    TaskEntity, TaskHistoryEntity, TaskId, UserEntity, UserId, ValidationError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
pub mod seed;

pub use memory::InMemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Entity store write/lookup error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(ValidationError),
    DuplicateId { kind: EntityKind, id: u32 },
    DuplicateMember { project_id: ProjectId, user_id: UserId },
    NotFound { kind: EntityKind, id: u32 },
    MemberNotFound { project_id: ProjectId, user_id: UserId },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId { kind, id } => write!(f, "{kind} id already exists: {id}"),
            Self::DuplicateMember {
                project_id,
                user_id,
            } => write!(
                f,
                "user {user_id} is already a member of project {project_id}"
            ),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::MemberNotFound {
                project_id,
                user_id,
            } => write!(
                f,
                "user {user_id} is not a member of project {project_id}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Data access contract over the entity record sets.
///
/// Methods take `&self`; implementations use interior mutability so one
/// store can be shared by reference across every service in a session.
pub trait EntityStore {
    fn get_all_users(&self) -> Vec<UserEntity>;
    fn get_all_roles(&self) -> Vec<RoleEntity>;
    fn get_all_statuses(&self) -> Vec<StatusEntity>;
    fn get_all_projects(&self) -> Vec<ProjectEntity>;
    fn get_all_project_members(&self) -> Vec<ProjectMemberEntity>;
    fn get_all_tasks(&self) -> Vec<TaskEntity>;
    fn get_all_task_histories(&self) -> Vec<TaskHistoryEntity>;

    fn add_user(&self, record: UserEntity) -> StoreResult<UserId>;
    fn add_role(&self, record: RoleEntity) -> StoreResult<u32>;
    fn add_status(&self, record: StatusEntity) -> StoreResult<u32>;
    fn add_project(&self, record: ProjectEntity) -> StoreResult<ProjectId>;
    fn add_project_member(&self, record: ProjectMemberEntity) -> StoreResult<()>;
    fn add_task(&self, record: TaskEntity) -> StoreResult<TaskId>;
    fn add_task_history(&self, record: TaskHistoryEntity) -> StoreResult<u32>;

    /// Returns the next free id for `kind`: max existing id + 1.
    fn next_id(&self, kind: EntityKind) -> u32;

    /// Replaces a task by id.
    fn update_task(&self, record: TaskEntity) -> StoreResult<()>;

    /// Removes a project with its members, tasks and task histories.
    fn remove_project(&self, id: ProjectId) -> StoreResult<ProjectEntity>;
    /// Removes a task with its histories.
    fn remove_task(&self, id: TaskId) -> StoreResult<TaskEntity>;
    fn remove_project_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> StoreResult<ProjectMemberEntity>;
}
