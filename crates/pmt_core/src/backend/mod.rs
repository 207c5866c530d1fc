//! Query/projection layer over the entity store.
//!
//! # Responsibility
//! - Join stored entities into response DTOs.
//! - Derive per-viewer permission flags.
//! - Run write commands (create/patch/delete) with their history side effects.
//!
//! # Invariants
//! - A required join that cannot be resolved is an `Integrity` error, never a
//!   silently omitted field.
//! - User projections never include passwords.
//! - Listings keep store insertion order.

use crate::model::entity::{
    EntityKind, Identified, ProjectId, ProjectMemberEntity, RoleEntity, TaskId, UserId,
    ValidationError,
};
use crate::store::{EntityStore, StoreError};
use chrono::{Local, NaiveDateTime};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod listing;
mod mappers;
pub mod permissions;
mod project;
mod task;

pub use permissions::{Action, PermissionPolicy};

pub type BackendResult<T> = Result<T, BackendError>;

/// Error surfaced by projections and commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Requested id has no matching entity.
    NotFound { kind: EntityKind, id: u32 },
    /// Requested user is not a member of the project.
    MemberNotFound {
        project_id: ProjectId,
        user_id: UserId,
    },
    /// A stored record references an entity that does not exist.
    Integrity {
        kind: EntityKind,
        id: u32,
        reference: EntityKind,
        reference_id: u32,
    },
    /// A write payload failed entity validation.
    Validation(ValidationError),
    /// The viewer's permissions deny the action.
    Forbidden {
        action: Action,
        project_id: ProjectId,
    },
    /// A patch left every field unchanged.
    NoChanges(TaskId),
    /// Any other store failure.
    Store(StoreError),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::MemberNotFound {
                project_id,
                user_id,
            } => write!(
                f,
                "user {user_id} is not a member of project {project_id}"
            ),
            Self::Integrity {
                kind,
                id,
                reference,
                reference_id,
            } => write!(
                f,
                "{kind} {id} references missing {reference} {reference_id}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Forbidden { action, project_id } => {
                write!(f, "action `{action}` denied on project {project_id}")
            }
            Self::NoChanges(id) => write!(f, "patch does not change task {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
            StoreError::MemberNotFound {
                project_id,
                user_id,
            } => Self::MemberNotFound {
                project_id,
                user_id,
            },
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for BackendError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Timestamp source for history entries written by commands.
pub type Clock = fn() -> NaiveDateTime;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Copyable handle bundling the store, the viewer and the permission policy.
///
/// Every accessor service holds its own copy; all copies share one store.
#[derive(Clone, Copy)]
pub struct Backend<'s> {
    store: &'s dyn EntityStore,
    viewer: Option<UserId>,
    policy: PermissionPolicy,
    clock: Clock,
}

impl<'s> Backend<'s> {
    /// Creates an anonymous backend with the default permission policy.
    pub fn new(store: &'s dyn EntityStore) -> Self {
        Self {
            store,
            viewer: None,
            policy: PermissionPolicy::default(),
            clock: local_now,
        }
    }

    /// Returns a copy computing permissions for `user_id`.
    pub fn with_viewer(self, user_id: UserId) -> Self {
        Self {
            viewer: Some(user_id),
            ..self
        }
    }

    pub fn with_policy(self, policy: PermissionPolicy) -> Self {
        Self { policy, ..self }
    }

    /// Overrides the timestamp source used for history entries.
    pub fn with_clock(self, clock: Clock) -> Self {
        Self { clock, ..self }
    }

    pub fn viewer(&self) -> Option<UserId> {
        self.viewer
    }

    pub fn policy(&self) -> PermissionPolicy {
        self.policy
    }

    pub fn store(&self) -> &'s dyn EntityStore {
        self.store
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Resolves the viewer's role name in one project.
    fn viewer_role(
        &self,
        project_id: ProjectId,
        members: &[ProjectMemberEntity],
        roles: &[RoleEntity],
    ) -> Option<String> {
        let viewer = self.viewer?;
        let member = members
            .iter()
            .find(|pm| pm.project_id == project_id && pm.user_id == viewer)?;
        roles
            .iter()
            .find(|role| role.id == member.role_id)
            .map(|role| role.name.clone())
    }

    /// Fails with `Forbidden` unless the viewer may run `action` on the project.
    fn require(&self, project_id: ProjectId, action: Action) -> BackendResult<()> {
        let role = self.viewer_role(
            project_id,
            &self.store.get_all_project_members(),
            &self.store.get_all_roles(),
        );
        if self.policy.allows(role.as_deref(), action) {
            return Ok(());
        }
        log::warn!(
            "event=permission_denied module=backend status=error action={} project_id={} viewer={:?}",
            action,
            project_id,
            self.viewer
        );
        Err(BackendError::Forbidden { action, project_id })
    }
}

impl std::fmt::Debug for Backend<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("viewer", &self.viewer)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Finds a record by id or reports a `NotFound` for the requested entity.
fn find_requested<T: Identified + Clone>(items: &[T], id: u32) -> BackendResult<T> {
    items
        .iter()
        .find(|item| item.id() == id)
        .cloned()
        .ok_or(BackendError::NotFound { kind: T::KIND, id })
}

/// Resolves a reference held by `owner`, reporting dangling ids as `Integrity`.
fn resolve<'a, T: Identified>(
    items: &'a [T],
    reference_id: u32,
    owner: (EntityKind, u32),
) -> BackendResult<&'a T> {
    items
        .iter()
        .find(|item| item.id() == reference_id)
        .ok_or(BackendError::Integrity {
            kind: owner.0,
            id: owner.1,
            reference: T::KIND,
            reference_id,
        })
}
