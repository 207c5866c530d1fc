//! Stored entity records.
//!
//! # Responsibility
//! - Define the simplified relational schema held by the entity store.
//! - Provide `validate()` helpers enforced by every store write.
//!
//! # Invariants
//! - Ids are non-zero and unique per entity kind.
//! - `ProjectEntity::end_date` is never earlier than `start_date`.
//! - `StatusEntity` is one closed vocabulary shared by projects and tasks.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub type UserId = u32;
pub type RoleId = u32;
pub type StatusId = u32;
pub type ProjectId = u32;
pub type TaskId = u32;
pub type TaskHistoryId = u32;

/// Entity kind discriminator used in errors and id allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Role,
    Status,
    Project,
    ProjectMember,
    Task,
    TaskHistory,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Role => "role",
            Self::Status => "status",
            Self::Project => "project",
            Self::ProjectMember => "project_member",
            Self::Task => "task",
            Self::TaskHistory => "task_history",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record kinds addressed by a single numeric id.
pub trait Identified {
    const KIND: EntityKind;
    fn id(&self) -> u32;
}

macro_rules! identified {
    ($($ty:ty => $kind:expr),+ $(,)?) => {
        $(
            impl Identified for $ty {
                const KIND: EntityKind = $kind;
                fn id(&self) -> u32 {
                    self.id
                }
            }
        )+
    };
}

identified!(
    UserEntity => EntityKind::User,
    RoleEntity => EntityKind::Role,
    StatusEntity => EntityKind::Status,
    ProjectEntity => EntityKind::Project,
    TaskEntity => EntityKind::Task,
    TaskHistoryEntity => EntityKind::TaskHistory,
);

/// Write-time validation failure for one entity record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Id `0` is reserved and never assigned.
    ZeroId(EntityKind),
    /// A required text field is blank after trim.
    BlankField {
        kind: EntityKind,
        field: &'static str,
    },
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Project end date precedes its start date.
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId(kind) => write!(f, "{kind} id must be non-zero"),
            Self::BlankField { kind, field } => {
                write!(f, "{kind}.{field} must not be blank")
            }
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "end date {end} is earlier than start date {start}")
            }
        }
    }
}

impl Error for ValidationError {}

fn require_id(kind: EntityKind, id: u32) -> Result<(), ValidationError> {
    if id == 0 {
        return Err(ValidationError::ZeroId(kind));
    }
    Ok(())
}

fn require_text(kind: EntityKind, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { kind, field });
    }
    Ok(())
}

/// Application user. `password` never leaves the store through a DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntity {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserEntity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(EntityKind::User, self.id)?;
        require_text(EntityKind::User, "username", &self.username)?;
        require_text(EntityKind::User, "email", &self.email)?;
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        if self.password.is_empty() {
            return Err(ValidationError::BlankField {
                kind: EntityKind::User,
                field: "password",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEntity {
    pub id: RoleId,
    pub name: String,
}

impl RoleEntity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(EntityKind::Role, self.id)?;
        require_text(EntityKind::Role, "name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntity {
    pub id: StatusId,
    pub name: String,
}

impl StatusEntity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(EntityKind::Status, self.id)?;
        require_text(EntityKind::Status, "name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntity {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    /// Open-ended projects have no end date.
    pub end_date: Option<NaiveDate>,
    pub status_id: StatusId,
}

impl ProjectEntity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(EntityKind::Project, self.id)?;
        require_text(EntityKind::Project, "name", &self.name)?;
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(ValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

/// Join record linking one user to one project with one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMemberEntity {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role_id: RoleId,
}

impl ProjectMemberEntity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(EntityKind::Project, self.project_id)?;
        require_id(EntityKind::User, self.user_id)?;
        require_id(EntityKind::Role, self.role_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntity {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    /// Lower value means higher priority.
    pub priority: u32,
    pub assignee_id: UserId,
    pub status_id: StatusId,
}

impl TaskEntity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(EntityKind::Task, self.id)?;
        require_id(EntityKind::Project, self.project_id)?;
        require_text(EntityKind::Task, "name", &self.name)?;
        require_id(EntityKind::User, self.assignee_id)?;
        require_id(EntityKind::Status, self.status_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryEntity {
    pub id: TaskHistoryId,
    pub task_id: TaskId,
    pub name: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

impl TaskHistoryEntity {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_id(EntityKind::TaskHistory, self.id)?;
        require_id(EntityKind::Task, self.task_id)?;
        require_text(EntityKind::TaskHistory, "name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityKind, ProjectEntity, UserEntity, ValidationError};
    use chrono::NaiveDate;

    fn user(email: &str) -> UserEntity {
        UserEntity {
            id: 7,
            username: "dana".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn user_email_must_have_domain() {
        assert!(user("dana@example.com").validate().is_ok());
        let err = user("dana@localhost").validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidEmail("dana@localhost".into()));
    }

    #[test]
    fn blank_username_is_rejected() {
        let mut record = user("dana@example.com");
        record.username = "   ".to_string();
        assert_eq!(
            record.validate().unwrap_err(),
            ValidationError::BlankField {
                kind: EntityKind::User,
                field: "username"
            }
        );
    }

    #[test]
    fn project_end_cannot_precede_start() {
        let project = ProjectEntity {
            id: 1,
            name: "Gamma".to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 4, 1),
            status_id: 1,
        };
        assert!(matches!(
            project.validate(),
            Err(ValidationError::EndBeforeStart { .. })
        ));
    }
}
