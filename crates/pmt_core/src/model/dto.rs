//! Read-facing response shapes.
//!
//! Field names serialize in camelCase and absent optionals are omitted, so a
//! real HTTP backend can later return the same JSON documents.

use crate::model::entity::{
    ProjectId, RoleId, StatusId, TaskEntity, TaskHistoryId, TaskId, UserId,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub id: StatusId,
    pub name: String,
}

pub type GetStatusesResponse = Vec<StatusResponse>;

/// User projection. Has no password field by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

pub type GetUsersResponse = Vec<GetUserResponse>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRoleResponse {
    pub id: RoleId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProjectMemberResponse {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role_id: RoleId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub delete_project: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProjectSummaryResponse {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusResponse>,
    pub permissions: Permissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailsPermissions {
    pub delete_project: bool,
    pub add_member: bool,
    pub delete_member: bool,
    pub assign_task: bool,
    pub add_task: bool,
    pub delete_task: bool,
    pub assign_member: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemberResponse {
    pub project_id: ProjectId,
    pub user: GetUserResponse,
    pub role: GetRoleResponse,
}

/// Task row embedded in project details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTaskResponse {
    pub id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: u32,
    pub assignee_id: UserId,
    pub status: StatusResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProjectDetailsResponse {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: StatusResponse,
    pub project_members: Vec<ProjectMemberResponse>,
    pub tasks: Vec<ProjectTaskResponse>,
    pub permissions: ProjectDetailsPermissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailsPermissions {
    pub edit_task: bool,
}

/// Parent project embedded in task details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskProjectResponse {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub status: StatusResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHistoryResponse {
    pub id: TaskHistoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTaskDetailsResponse {
    pub id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: u32,
    pub assignee: GetUserResponse,
    pub status: StatusResponse,
    pub project: TaskProjectResponse,
    /// Sorted by `date` ascending, then `id` ascending.
    pub task_history: Vec<TaskHistoryResponse>,
    pub permissions: TaskDetailsPermissions,
}

/// Flat task history listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTaskEventResponse {
    pub id: TaskHistoryId,
    pub task_id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDateTime,
}

/// Bare task record shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: u32,
    pub assignee_id: UserId,
    pub status_id: StatusId,
}

impl From<&TaskEntity> for Task {
    fn from(entity: &TaskEntity) -> Self {
        Self {
            id: entity.id,
            project_id: entity.project_id,
            name: entity.name.clone(),
            description: entity.description.clone(),
            due_date: entity.due_date,
            priority: entity.priority,
            assignee_id: entity.assignee_id,
            status_id: entity.status_id,
        }
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub status_id: StatusId,
}

/// Input for creating a task. Status is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTaskRequest {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: u32,
    pub assignee_id: UserId,
}

/// Partial task update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchTaskRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    #[serde(default)]
    pub status_id: Option<StatusId>,
}
