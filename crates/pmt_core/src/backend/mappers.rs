//! Entity to DTO field mapping.

use crate::model::dto::{
    GetRoleResponse, GetTaskEventResponse, GetUserResponse, StatusResponse, TaskHistoryResponse,
};
use crate::model::entity::{RoleEntity, StatusEntity, TaskHistoryEntity, UserEntity};

/// Drops the password.
pub(super) fn map_user(user: &UserEntity) -> GetUserResponse {
    GetUserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    }
}

pub(super) fn map_status(status: &StatusEntity) -> StatusResponse {
    StatusResponse {
        id: status.id,
        name: status.name.clone(),
    }
}

pub(super) fn map_role(role: &RoleEntity) -> GetRoleResponse {
    GetRoleResponse {
        id: role.id,
        name: role.name.clone(),
    }
}

pub(super) fn map_task_history(history: &TaskHistoryEntity) -> TaskHistoryResponse {
    TaskHistoryResponse {
        id: history.id,
        name: history.name.clone(),
        description: history.description.clone(),
        date: history.date,
    }
}

pub(super) fn map_task_event(history: &TaskHistoryEntity) -> GetTaskEventResponse {
    GetTaskEventResponse {
        id: history.id,
        task_id: history.task_id,
        name: history.name.clone(),
        description: history.description.clone(),
        date: history.date,
    }
}
