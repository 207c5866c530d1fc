//! Flat listing projections and user writes.

use crate::backend::mappers::{map_role, map_status, map_task_event, map_user};
use crate::backend::{find_requested, Backend, BackendResult};
use crate::model::dto::{
    GetRoleResponse, GetStatusesResponse, GetTaskEventResponse, GetUserResponse, GetUsersResponse,
};
use crate::model::entity::{RoleId, UserEntity};
use log::info;

impl Backend<'_> {
    /// Lists users in store order, passwords stripped.
    pub fn get_users(&self) -> BackendResult<GetUsersResponse> {
        Ok(self.store.get_all_users().iter().map(map_user).collect())
    }

    /// Appends a user and returns its password-free projection.
    pub fn add_user(&self, record: UserEntity) -> BackendResult<GetUserResponse> {
        let projected = map_user(&record);
        let id = self.store.add_user(record)?;
        info!("event=user_added module=backend status=ok user_id={id}");
        Ok(projected)
    }

    pub fn get_statuses(&self) -> BackendResult<GetStatusesResponse> {
        Ok(self.store.get_all_statuses().iter().map(map_status).collect())
    }

    pub fn get_roles(&self) -> BackendResult<Vec<GetRoleResponse>> {
        Ok(self.store.get_all_roles().iter().map(map_role).collect())
    }

    pub fn get_role(&self, role_id: RoleId) -> BackendResult<GetRoleResponse> {
        let role = find_requested(&self.store.get_all_roles(), role_id)?;
        Ok(map_role(&role))
    }

    /// Lists every task history entry in store order.
    pub fn get_task_histories(&self) -> BackendResult<Vec<GetTaskEventResponse>> {
        Ok(self
            .store
            .get_all_task_histories()
            .iter()
            .map(map_task_event)
            .collect())
    }
}
