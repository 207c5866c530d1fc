//! Accessor services for the closed reference vocabularies (statuses, roles).

use crate::backend::{Backend, BackendError, BackendResult};
use crate::model::dto::{GetRoleResponse, GetStatusesResponse};
use crate::service::accessor::{Accessor, Snapshot};
use crate::service::signal::Signal;

pub struct StatusService<'s> {
    accessor: Accessor<'s, GetStatusesResponse>,
}

impl<'s> StatusService<'s> {
    pub fn new(backend: Backend<'s>) -> Self {
        let service = Self {
            accessor: Accessor::new("statuses", backend, Backend::get_statuses),
        };
        let _ = service.accessor.refresh();
        service
    }

    pub fn statuses(&self) -> &Signal<Snapshot<GetStatusesResponse>> {
        self.accessor.snapshot()
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        self.accessor.last_error()
    }

    pub fn refresh_statuses(&self) -> BackendResult<()> {
        self.accessor.refresh()
    }
}

pub struct RoleService<'s> {
    accessor: Accessor<'s, Vec<GetRoleResponse>>,
}

impl<'s> RoleService<'s> {
    pub fn new(backend: Backend<'s>) -> Self {
        let service = Self {
            accessor: Accessor::new("roles", backend, Backend::get_roles),
        };
        let _ = service.accessor.refresh();
        service
    }

    pub fn roles(&self) -> &Signal<Snapshot<Vec<GetRoleResponse>>> {
        self.accessor.snapshot()
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        self.accessor.last_error()
    }

    pub fn refresh_roles(&self) -> BackendResult<()> {
        self.accessor.refresh()
    }
}
