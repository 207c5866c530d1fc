//! User accessor service.
//!
//! # Invariants
//! - Published users never carry a password.
//! - `add_user` writes through to the store, then appends to the snapshot
//!   without re-running the projection.

use crate::backend::{Backend, BackendError, BackendResult};
use crate::model::dto::{GetUserResponse, GetUsersResponse};
use crate::model::entity::UserEntity;
use crate::service::accessor::{Accessor, Snapshot};
use crate::service::signal::Signal;

pub struct UserService<'s> {
    accessor: Accessor<'s, GetUsersResponse>,
}

impl<'s> UserService<'s> {
    /// Creates the service and performs the first load.
    pub fn new(backend: Backend<'s>) -> Self {
        let service = Self {
            accessor: Accessor::new("users", backend, Backend::get_users),
        };
        // A failed first load stays observable through `last_error`.
        let _ = service.accessor.refresh();
        service
    }

    pub fn users(&self) -> &Signal<Snapshot<GetUsersResponse>> {
        self.accessor.snapshot()
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        self.accessor.last_error()
    }

    pub fn refresh_users(&self) -> BackendResult<()> {
        self.accessor.refresh()
    }

    /// Stores `user` and appends its projection to the published list.
    pub fn add_user(&self, user: UserEntity) -> BackendResult<GetUserResponse> {
        let added = self.accessor.track(self.accessor.backend().add_user(user))?;
        let appended = added.clone();
        self.accessor.patch(move |users| users.push(appended));
        Ok(added)
    }
}
