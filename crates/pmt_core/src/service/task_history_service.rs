//! Task history accessor service.

use crate::backend::{Backend, BackendError, BackendResult};
use crate::model::dto::GetTaskEventResponse;
use crate::service::accessor::{Accessor, Snapshot};
use crate::service::signal::Signal;

pub struct TaskHistoryService<'s> {
    accessor: Accessor<'s, Vec<GetTaskEventResponse>>,
}

impl<'s> TaskHistoryService<'s> {
    pub fn new(backend: Backend<'s>) -> Self {
        let service = Self {
            accessor: Accessor::new("task_histories", backend, Backend::get_task_histories),
        };
        let _ = service.accessor.refresh();
        service
    }

    pub fn task_histories(&self) -> &Signal<Snapshot<Vec<GetTaskEventResponse>>> {
        self.accessor.snapshot()
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        self.accessor.last_error()
    }

    pub fn refresh_task_histories(&self) -> BackendResult<()> {
        self.accessor.refresh()
    }
}
