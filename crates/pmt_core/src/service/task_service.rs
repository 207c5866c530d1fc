//! Task accessor services.

use crate::backend::{Backend, BackendError, BackendResult};
use crate::model::dto::{GetTaskDetailsResponse, PatchTaskRequest, PostTaskRequest, Task};
use crate::model::entity::TaskId;
use crate::service::accessor::{Accessor, Snapshot};
use crate::service::signal::Signal;

/// Publishes every bare task record.
pub struct TaskService<'s> {
    accessor: Accessor<'s, Vec<Task>>,
}

impl<'s> TaskService<'s> {
    pub fn new(backend: Backend<'s>) -> Self {
        let service = Self {
            accessor: Accessor::new("tasks", backend, Backend::get_tasks),
        };
        let _ = service.accessor.refresh();
        service
    }

    pub fn tasks(&self) -> &Signal<Snapshot<Vec<Task>>> {
        self.accessor.snapshot()
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        self.accessor.last_error()
    }

    pub fn refresh_tasks(&self) -> BackendResult<()> {
        self.accessor.refresh()
    }

    pub fn add_task(&self, request: PostTaskRequest) -> BackendResult<Task> {
        let backend = self.accessor.backend();
        let created = self
            .accessor
            .track(backend.add_task(request).and_then(|details| backend.get_task(details.id)))?;
        let appended = created.clone();
        self.accessor.patch(move |tasks| tasks.push(appended));
        Ok(created)
    }

    pub fn delete_task(&self, task_id: TaskId) -> BackendResult<Task> {
        let removed = self
            .accessor
            .track(self.accessor.backend().delete_task(task_id))?;
        self.accessor
            .patch(|tasks| tasks.retain(|task| task.id != task_id));
        Ok(removed)
    }
}

/// Publishes the details of one task.
pub struct TaskDetailsService<'s> {
    task_id: TaskId,
    accessor: Accessor<'s, GetTaskDetailsResponse>,
}

impl<'s> TaskDetailsService<'s> {
    pub fn new(backend: Backend<'s>, task_id: TaskId) -> Self {
        let service = Self {
            task_id,
            accessor: Accessor::new("task_details", backend, move |backend| {
                backend.get_task_details(task_id)
            }),
        };
        let _ = service.accessor.refresh();
        service
    }

    pub fn task_id(&self) -> TaskId {
        self.task_id
    }

    pub fn details(&self) -> &Signal<Snapshot<GetTaskDetailsResponse>> {
        self.accessor.snapshot()
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        self.accessor.last_error()
    }

    pub fn refresh_details(&self) -> BackendResult<()> {
        self.accessor.refresh()
    }

    /// Patches the task and publishes the details returned by the command.
    pub fn patch_task(&self, patch: PatchTaskRequest) -> BackendResult<GetTaskDetailsResponse> {
        let details = self
            .accessor
            .track(self.accessor.backend().patch_task(self.task_id, patch))?;
        self.accessor.publish(details.clone());
        Ok(details)
    }
}
