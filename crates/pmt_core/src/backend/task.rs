//! Task projections and task commands.
//!
//! # Invariants
//! - Task details list history by `date` ascending, ties by `id` ascending.
//! - Every successful create or patch appends exactly one history entry.

use crate::backend::mappers::{map_status, map_task_history, map_user};
use crate::backend::{find_requested, resolve, Action, Backend, BackendError, BackendResult};
use crate::model::dto::{
    GetTaskDetailsResponse, PatchTaskRequest, PostTaskRequest, Task, TaskProjectResponse,
};
use crate::model::entity::{
    EntityKind, StatusEntity, TaskEntity, TaskHistoryEntity, TaskId, UserEntity,
};
use log::info;

impl Backend<'_> {
    /// Returns the bare task record.
    pub fn get_task(&self, task_id: TaskId) -> BackendResult<Task> {
        let task = find_requested(&self.store.get_all_tasks(), task_id)?;
        Ok(Task::from(&task))
    }

    /// Lists bare tasks in store order.
    pub fn get_tasks(&self) -> BackendResult<Vec<Task>> {
        Ok(self.store.get_all_tasks().iter().map(Task::from).collect())
    }

    /// Projects one task with assignee, status, parent project and history.
    pub fn get_task_details(&self, task_id: TaskId) -> BackendResult<GetTaskDetailsResponse> {
        let task = find_requested(&self.store.get_all_tasks(), task_id)?;
        let statuses = self.store.get_all_statuses();
        let projects = self.store.get_all_projects();
        let users = self.store.get_all_users();
        let owner = (EntityKind::Task, task.id);

        let status = resolve(&statuses, task.status_id, owner)?;
        let project = resolve(&projects, task.project_id, owner)?;
        let project_status =
            resolve(&statuses, project.status_id, (EntityKind::Project, project.id))?;
        let assignee = resolve(&users, task.assignee_id, owner)?;

        let mut histories: Vec<TaskHistoryEntity> = self
            .store
            .get_all_task_histories()
            .into_iter()
            .filter(|history| history.task_id == task.id)
            .collect();
        histories.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

        let role = self.viewer_role(
            task.project_id,
            &self.store.get_all_project_members(),
            &self.store.get_all_roles(),
        );

        Ok(GetTaskDetailsResponse {
            id: task.id,
            name: task.name.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            priority: task.priority,
            assignee: map_user(assignee),
            status: map_status(status),
            project: TaskProjectResponse {
                id: project.id,
                name: project.name.clone(),
                description: project.description.clone(),
                start_date: project.start_date,
                end_date: project.end_date,
                status: map_status(project_status),
            },
            task_history: histories.iter().map(map_task_history).collect(),
            permissions: self.policy.task_details(role.as_deref()),
        })
    }

    /// Creates a task in the first status of the vocabulary and logs its creation.
    pub fn add_task(&self, request: PostTaskRequest) -> BackendResult<GetTaskDetailsResponse> {
        find_requested(&self.store.get_all_projects(), request.project_id)?;
        self.require(request.project_id, Action::AddTask)?;
        let assignee: UserEntity = find_requested(&self.store.get_all_users(), request.assignee_id)?;
        // Status id 0 is never assigned, so it marks an empty vocabulary.
        let default_status = self
            .store
            .get_all_statuses()
            .first()
            .cloned()
            .ok_or(BackendError::NotFound {
                kind: EntityKind::Status,
                id: 0,
            })?;

        let task = TaskEntity {
            id: self.store.next_id(EntityKind::Task),
            project_id: request.project_id,
            name: request.name,
            description: request.description,
            due_date: request.due_date,
            priority: request.priority,
            assignee_id: assignee.id,
            status_id: default_status.id,
        };
        let task_id = self.store.add_task(task.clone())?;

        self.record_history(
            task_id,
            format!("Task {} Created", task.name),
            format!("Task {} was created", task.name),
        )?;
        info!(
            "event=task_created module=backend status=ok task_id={task_id} project_id={}",
            task.project_id
        );
        self.get_task_details(task_id)
    }

    /// Applies a partial update and records a history entry listing the changes.
    pub fn patch_task(
        &self,
        task_id: TaskId,
        patch: PatchTaskRequest,
    ) -> BackendResult<GetTaskDetailsResponse> {
        let current = find_requested(&self.store.get_all_tasks(), task_id)?;
        self.require(current.project_id, Action::EditTask)?;

        let statuses = self.store.get_all_statuses();
        let users = self.store.get_all_users();

        let mut updated = current.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(description) = patch.description {
            updated.description = Some(description);
        }
        if let Some(due_date) = patch.due_date {
            updated.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            updated.priority = priority;
        }
        if let Some(status_id) = patch.status_id {
            find_requested(&statuses, status_id)?;
            updated.status_id = status_id;
        }
        if let Some(assignee_id) = patch.assignee_id {
            find_requested(&users, assignee_id)?;
            if assignee_id != current.assignee_id {
                self.require(current.project_id, Action::AssignTask)?;
            }
            updated.assignee_id = assignee_id;
        }

        let changes = describe_changes(&current, &updated, &statuses, &users);
        if changes.is_empty() {
            return Err(BackendError::NoChanges(task_id));
        }

        self.store.update_task(updated.clone())?;
        self.record_history(
            task_id,
            format!("Task {} Updated", updated.name),
            format!("Task {} was updated:\n{}", updated.name, changes.join("\n")),
        )?;
        info!(
            "event=task_patched module=backend status=ok task_id={task_id} changes={}",
            changes.len()
        );
        self.get_task_details(task_id)
    }

    /// Deletes a task and its history.
    pub fn delete_task(&self, task_id: TaskId) -> BackendResult<Task> {
        let task = find_requested(&self.store.get_all_tasks(), task_id)?;
        self.require(task.project_id, Action::DeleteTask)?;
        let removed = self.store.remove_task(task_id)?;
        info!("event=task_deleted module=backend status=ok task_id={task_id}");
        Ok(Task::from(&removed))
    }

    fn record_history(
        &self,
        task_id: TaskId,
        name: String,
        description: String,
    ) -> BackendResult<()> {
        self.store.add_task_history(TaskHistoryEntity {
            id: self.store.next_id(EntityKind::TaskHistory),
            task_id,
            name,
            description: Some(description),
            date: self.now(),
        })?;
        Ok(())
    }
}

/// Lists `label: old > new` for every field that differs.
fn describe_changes(
    before: &TaskEntity,
    after: &TaskEntity,
    statuses: &[StatusEntity],
    users: &[UserEntity],
) -> Vec<String> {
    let status_name = |id: u32| {
        statuses
            .iter()
            .find(|status| status.id == id)
            .map_or_else(|| id.to_string(), |status| status.name.clone())
    };
    let username = |id: u32| {
        users
            .iter()
            .find(|user| user.id == id)
            .map_or_else(|| id.to_string(), |user| user.username.clone())
    };

    let mut changes = Vec::new();
    let mut push = |label: &str, old: String, new: String| {
        if old != new {
            changes.push(format!("{label}: {old} > {new}"));
        }
    };

    push("name", before.name.clone(), after.name.clone());
    push(
        "description",
        before.description.clone().unwrap_or_default(),
        after.description.clone().unwrap_or_default(),
    );
    push(
        "status",
        status_name(before.status_id),
        status_name(after.status_id),
    );
    push(
        "assignee",
        username(before.assignee_id),
        username(after.assignee_id),
    );
    push(
        "priority",
        before.priority.to_string(),
        after.priority.to_string(),
    );
    push(
        "dueDate",
        before.due_date.to_string(),
        after.due_date.to_string(),
    );
    changes
}

#[cfg(test)]
mod tests {
    use super::describe_changes;
    use crate::store::seed;

    #[test]
    fn describe_changes_names_status_and_assignee() {
        let tasks = seed::tasks();
        let before = tasks[0].clone();
        let mut after = before.clone();
        after.status_id = 2;
        after.assignee_id = 3;

        let changes = describe_changes(&before, &after, &seed::statuses(), &seed::users());
        assert_eq!(
            changes,
            vec![
                "status: Non commencé > En cours".to_string(),
                "assignee: Alice > Charlie".to_string(),
            ]
        );
    }

    #[test]
    fn describe_changes_is_empty_for_identical_tasks() {
        let task = seed::tasks()[1].clone();
        assert!(describe_changes(&task, &task, &seed::statuses(), &seed::users()).is_empty());
    }
}
