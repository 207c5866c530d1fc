//! `Vec`-backed entity store.

use crate::model::entity::{
    EntityKind, Identified, ProjectEntity, ProjectId, ProjectMemberEntity, RoleEntity, StatusEntity,
    TaskEntity, TaskHistoryEntity, TaskId, UserEntity, UserId,
};
use crate::store::{seed, EntityStore, StoreError, StoreResult};
use log::{debug, info};
use std::cell::RefCell;

#[derive(Debug, Default, Clone)]
struct Tables {
    users: Vec<UserEntity>,
    roles: Vec<RoleEntity>,
    statuses: Vec<StatusEntity>,
    projects: Vec<ProjectEntity>,
    project_members: Vec<ProjectMemberEntity>,
    tasks: Vec<TaskEntity>,
    task_histories: Vec<TaskHistoryEntity>,
}

fn append<T: Identified>(table: &mut Vec<T>, record: T) -> StoreResult<u32> {
    let id = record.id();
    if table.iter().any(|existing| existing.id() == id) {
        return Err(StoreError::DuplicateId { kind: T::KIND, id });
    }
    table.push(record);
    debug!(
        "event=store_append module=store status=ok kind={} id={}",
        T::KIND,
        id
    );
    Ok(id)
}

fn next_key<T: Identified>(table: &[T]) -> u32 {
    table.iter().map(T::id).max().unwrap_or(0) + 1
}

/// In-memory entity store shared by reference for one session.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RefCell<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store populated with the built-in mock records.
    pub fn seeded() -> Self {
        let tables = Tables {
            users: seed::users(),
            roles: seed::roles(),
            statuses: seed::statuses(),
            projects: seed::projects(),
            project_members: seed::project_members(),
            tasks: seed::tasks(),
            task_histories: seed::task_histories(),
        };
        info!(
            "event=store_seeded module=store status=ok users={} projects={} tasks={}",
            tables.users.len(),
            tables.projects.len(),
            tables.tasks.len()
        );
        Self {
            tables: RefCell::new(tables),
        }
    }
}

impl EntityStore for InMemoryStore {
    fn get_all_users(&self) -> Vec<UserEntity> {
        self.tables.borrow().users.clone()
    }

    fn get_all_roles(&self) -> Vec<RoleEntity> {
        self.tables.borrow().roles.clone()
    }

    fn get_all_statuses(&self) -> Vec<StatusEntity> {
        self.tables.borrow().statuses.clone()
    }

    fn get_all_projects(&self) -> Vec<ProjectEntity> {
        self.tables.borrow().projects.clone()
    }

    fn get_all_project_members(&self) -> Vec<ProjectMemberEntity> {
        self.tables.borrow().project_members.clone()
    }

    fn get_all_tasks(&self) -> Vec<TaskEntity> {
        self.tables.borrow().tasks.clone()
    }

    fn get_all_task_histories(&self) -> Vec<TaskHistoryEntity> {
        self.tables.borrow().task_histories.clone()
    }

    fn add_user(&self, record: UserEntity) -> StoreResult<UserId> {
        record.validate()?;
        append(&mut self.tables.borrow_mut().users, record)
    }

    fn add_role(&self, record: RoleEntity) -> StoreResult<u32> {
        record.validate()?;
        append(&mut self.tables.borrow_mut().roles, record)
    }

    fn add_status(&self, record: StatusEntity) -> StoreResult<u32> {
        record.validate()?;
        append(&mut self.tables.borrow_mut().statuses, record)
    }

    fn add_project(&self, record: ProjectEntity) -> StoreResult<ProjectId> {
        record.validate()?;
        append(&mut self.tables.borrow_mut().projects, record)
    }

    fn add_project_member(&self, record: ProjectMemberEntity) -> StoreResult<()> {
        record.validate()?;
        let mut tables = self.tables.borrow_mut();
        let exists = tables
            .project_members
            .iter()
            .any(|pm| pm.project_id == record.project_id && pm.user_id == record.user_id);
        if exists {
            return Err(StoreError::DuplicateMember {
                project_id: record.project_id,
                user_id: record.user_id,
            });
        }
        tables.project_members.push(record);
        Ok(())
    }

    fn add_task(&self, record: TaskEntity) -> StoreResult<TaskId> {
        record.validate()?;
        append(&mut self.tables.borrow_mut().tasks, record)
    }

    fn add_task_history(&self, record: TaskHistoryEntity) -> StoreResult<u32> {
        record.validate()?;
        append(&mut self.tables.borrow_mut().task_histories, record)
    }

    fn next_id(&self, kind: EntityKind) -> u32 {
        let tables = self.tables.borrow();
        match kind {
            EntityKind::User => next_key(&tables.users),
            EntityKind::Role => next_key(&tables.roles),
            EntityKind::Status => next_key(&tables.statuses),
            EntityKind::Project => next_key(&tables.projects),
            // Members are keyed by (project, user); a running count is enough.
            EntityKind::ProjectMember => {
                u32::try_from(tables.project_members.len()).unwrap_or(u32::MAX - 1) + 1
            }
            EntityKind::Task => next_key(&tables.tasks),
            EntityKind::TaskHistory => next_key(&tables.task_histories),
        }
    }

    fn update_task(&self, record: TaskEntity) -> StoreResult<()> {
        record.validate()?;
        let mut tables = self.tables.borrow_mut();
        let slot = tables
            .tasks
            .iter_mut()
            .find(|task| task.id == record.id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Task,
                id: record.id,
            })?;
        *slot = record;
        Ok(())
    }

    fn remove_project(&self, id: ProjectId) -> StoreResult<ProjectEntity> {
        let mut tables = self.tables.borrow_mut();
        let index = tables
            .projects
            .iter()
            .position(|project| project.id == id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Project,
                id,
            })?;
        let removed = tables.projects.remove(index);

        tables.project_members.retain(|pm| pm.project_id != id);
        let task_ids: Vec<TaskId> = tables
            .tasks
            .iter()
            .filter(|task| task.project_id == id)
            .map(|task| task.id)
            .collect();
        tables.tasks.retain(|task| task.project_id != id);
        tables
            .task_histories
            .retain(|history| !task_ids.contains(&history.task_id));

        info!(
            "event=project_removed module=store status=ok project_id={} cascaded_tasks={}",
            id,
            task_ids.len()
        );
        Ok(removed)
    }

    fn remove_task(&self, id: TaskId) -> StoreResult<TaskEntity> {
        let mut tables = self.tables.borrow_mut();
        let index = tables
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::Task,
                id,
            })?;
        let removed = tables.tasks.remove(index);
        tables.task_histories.retain(|history| history.task_id != id);
        Ok(removed)
    }

    fn remove_project_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> StoreResult<ProjectMemberEntity> {
        let mut tables = self.tables.borrow_mut();
        let index = tables
            .project_members
            .iter()
            .position(|pm| pm.project_id == project_id && pm.user_id == user_id)
            .ok_or(StoreError::MemberNotFound {
                project_id,
                user_id,
            })?;
        Ok(tables.project_members.remove(index))
    }
}
