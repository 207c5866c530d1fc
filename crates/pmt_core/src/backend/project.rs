//! Project projections and project/member commands.

use crate::backend::mappers::{map_role, map_status, map_user};
use crate::backend::{find_requested, resolve, Action, Backend, BackendError, BackendResult};
use crate::model::dto::{
    GetProjectDetailsResponse, GetProjectMemberResponse, GetProjectSummaryResponse,
    PostProjectRequest, ProjectMemberResponse, ProjectTaskResponse,
};
use crate::model::entity::{
    EntityKind, ProjectEntity, ProjectId, ProjectMemberEntity, RoleEntity, RoleId, StatusEntity,
    UserEntity, UserId,
};
use crate::store::seed::ROLE_ADMIN;
use log::{info, warn};

impl Backend<'_> {
    fn summarize(
        &self,
        project: &ProjectEntity,
        statuses: &[StatusEntity],
        members: &[ProjectMemberEntity],
        roles: &[RoleEntity],
    ) -> BackendResult<GetProjectSummaryResponse> {
        let status = resolve(statuses, project.status_id, (EntityKind::Project, project.id))?;
        let role = self.viewer_role(project.id, members, roles);
        Ok(GetProjectSummaryResponse {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            status: Some(map_status(status)),
            permissions: self.policy.project_summary(role.as_deref()),
        })
    }

    /// Projects one project with its status and summary permissions.
    pub fn get_project_summary(
        &self,
        project_id: ProjectId,
    ) -> BackendResult<GetProjectSummaryResponse> {
        let project = find_requested(&self.store.get_all_projects(), project_id)?;
        self.summarize(
            &project,
            &self.store.get_all_statuses(),
            &self.store.get_all_project_members(),
            &self.store.get_all_roles(),
        )
    }

    /// Projects every project in store order.
    pub fn get_project_summaries(&self) -> BackendResult<Vec<GetProjectSummaryResponse>> {
        let statuses = self.store.get_all_statuses();
        let members = self.store.get_all_project_members();
        let roles = self.store.get_all_roles();
        self.store
            .get_all_projects()
            .iter()
            .map(|project| self.summarize(project, &statuses, &members, &roles))
            .collect()
    }

    /// Projects one project with its members, tasks and full permission set.
    pub fn get_project_details(
        &self,
        project_id: ProjectId,
    ) -> BackendResult<GetProjectDetailsResponse> {
        let project = find_requested(&self.store.get_all_projects(), project_id)?;
        let statuses = self.store.get_all_statuses();
        let users = self.store.get_all_users();
        let roles = self.store.get_all_roles();
        let members = self.store.get_all_project_members();

        let status = resolve(&statuses, project.status_id, (EntityKind::Project, project.id))?;

        let project_members = members
            .iter()
            .filter(|pm| pm.project_id == project_id)
            .map(|pm| {
                let owner = (EntityKind::ProjectMember, pm.user_id);
                let user = resolve(&users, pm.user_id, owner)?;
                let role = resolve(&roles, pm.role_id, owner)?;
                Ok(ProjectMemberResponse {
                    project_id: pm.project_id,
                    user: map_user(user),
                    role: map_role(role),
                })
            })
            .collect::<BackendResult<Vec<_>>>()?;

        let tasks = self
            .store
            .get_all_tasks()
            .iter()
            .filter(|task| task.project_id == project_id)
            .map(|task| {
                let task_status = resolve(&statuses, task.status_id, (EntityKind::Task, task.id))?;
                Ok(ProjectTaskResponse {
                    id: task.id,
                    name: task.name.clone(),
                    description: task.description.clone(),
                    due_date: task.due_date,
                    priority: task.priority,
                    assignee_id: task.assignee_id,
                    status: map_status(task_status),
                })
            })
            .collect::<BackendResult<Vec<_>>>()?;

        let role = self.viewer_role(project_id, &members, &roles);
        Ok(GetProjectDetailsResponse {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            status: map_status(status),
            project_members,
            tasks,
            permissions: self.policy.project_details(role.as_deref()),
        })
    }

    /// Creates a project; the viewer, when set, joins it as `Admin`.
    ///
    /// A viewer id with no stored user fails with `NotFound` and writes nothing.
    pub fn post_project(
        &self,
        request: PostProjectRequest,
    ) -> BackendResult<GetProjectSummaryResponse> {
        find_requested(&self.store.get_all_statuses(), request.status_id)?;
        // Owner must resolve before the first write.
        let owner = match self.viewer {
            Some(viewer) => {
                let user: UserEntity = find_requested(&self.store.get_all_users(), viewer)?;
                let admin = self
                    .store
                    .get_all_roles()
                    .into_iter()
                    .find(|role| role.name == ROLE_ADMIN);
                if admin.is_none() {
                    warn!(
                        "event=project_owner_skipped module=backend status=error user_id={} reason=no_admin_role",
                        user.id
                    );
                }
                admin.map(|role| (user.id, role.id))
            }
            None => None,
        };

        let project = ProjectEntity {
            id: self.store.next_id(EntityKind::Project),
            name: request.name,
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
            status_id: request.status_id,
        };
        let project_id = self.store.add_project(project)?;

        if let Some((user_id, role_id)) = owner {
            self.store.add_project_member(ProjectMemberEntity {
                project_id,
                user_id,
                role_id,
            })?;
        }

        info!("event=project_created module=backend status=ok project_id={project_id}");
        self.get_project_summary(project_id)
    }

    /// Deletes a project with its members, tasks and histories.
    ///
    /// Returns the summary as it was right before removal.
    pub fn delete_project(&self, project_id: ProjectId) -> BackendResult<GetProjectSummaryResponse> {
        let summary = self.get_project_summary(project_id)?;
        self.require(project_id, Action::DeleteProject)?;
        self.store.remove_project(project_id)?;
        info!("event=project_deleted module=backend status=ok project_id={project_id}");
        Ok(summary)
    }

    pub fn get_project_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> BackendResult<GetProjectMemberResponse> {
        self.store
            .get_all_project_members()
            .iter()
            .find(|pm| pm.project_id == project_id && pm.user_id == user_id)
            .map(|pm| GetProjectMemberResponse {
                project_id: pm.project_id,
                user_id: pm.user_id,
                role_id: pm.role_id,
            })
            .ok_or(BackendError::MemberNotFound {
                project_id,
                user_id,
            })
    }

    /// Adds `user_id` to the project with `role_id`.
    pub fn add_project_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        role_id: RoleId,
    ) -> BackendResult<ProjectMemberResponse> {
        find_requested(&self.store.get_all_projects(), project_id)?;
        self.require(project_id, Action::AddMember)?;
        let user: UserEntity = find_requested(&self.store.get_all_users(), user_id)?;
        let role: RoleEntity = find_requested(&self.store.get_all_roles(), role_id)?;

        self.store.add_project_member(ProjectMemberEntity {
            project_id,
            user_id,
            role_id,
        })?;
        info!(
            "event=member_added module=backend status=ok project_id={project_id} user_id={user_id} role_id={role_id}"
        );
        Ok(ProjectMemberResponse {
            project_id,
            user: map_user(&user),
            role: map_role(&role),
        })
    }

    pub fn delete_project_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> BackendResult<GetProjectMemberResponse> {
        find_requested(&self.store.get_all_projects(), project_id)?;
        self.require(project_id, Action::DeleteMember)?;
        let removed = self.store.remove_project_member(project_id, user_id)?;
        info!(
            "event=member_removed module=backend status=ok project_id={project_id} user_id={user_id}"
        );
        Ok(GetProjectMemberResponse {
            project_id: removed.project_id,
            user_id: removed.user_id,
            role_id: removed.role_id,
        })
    }
}
