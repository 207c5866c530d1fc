//! Project accessor services.
//!
//! # Responsibility
//! - `ProjectService`: publish every project summary; patch on create/delete.
//! - `ProjectDetailsService`: publish one project's details.
//!
//! # Invariants
//! - Commands write through to the store before the snapshot is patched.
//! - A failed command leaves the snapshot unchanged.

use crate::backend::{Backend, BackendError, BackendResult};
use crate::model::dto::{
    GetProjectDetailsResponse, GetProjectMemberResponse, GetProjectSummaryResponse,
    PostProjectRequest, ProjectMemberResponse,
};
use crate::model::entity::{ProjectId, RoleId, UserId};
use crate::service::accessor::{Accessor, Snapshot};
use crate::service::signal::Signal;

pub struct ProjectService<'s> {
    accessor: Accessor<'s, Vec<GetProjectSummaryResponse>>,
}

impl<'s> ProjectService<'s> {
    pub fn new(backend: Backend<'s>) -> Self {
        let service = Self {
            accessor: Accessor::new("projects", backend, Backend::get_project_summaries),
        };
        let _ = service.accessor.refresh();
        service
    }

    pub fn projects(&self) -> &Signal<Snapshot<Vec<GetProjectSummaryResponse>>> {
        self.accessor.snapshot()
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        self.accessor.last_error()
    }

    pub fn refresh_projects(&self) -> BackendResult<()> {
        self.accessor.refresh()
    }

    pub fn post_project(
        &self,
        request: PostProjectRequest,
    ) -> BackendResult<GetProjectSummaryResponse> {
        let created = self
            .accessor
            .track(self.accessor.backend().post_project(request))?;
        let appended = created.clone();
        self.accessor.patch(move |projects| projects.push(appended));
        Ok(created)
    }

    pub fn delete_project(&self, project_id: ProjectId) -> BackendResult<GetProjectSummaryResponse> {
        let deleted = self
            .accessor
            .track(self.accessor.backend().delete_project(project_id))?;
        self.accessor
            .patch(|projects| projects.retain(|project| project.id != project_id));
        Ok(deleted)
    }
}

/// Publishes the details of one project.
pub struct ProjectDetailsService<'s> {
    project_id: ProjectId,
    accessor: Accessor<'s, GetProjectDetailsResponse>,
}

impl<'s> ProjectDetailsService<'s> {
    pub fn new(backend: Backend<'s>, project_id: ProjectId) -> Self {
        let service = Self {
            project_id,
            accessor: Accessor::new("project_details", backend, move |backend| {
                backend.get_project_details(project_id)
            }),
        };
        let _ = service.accessor.refresh();
        service
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn details(&self) -> &Signal<Snapshot<GetProjectDetailsResponse>> {
        self.accessor.snapshot()
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        self.accessor.last_error()
    }

    pub fn refresh_details(&self) -> BackendResult<()> {
        self.accessor.refresh()
    }

    pub fn add_member(
        &self,
        user_id: UserId,
        role_id: RoleId,
    ) -> BackendResult<ProjectMemberResponse> {
        let member = self.accessor.track(
            self.accessor
                .backend()
                .add_project_member(self.project_id, user_id, role_id),
        )?;
        let appended = member.clone();
        self.accessor
            .patch(move |details| details.project_members.push(appended));
        Ok(member)
    }

    pub fn delete_member(&self, user_id: UserId) -> BackendResult<GetProjectMemberResponse> {
        let removed = self.accessor.track(
            self.accessor
                .backend()
                .delete_project_member(self.project_id, user_id),
        )?;
        self.accessor.patch(|details| {
            details
                .project_members
                .retain(|member| member.user.id != user_id)
        });
        Ok(removed)
    }
}
