//! Permission flag derivation.
//!
//! Whether flags depend on the viewer or are fixed mock constants is a
//! deployment choice, so both live behind `PermissionPolicy`.

use crate::model::dto::{Permissions, ProjectDetailsPermissions, TaskDetailsPermissions};
use crate::store::seed::{ROLE_ADMIN, ROLE_MEMBER};
use std::fmt::{Display, Formatter};

/// Guarded operation on a project or its tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    DeleteProject,
    AddMember,
    DeleteMember,
    AssignTask,
    AddTask,
    DeleteTask,
    AssignMember,
    EditTask,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DeleteProject => "delete_project",
            Self::AddMember => "add_member",
            Self::DeleteMember => "delete_member",
            Self::AssignTask => "assign_task",
            Self::AddTask => "add_task",
            Self::DeleteTask => "delete_task",
            Self::AssignMember => "assign_member",
            Self::EditTask => "edit_task",
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How permission flags are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionPolicy {
    /// Every flag is `true` regardless of viewer.
    #[default]
    AllowAll,
    /// Flags follow the viewer's role in the project.
    ///
    /// - `Admin`: every action.
    /// - `Member`: task actions (add, assign, delete, edit).
    /// - `Observer` or non-member: nothing.
    RoleBased,
}

impl PermissionPolicy {
    pub fn allows(self, role: Option<&str>, action: Action) -> bool {
        match self {
            Self::AllowAll => true,
            Self::RoleBased => match role {
                Some(ROLE_ADMIN) => true,
                Some(ROLE_MEMBER) => matches!(
                    action,
                    Action::AddTask | Action::AssignTask | Action::DeleteTask | Action::EditTask
                ),
                _ => false,
            },
        }
    }

    pub fn project_summary(self, role: Option<&str>) -> Permissions {
        Permissions {
            delete_project: self.allows(role, Action::DeleteProject),
        }
    }

    pub fn project_details(self, role: Option<&str>) -> ProjectDetailsPermissions {
        ProjectDetailsPermissions {
            delete_project: self.allows(role, Action::DeleteProject),
            add_member: self.allows(role, Action::AddMember),
            delete_member: self.allows(role, Action::DeleteMember),
            assign_task: self.allows(role, Action::AssignTask),
            add_task: self.allows(role, Action::AddTask),
            delete_task: self.allows(role, Action::DeleteTask),
            assign_member: self.allows(role, Action::AssignMember),
        }
    }

    pub fn task_details(self, role: Option<&str>) -> TaskDetailsPermissions {
        TaskDetailsPermissions {
            edit_task: self.allows(role, Action::EditTask),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, PermissionPolicy};

    #[test]
    fn allow_all_ignores_role() {
        let flags = PermissionPolicy::AllowAll.project_details(None);
        assert!(flags.delete_project && flags.add_member && flags.assign_member);
    }

    #[test]
    fn member_can_edit_tasks_but_not_manage_project() {
        let policy = PermissionPolicy::RoleBased;
        assert!(policy.allows(Some("Member"), Action::EditTask));
        assert!(policy.allows(Some("Member"), Action::AddTask));
        assert!(!policy.allows(Some("Member"), Action::DeleteProject));
        assert!(!policy.allows(Some("Member"), Action::AddMember));
    }

    #[test]
    fn observer_and_outsider_get_nothing() {
        let policy = PermissionPolicy::RoleBased;
        assert!(!policy.task_details(Some("Observer")).edit_task);
        assert!(!policy.project_summary(None).delete_project);
    }
}
