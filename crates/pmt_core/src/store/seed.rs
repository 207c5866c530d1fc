//! Built-in mock records loaded by `InMemoryStore::seeded()`.

use crate::model::entity::{
    ProjectEntity, ProjectMemberEntity, RoleEntity, StatusEntity, TaskEntity, TaskHistoryEntity,
    UserEntity,
};
use chrono::{NaiveDate, NaiveDateTime};

pub const ROLE_ADMIN: &str = "Admin";
pub const ROLE_MEMBER: &str = "Member";
pub const ROLE_OBSERVER: &str = "Observer";

// Seed dates are literals; out-of-range values fall back to the epoch.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(0, 0, 0).unwrap_or_default()
}

fn user(id: u32, username: &str, email: &str, password: &str) -> UserEntity {
    UserEntity {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub fn users() -> Vec<UserEntity> {
    vec![
        user(1, "Alice", "alice@example.com", "password123"),
        user(2, "Bob", "bob@example.com", "password456"),
        user(3, "Charlie", "charlie@example.com", "password789"),
    ]
}

pub fn statuses() -> Vec<StatusEntity> {
    ["Non commencé", "En cours", "Terminé", "Annulé"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| StatusEntity {
            id,
            name: name.to_string(),
        })
        .collect()
}

pub fn roles() -> Vec<RoleEntity> {
    [ROLE_ADMIN, ROLE_MEMBER, ROLE_OBSERVER]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| RoleEntity {
            id,
            name: name.to_string(),
        })
        .collect()
}

pub fn projects() -> Vec<ProjectEntity> {
    vec![
        ProjectEntity {
            id: 1,
            name: "Project Alpha".to_string(),
            description: Some("Description of Project Alpha".to_string()),
            start_date: date(2024, 1, 1),
            end_date: None,
            status_id: 1,
        },
        ProjectEntity {
            id: 2,
            name: "Project Beta".to_string(),
            description: Some("Description of Project Beta".to_string()),
            start_date: date(2024, 2, 1),
            end_date: None,
            status_id: 2,
        },
    ]
}

pub fn project_members() -> Vec<ProjectMemberEntity> {
    [(1, 1, 1), (1, 2, 2), (1, 3, 3), (2, 2, 1), (2, 3, 2)]
        .into_iter()
        .map(|(project_id, user_id, role_id)| ProjectMemberEntity {
            project_id,
            user_id,
            role_id,
        })
        .collect()
}

fn task(
    id: u32,
    project_id: u32,
    due_date: NaiveDate,
    priority: u32,
    assignee_id: u32,
    status_id: u32,
) -> TaskEntity {
    TaskEntity {
        id,
        project_id,
        name: format!("Task {id}"),
        description: Some(format!("Description of Task {id}")),
        due_date,
        priority,
        assignee_id,
        status_id,
    }
}

pub fn tasks() -> Vec<TaskEntity> {
    vec![
        task(1, 1, date(2024, 1, 15), 1, 1, 1),
        task(2, 1, date(2024, 1, 30), 2, 2, 2),
        task(3, 2, date(2024, 2, 15), 1, 3, 3),
        task(4, 2, date(2024, 2, 28), 2, 1, 4),
    ]
}

pub fn task_histories() -> Vec<TaskHistoryEntity> {
    [
        (1, "Alice", midnight(2024, 1, 1)),
        (2, "Bob", midnight(2024, 1, 2)),
        (3, "Charlie", midnight(2024, 2, 1)),
        (4, "Alice", midnight(2024, 2, 2)),
    ]
    .into_iter()
    .map(|(id, author, date)| TaskHistoryEntity {
        id,
        task_id: id,
        name: format!("Task {id} Created"),
        description: Some(format!("Task {id} created by {author}")),
        date,
    })
    .collect()
}
