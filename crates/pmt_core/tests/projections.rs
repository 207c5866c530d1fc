use chrono::{NaiveDate, NaiveDateTime};
use pmt_core::model::entity::{
    EntityKind, ProjectEntity, StatusEntity, TaskEntity, TaskHistoryEntity, UserEntity,
};
use pmt_core::{
    Backend, BackendError, EntityStore, GetUsersResponse, InMemoryStore, PermissionPolicy,
};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(year: i32, month: u32, d: u32) -> NaiveDateTime {
    day(year, month, d).and_hms_opt(9, 0, 0).unwrap()
}

/// One user, one status, one project and one task; nothing else.
fn minimal_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store
        .add_user(UserEntity {
            id: 1,
            username: "dana".to_string(),
            email: "dana@example.com".to_string(),
            password: "hunter2".to_string(),
        })
        .unwrap();
    store
        .add_status(StatusEntity {
            id: 1,
            name: "Open".to_string(),
        })
        .unwrap();
    store
        .add_project(ProjectEntity {
            id: 1,
            name: "Solo".to_string(),
            description: None,
            start_date: day(2024, 1, 1),
            end_date: None,
            status_id: 1,
        })
        .unwrap();
    store
        .add_task(TaskEntity {
            id: 1,
            project_id: 1,
            name: "Only task".to_string(),
            description: None,
            due_date: day(2024, 6, 1),
            priority: 1,
            assignee_id: 1,
            status_id: 1,
        })
        .unwrap();
    store
}

#[test]
fn projected_users_never_expose_passwords() {
    let store = InMemoryStore::seeded();
    let backend = Backend::new(&store);

    let listed: GetUsersResponse = backend.get_users().unwrap();
    assert_eq!(listed.len(), 3);
    let users = serde_json::to_string(&listed).unwrap();
    assert!(!users.contains("password"));
    assert!(users.contains("alice@example.com"));

    let details = serde_json::to_string(&backend.get_project_details(1).unwrap()).unwrap();
    assert!(!details.contains("password"));
    let task = serde_json::to_string(&backend.get_task_details(2).unwrap()).unwrap();
    assert!(!task.contains("password"));
}

#[test]
fn project_details_join_members_and_task_statuses() {
    let store = InMemoryStore::seeded();
    let details = Backend::new(&store).get_project_details(1).unwrap();

    assert_eq!(details.status.name, "Non commencé");
    let members: Vec<(&str, &str)> = details
        .project_members
        .iter()
        .map(|member| (member.user.username.as_str(), member.role.name.as_str()))
        .collect();
    assert_eq!(
        members,
        vec![("Alice", "Admin"), ("Bob", "Member"), ("Charlie", "Observer")]
    );

    let entities = store.get_all_tasks();
    for task in &details.tasks {
        let entity = entities.iter().find(|entity| entity.id == task.id).unwrap();
        assert_eq!(task.status.id, entity.status_id);
    }
    assert_eq!(details.tasks.len(), 2);
}

#[test]
fn project_summary_json_uses_camel_case_and_omits_missing_optionals() {
    let store = InMemoryStore::seeded();
    let summary = Backend::new(&store).get_project_summary(2).unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["startDate"], "2024-02-01");
    assert!(json.get("endDate").is_none());
    assert_eq!(json["status"]["name"], "En cours");
    assert_eq!(json["permissions"]["deleteProject"], true);
}

#[test]
fn summaries_keep_store_order() {
    let store = InMemoryStore::seeded();
    let ids: Vec<u32> = Backend::new(&store)
        .get_project_summaries()
        .unwrap()
        .iter()
        .map(|summary| summary.id)
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn missing_ids_are_not_found() {
    let store = InMemoryStore::seeded();
    let backend = Backend::new(&store);

    assert_eq!(
        backend.get_task_details(99).unwrap_err(),
        BackendError::NotFound {
            kind: EntityKind::Task,
            id: 99
        }
    );
    assert!(matches!(
        backend.get_project_details(99).unwrap_err(),
        BackendError::NotFound {
            kind: EntityKind::Project,
            ..
        }
    ));
    assert!(matches!(
        backend.get_project_member(2, 1).unwrap_err(),
        BackendError::MemberNotFound {
            project_id: 2,
            user_id: 1
        }
    ));
}

#[test]
fn task_history_is_sorted_by_date_then_id() {
    let store = minimal_store();
    for (id, date) in [
        (1, at(2024, 3, 1)),
        (2, at(2024, 1, 1)),
        (3, at(2024, 2, 1)),
        (4, at(2024, 1, 1)),
    ] {
        store
            .add_task_history(TaskHistoryEntity {
                id,
                task_id: 1,
                name: format!("event {id}"),
                description: None,
                date,
            })
            .unwrap();
    }

    let details = Backend::new(&store).get_task_details(1).unwrap();
    let order: Vec<u32> = details.task_history.iter().map(|h| h.id).collect();
    assert_eq!(order, vec![2, 4, 3, 1]);

    // Flat listing keeps store order.
    let flat: Vec<u32> = Backend::new(&store)
        .get_task_histories()
        .unwrap()
        .iter()
        .map(|h| h.id)
        .collect();
    assert_eq!(flat, vec![1, 2, 3, 4]);
}

#[test]
fn dangling_status_is_an_integrity_error() {
    let store = minimal_store();
    store
        .add_task(TaskEntity {
            id: 2,
            project_id: 1,
            name: "Orphan".to_string(),
            description: None,
            due_date: day(2024, 6, 2),
            priority: 2,
            assignee_id: 1,
            status_id: 99,
        })
        .unwrap();

    let err = Backend::new(&store).get_task_details(2).unwrap_err();
    assert_eq!(
        err,
        BackendError::Integrity {
            kind: EntityKind::Task,
            id: 2,
            reference: EntityKind::Status,
            reference_id: 99
        }
    );
    assert!(matches!(
        Backend::new(&store).get_project_details(1).unwrap_err(),
        BackendError::Integrity { .. }
    ));
}

#[test]
fn role_based_flags_follow_viewer_role() {
    let store = InMemoryStore::seeded();
    let backend = Backend::new(&store).with_policy(PermissionPolicy::RoleBased);

    let admin = backend.with_viewer(1).get_project_details(1).unwrap();
    assert!(admin.permissions.delete_project && admin.permissions.add_member);

    let member = backend.with_viewer(2).get_project_details(1).unwrap();
    assert!(!member.permissions.delete_project);
    assert!(member.permissions.add_task && member.permissions.delete_task);

    let observer = backend.with_viewer(3).get_task_details(1).unwrap();
    assert!(!observer.permissions.edit_task);

    let anonymous = backend.get_project_summary(1).unwrap();
    assert!(!anonymous.permissions.delete_project);
}

#[test]
fn reference_listings_expose_statuses_and_roles() {
    let store = InMemoryStore::seeded();
    let backend = Backend::new(&store);

    let statuses: Vec<String> = backend
        .get_statuses()
        .unwrap()
        .into_iter()
        .map(|status| status.name)
        .collect();
    assert_eq!(statuses, vec!["Non commencé", "En cours", "Terminé", "Annulé"]);
    assert_eq!(backend.get_role(3).unwrap().name, "Observer");
    assert_eq!(backend.get_roles().unwrap().len(), 3);
}
