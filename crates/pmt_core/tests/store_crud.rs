use chrono::NaiveDate;
use pmt_core::model::entity::{
    EntityKind, ProjectMemberEntity, TaskEntity, UserEntity, ValidationError,
};
use pmt_core::store::seed;
use pmt_core::{EntityStore, InMemoryStore, StoreError};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn seeded_store_matches_seed_tables() {
    let store = InMemoryStore::seeded();

    assert_eq!(store.get_all_users(), seed::users());
    assert_eq!(store.get_all_statuses().len(), 4);
    assert_eq!(store.get_all_roles().len(), 3);
    assert_eq!(store.get_all_projects().len(), 2);
    assert_eq!(store.get_all_project_members().len(), 5);
    assert_eq!(store.get_all_tasks().len(), 4);
    assert_eq!(store.get_all_task_histories().len(), 4);
}

#[test]
fn add_appends_in_insertion_order() {
    let store = InMemoryStore::new();
    for (id, name) in [(7, "zed"), (2, "amy"), (5, "kim")] {
        store
            .add_user(UserEntity {
                id,
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password: "secret".to_string(),
            })
            .unwrap();
    }

    let ids: Vec<u32> = store.get_all_users().iter().map(|user| user.id).collect();
    assert_eq!(ids, vec![7, 2, 5]);
    assert_eq!(store.next_id(EntityKind::User), 8);
}

#[test]
fn add_rejects_invalid_records() {
    let store = InMemoryStore::new();
    let err = store
        .add_user(UserEntity {
            id: 1,
            username: "dana".to_string(),
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        })
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidEmail(_))
    ));
    assert!(store.get_all_users().is_empty());
}

#[test]
fn add_rejects_duplicate_ids_and_memberships() {
    let store = InMemoryStore::seeded();

    let duplicate = seed::users()[0].clone();
    let err = store.add_user(duplicate).unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicateId {
            kind: EntityKind::User,
            id: 1
        }
    ));

    let err = store
        .add_project_member(ProjectMemberEntity {
            project_id: 1,
            user_id: 1,
            role_id: 2,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::DuplicateMember {
            project_id: 1,
            user_id: 1
        }
    ));
}

#[test]
fn update_task_replaces_record_in_place() {
    let store = InMemoryStore::seeded();
    let mut task = store.get_all_tasks()[1].clone();
    task.priority = 9;
    store.update_task(task.clone()).unwrap();

    let tasks = store.get_all_tasks();
    assert_eq!(tasks[1], task);
    assert_eq!(tasks.len(), 4);
}

#[test]
fn update_unknown_task_is_not_found() {
    let store = InMemoryStore::seeded();
    let err = store
        .update_task(TaskEntity {
            id: 42,
            project_id: 1,
            name: "ghost".to_string(),
            description: None,
            due_date: day(2024, 5, 1),
            priority: 1,
            assignee_id: 1,
            status_id: 1,
        })
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound {
            kind: EntityKind::Task,
            id: 42
        }
    ));
}

#[test]
fn remove_project_cascades_to_members_tasks_and_histories() {
    let store = InMemoryStore::seeded();
    let removed = store.remove_project(1).unwrap();
    assert_eq!(removed.id, 1);

    assert!(store.get_all_projects().iter().all(|p| p.id != 1));
    assert!(store.get_all_project_members().iter().all(|pm| pm.project_id != 1));

    let tasks = store.get_all_tasks();
    assert!(tasks.iter().all(|task| task.project_id != 1));
    let task_ids: Vec<u32> = tasks.iter().map(|task| task.id).collect();
    assert!(store
        .get_all_task_histories()
        .iter()
        .all(|history| task_ids.contains(&history.task_id)));
}

#[test]
fn remove_task_cascades_histories() {
    let store = InMemoryStore::seeded();
    store.remove_task(3).unwrap();

    assert!(store.get_all_tasks().iter().all(|task| task.id != 3));
    assert!(store
        .get_all_task_histories()
        .iter()
        .all(|history| history.task_id != 3));
    assert!(matches!(
        store.remove_task(3).unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn remove_member_reports_missing_membership() {
    let store = InMemoryStore::seeded();
    let removed = store.remove_project_member(2, 3).unwrap();
    assert_eq!(removed.role_id, 2);

    let err = store.remove_project_member(2, 3).unwrap_err();
    assert!(matches!(
        err,
        StoreError::MemberNotFound {
            project_id: 2,
            user_id: 3
        }
    ));
}
