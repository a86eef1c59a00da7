/// Repository contract checks shared by every backend's test suite
///
/// Each function takes an empty repository and asserts one part of the
/// persistence contract, so the in-memory and PostgreSQL stores are held to
/// the same behavior.

use chrono::NaiveDate;
use std::time::Duration;
use taskflow_shared::{
    error::StoreError,
    models::{
        task::{
            GroupField, Task, TaskCountFilter, TaskCreate, TaskFilter, TaskPriority, TaskStatus,
            TaskUpdate,
        },
        user::{User, UserCreate},
    },
    repository::Repository,
};

pub fn new_task(title: &str) -> Task {
    Task::new(TaskCreate {
        title: title.to_string(),
        ..Default::default()
    })
}

pub fn new_user(email: &str) -> User {
    User::new(UserCreate {
        name: "Test User".to_string(),
        email: email.to_string(),
        role: None,
    })
}

/// Keeps creation timestamps of consecutive inserts distinct
pub async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

pub async fn insert_then_find_returns_same_task(repo: &dyn Repository) {
    let task = Task::new(TaskCreate {
        title: "Round trip".to_string(),
        description: Some("with every field".to_string()),
        priority: Some(TaskPriority::Urgent),
        due_date: NaiveDate::from_ymd_opt(2025, 12, 31),
        assigned_to: Some("carol".to_string()),
        tags: vec!["b".to_string(), "a".to_string()],
    });

    repo.insert_task(&task).await.unwrap();

    let found = repo.find_task_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(found, task);

    assert!(repo.find_task_by_id("missing").await.unwrap().is_none());
}

pub async fn update_changes_only_given_fields(repo: &dyn Repository) {
    let mut task = new_task("Original");
    task.assigned_to = Some("dave".to_string());
    task.tags = vec!["keep".to_string()];
    repo.insert_task(&task).await.unwrap();
    tick().await;

    let updated = repo
        .update_task(
            &task.id,
            &TaskUpdate {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.title, task.title);
    assert_eq!(updated.assigned_to, task.assigned_to);
    assert_eq!(updated.tags, task.tags);
    assert_eq!(updated.created_at, task.created_at);
    assert!(updated.updated_at > task.updated_at);

    let reread = repo.find_task_by_id(&task.id).await.unwrap().unwrap();
    assert_eq!(reread, updated);
}

pub async fn update_missing_task_is_not_found(repo: &dyn Repository) {
    let err = repo
        .update_task("missing", &TaskUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound("Task")));
}

pub async fn delete_removes_task(repo: &dyn Repository) {
    let task = new_task("Doomed");
    repo.insert_task(&task).await.unwrap();

    repo.delete_task(&task.id).await.unwrap();
    assert!(repo.find_task_by_id(&task.id).await.unwrap().is_none());

    let err = repo.delete_task(&task.id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

pub async fn find_tasks_filters_newest_first(repo: &dyn Repository) {
    let mut ids = Vec::new();
    for (title, status) in [
        ("first", TaskStatus::Todo),
        ("second", TaskStatus::Completed),
        ("third", TaskStatus::Todo),
    ] {
        let mut task = new_task(title);
        task.status = status;
        task.assigned_to = Some("erin".to_string());
        repo.insert_task(&task).await.unwrap();
        ids.push(task.id);
        tick().await;
    }

    let all = repo.find_tasks(&TaskFilter::default()).await.unwrap();
    let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    let todo = repo
        .find_tasks(&TaskFilter {
            status: Some(TaskStatus::Todo),
            ..Default::default()
        })
        .await
        .unwrap();
    let todo_ids: Vec<&str> = todo.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(todo_ids, vec![ids[2].as_str(), ids[0].as_str()]);

    let nobody = repo
        .find_tasks(&TaskFilter {
            assigned_to: Some("frank".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(nobody.is_empty());
}

pub async fn same_timestamp_listed_by_id(repo: &dyn Repository) {
    let first = new_task("first");
    let mut ids = vec![first.id.clone()];
    repo.insert_task(&first).await.unwrap();

    for title in ["second", "third", "fourth"] {
        let mut task = new_task(title);
        task.created_at = first.created_at;
        task.updated_at = first.updated_at;
        ids.push(task.id.clone());
        repo.insert_task(&task).await.unwrap();
    }
    ids.sort_unstable_by(|a, b| b.cmp(a));

    for _ in 0..3 {
        let listed: Vec<String> = repo
            .find_tasks(&TaskFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, ids);
    }
}

pub async fn duplicate_email_is_rejected(repo: &dyn Repository) {
    let first = new_user("same@example.com");
    repo.insert_user(&first).await.unwrap();

    let second = new_user("same@example.com");
    let err = repo.insert_user(&second).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail(ref email) if email == "same@example.com"));

    let users = repo.find_all_users().await.unwrap();
    assert_eq!(users, vec![first]);
}

pub async fn users_listed_in_creation_order(repo: &dyn Repository) {
    let a = new_user("a@example.com");
    repo.insert_user(&a).await.unwrap();
    tick().await;
    let b = new_user("b@example.com");
    repo.insert_user(&b).await.unwrap();

    let users = repo.find_all_users().await.unwrap();
    assert_eq!(users, vec![a, b]);
}

pub async fn counts_and_groups(repo: &dyn Repository) {
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let yesterday = today.pred_opt();

    let mut overdue = new_task("overdue");
    overdue.status = TaskStatus::InProgress;
    overdue.due_date = yesterday;

    let mut done = new_task("done late");
    done.status = TaskStatus::Completed;
    done.priority = TaskPriority::High;
    done.due_date = yesterday;

    let mut future = new_task("future");
    future.due_date = today.succ_opt();

    let undated = new_task("undated");

    for task in [&overdue, &done, &future, &undated] {
        repo.insert_task(task).await.unwrap();
    }

    assert_eq!(repo.count_tasks(&TaskCountFilter::default()).await.unwrap(), 4);
    assert_eq!(repo.count_tasks(&TaskCountFilter::overdue(today)).await.unwrap(), 1);
    assert_eq!(
        repo.count_tasks(&TaskCountFilter::with_status(TaskStatus::Todo))
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        repo.count_tasks(&TaskCountFilter::with_priority(TaskPriority::High))
            .await
            .unwrap(),
        1
    );

    let mut by_status = repo.group_task_counts(GroupField::Status).await.unwrap();
    by_status.sort_by(|a, b| a.value.cmp(&b.value));
    let pairs: Vec<(&str, u64)> = by_status.iter().map(|g| (g.value.as_str(), g.count)).collect();
    assert_eq!(pairs, vec![("completed", 1), ("in_progress", 1), ("todo", 2)]);

    let by_priority = repo.group_task_counts(GroupField::Priority).await.unwrap();
    assert_eq!(by_priority.len(), 2);
    assert!(by_priority.iter().all(|g| g.value != "urgent" && g.value != "low"));
}
