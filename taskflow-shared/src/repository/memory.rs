/// In-process document store
///
/// Keeps the same stored documents the PostgreSQL backend writes, so date
/// normalization and partial-update merging behave identically. State lives
/// only as long as the repository value; nothing is persisted.
///
/// Useful for:
/// - Testing handlers without a running database
/// - Local demos

use super::{
    document::{TaskDocument, TaskPatchDocument, UserDocument},
    Repository, MAX_RESULTS,
};
use crate::{
    error::{StoreError, StoreResult},
    models::{
        task::{GroupCount, GroupField, Task, TaskCountFilter, TaskFilter, TaskUpdate},
        user::User,
    },
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

/// Repository backed by in-memory collections
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tasks: RwLock<HashMap<String, TaskDocument>>,
    users: RwLock<Vec<UserDocument>>,
}

impl MemoryRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    async fn all_tasks(&self) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        tasks.values().cloned().map(Task::try_from).collect()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        debug!(task_id = %task.id, "Inserting task");
        self.tasks
            .write()
            .await
            .insert(task.id.clone(), TaskDocument::from(task));
        Ok(())
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .all_tasks()
            .await?
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect();

        // Ties on created_at fall back to id, matching the SQL ordering
        tasks.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        tasks.truncate(MAX_RESULTS);
        Ok(tasks)
    }

    async fn find_task_by_id(&self, id: &str) -> StoreResult<Option<Task>> {
        let doc = self.tasks.read().await.get(id).cloned();
        doc.map(Task::try_from).transpose()
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> StoreResult<Task> {
        let patch = TaskPatchDocument::new(update, &crate::models::now());

        let mut tasks = self.tasks.write().await;
        let doc = tasks.get_mut(id).ok_or(StoreError::NotFound("Task"))?;
        patch.apply(doc);

        debug!(task_id = %id, "Updated task");
        Task::try_from(doc.clone())
    }

    async fn delete_task(&self, id: &str) -> StoreResult<()> {
        match self.tasks.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound("Task")),
        }
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().await;

        if users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }

        users.push(UserDocument::from(user));
        Ok(())
    }

    async fn find_all_users(&self) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        users
            .iter()
            .take(MAX_RESULTS)
            .cloned()
            .map(User::try_from)
            .collect()
    }

    async fn count_tasks(&self, filter: &TaskCountFilter) -> StoreResult<u64> {
        let count = self
            .all_tasks()
            .await?
            .iter()
            .filter(|task| filter.matches(task))
            .count();
        Ok(count as u64)
    }

    async fn group_task_counts(&self, field: GroupField) -> StoreResult<Vec<GroupCount>> {
        let tasks = self.tasks.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();

        for doc in tasks.values() {
            let value = match field {
                GroupField::Status => doc.status.as_str(),
                GroupField::Priority => doc.priority.as_str(),
            };
            *counts.entry(value).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(value, count)| GroupCount {
                value: value.to_string(),
                count,
            })
            .collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
