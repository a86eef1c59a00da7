/// Task analytics
///
/// Aggregates are recomputed from live data on every call; nothing is cached.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use taskflow_shared::analytics;
/// use taskflow_shared::repository::MemoryRepository;
///
/// # async fn example() -> Result<(), taskflow_shared::error::StoreError> {
/// let repo = MemoryRepository::new();
/// let overview = analytics::overview(&repo, Utc::now().date_naive()).await?;
/// assert_eq!(overview.completion_rate, 0.0);
/// # Ok(())
/// # }
/// ```

use crate::{
    error::{StoreError, StoreResult},
    models::task::{GroupField, TaskCountFilter, TaskPriority, TaskStatus},
    repository::Repository,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Dashboard overview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    pub todo_tasks: u64,
    pub high_priority_tasks: u64,
    pub urgent_priority_tasks: u64,

    /// Tasks due before today that are not completed
    pub overdue_tasks: u64,

    /// Percentage of tasks completed; 0 when there are no tasks
    pub completion_rate: f64,
}

/// Completed share of `total` as a percentage
pub fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Computes the overview, treating `today` as the current date for overdue
/// detection
pub async fn overview(repo: &dyn Repository, today: NaiveDate) -> StoreResult<Overview> {
    let all = TaskCountFilter::default();
    let completed = TaskCountFilter::with_status(TaskStatus::Completed);
    let in_progress = TaskCountFilter::with_status(TaskStatus::InProgress);
    let todo = TaskCountFilter::with_status(TaskStatus::Todo);
    let high = TaskCountFilter::with_priority(TaskPriority::High);
    let urgent = TaskCountFilter::with_priority(TaskPriority::Urgent);
    let overdue = TaskCountFilter::overdue(today);

    let (
        total_tasks,
        completed_tasks,
        in_progress_tasks,
        todo_tasks,
        high_priority_tasks,
        urgent_priority_tasks,
        overdue_tasks,
    ) = tokio::try_join!(
        repo.count_tasks(&all),
        repo.count_tasks(&completed),
        repo.count_tasks(&in_progress),
        repo.count_tasks(&todo),
        repo.count_tasks(&high),
        repo.count_tasks(&urgent),
        repo.count_tasks(&overdue),
    )?;

    Ok(Overview {
        total_tasks,
        completed_tasks,
        in_progress_tasks,
        todo_tasks,
        high_priority_tasks,
        urgent_priority_tasks,
        overdue_tasks,
        completion_rate: completion_rate(completed_tasks, total_tasks),
    })
}

/// Number of tasks per status; statuses no task holds are absent
pub async fn tasks_by_status(repo: &dyn Repository) -> StoreResult<BTreeMap<TaskStatus, u64>> {
    grouped(repo, GroupField::Status).await
}

/// Number of tasks per priority; priorities no task holds are absent
pub async fn tasks_by_priority(repo: &dyn Repository) -> StoreResult<BTreeMap<TaskPriority, u64>> {
    grouped(repo, GroupField::Priority).await
}

async fn grouped<K>(repo: &dyn Repository, field: GroupField) -> StoreResult<BTreeMap<K, u64>>
where
    K: FromStr<Err = crate::models::task::UnknownVariant> + Ord,
{
    let mut counts = BTreeMap::new();

    for bucket in repo.group_task_counts(field).await? {
        let key = bucket
            .value
            .parse::<K>()
            .map_err(|e| StoreError::MalformedDocument(e.to_string()))?;
        *counts.entry(key).or_insert(0) += bucket.count;
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{Task, TaskCreate, TaskUpdate};
    use crate::repository::MemoryRepository;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    async fn insert(repo: &MemoryRepository, title: &str, update: TaskUpdate) -> Task {
        let task = Task::new(TaskCreate {
            title: title.to_string(),
            ..Default::default()
        });
        repo.insert_task(&task).await.unwrap();
        repo.update_task(&task.id, &update).await.unwrap()
    }

    #[test]
    fn test_completion_rate() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(1, 4), 25.0);
        assert!((completion_rate(1, 3) - 33.333_333).abs() < 1e-4);
    }

    #[tokio::test]
    async fn test_overview_empty() {
        let repo = MemoryRepository::new();
        let overview = overview(&repo, today()).await.unwrap();

        assert_eq!(overview.total_tasks, 0);
        assert_eq!(overview.overdue_tasks, 0);
        assert_eq!(overview.completion_rate, 0.0);
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let repo = MemoryRepository::new();
        let yesterday = today().pred_opt();

        insert(&repo, "a", TaskUpdate::default()).await;
        insert(
            &repo,
            "b",
            TaskUpdate {
                status: Some(TaskStatus::InProgress),
                priority: Some(TaskPriority::Urgent),
                due_date: yesterday,
                ..Default::default()
            },
        )
        .await;
        insert(
            &repo,
            "c",
            TaskUpdate {
                status: Some(TaskStatus::Completed),
                priority: Some(TaskPriority::High),
                due_date: yesterday,
                ..Default::default()
            },
        )
        .await;

        let overview = overview(&repo, today()).await.unwrap();

        assert_eq!(overview.total_tasks, 3);
        assert_eq!(overview.completed_tasks, 1);
        assert_eq!(overview.in_progress_tasks, 1);
        assert_eq!(overview.todo_tasks, 1);
        assert_eq!(overview.high_priority_tasks, 1);
        assert_eq!(overview.urgent_priority_tasks, 1);
        assert_eq!(overview.overdue_tasks, 1);
        assert!((overview.completion_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_grouping_omits_absent_values() {
        let repo = MemoryRepository::new();
        insert(&repo, "a", TaskUpdate::default()).await;
        insert(&repo, "b", TaskUpdate::default()).await;
        insert(
            &repo,
            "c",
            TaskUpdate {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .await;

        let by_status = tasks_by_status(&repo).await.unwrap();
        assert_eq!(by_status.len(), 2);
        assert_eq!(by_status[&TaskStatus::Todo], 2);
        assert_eq!(by_status[&TaskStatus::Completed], 1);
        assert!(!by_status.contains_key(&TaskStatus::InProgress));

        let by_priority = tasks_by_priority(&repo).await.unwrap();
        assert_eq!(by_priority.len(), 1);
        assert_eq!(by_priority[&TaskPriority::Medium], 3);
    }

    #[test]
    fn test_status_map_serializes_with_string_keys() {
        let mut counts = BTreeMap::new();
        counts.insert(TaskStatus::InProgress, 2u64);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"in_progress":2}"#);
    }
}
