/// Entity repository
///
/// All persistence goes through the [`Repository`] trait. Each operation is
/// atomic at the single-document level; there are no multi-document
/// transactions.
///
/// # Backends
///
/// - [`PgRepository`]: PostgreSQL used as a document store (JSONB documents
///   keyed by id), backed by a shared connection pool
/// - [`MemoryRepository`]: the same document semantics over an in-process
///   map, for tests and local runs
///
/// # Example
///
/// ```
/// use taskflow_shared::models::task::{Task, TaskCreate, TaskFilter};
/// use taskflow_shared::repository::{MemoryRepository, Repository};
///
/// # async fn example() -> Result<(), taskflow_shared::error::StoreError> {
/// let repo = MemoryRepository::new();
///
/// let task = Task::new(TaskCreate {
///     title: "Plan sprint".to_string(),
///     ..Default::default()
/// });
/// repo.insert_task(&task).await?;
///
/// let tasks = repo.find_tasks(&TaskFilter::default()).await?;
/// assert_eq!(tasks.len(), 1);
/// # Ok(())
/// # }
/// ```

use crate::{
    error::StoreResult,
    models::{
        task::{GroupCount, GroupField, Task, TaskCountFilter, TaskFilter, TaskUpdate},
        user::User,
    },
};
use async_trait::async_trait;

pub mod document;
pub mod memory;
pub mod pg;

pub use memory::MemoryRepository;
pub use pg::PgRepository;

/// Maximum number of documents returned by a listing
pub const MAX_RESULTS: usize = 1000;

/// Persistence contract for tasks and users
#[async_trait]
pub trait Repository: Send + Sync {
    /// Stores a fully-populated task
    async fn insert_task(&self, task: &Task) -> StoreResult<()>;

    /// Lists matching tasks, newest first, capped at [`MAX_RESULTS`]
    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Finds a task by id
    async fn find_task_by_id(&self, id: &str) -> StoreResult<Option<Task>>;

    /// Applies the provided fields, refreshes `updated_at`, and returns the
    /// updated task
    ///
    /// Fails with `StoreError::NotFound` when no task has that id.
    async fn update_task(&self, id: &str, update: &TaskUpdate) -> StoreResult<Task>;

    /// Removes a task
    ///
    /// Fails with `StoreError::NotFound` when nothing was deleted.
    async fn delete_task(&self, id: &str) -> StoreResult<()>;

    /// Stores a new user
    ///
    /// Fails with `StoreError::DuplicateEmail` when the email is taken.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Lists users in creation order, capped at [`MAX_RESULTS`]
    async fn find_all_users(&self) -> StoreResult<Vec<User>>;

    /// Counts tasks matching the filter
    async fn count_tasks(&self, filter: &TaskCountFilter) -> StoreResult<u64>;

    /// Counts tasks per distinct value of `field`
    ///
    /// Values no task holds are absent from the result.
    async fn group_task_counts(&self, field: GroupField) -> StoreResult<Vec<GroupCount>>;

    /// Verifies the store is reachable
    async fn ping(&self) -> StoreResult<()>;
}
