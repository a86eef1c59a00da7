/// PostgreSQL document store
///
/// Each collection is a table of JSONB documents keyed by id:
///
/// ```sql
/// CREATE TABLE tasks (id TEXT PRIMARY KEY, doc JSONB NOT NULL);
/// CREATE TABLE users (id TEXT PRIMARY KEY, doc JSONB NOT NULL);
/// CREATE UNIQUE INDEX idx_users_email ON users ((doc->>'email'));
/// ```
///
/// Partial updates merge a patch object onto the stored document with the
/// JSONB `||` operator, so an update is a single statement that returns the
/// merged document.
///
/// The pool is shared across requests. Every call acquires a connection for
/// one statement and returns it to the pool on completion or failure.

use super::{
    document::{format_date, TaskDocument, TaskPatchDocument, UserDocument},
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
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use tracing::{debug, warn};

/// Repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn push_count_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &TaskCountFilter) {
    if let Some(status) = filter.status {
        qb.push(" AND doc->>'status' = ").push_bind(status.as_str());
    }
    if let Some(status) = filter.status_not {
        qb.push(" AND doc->>'status' <> ").push_bind(status.as_str());
    }
    if let Some(priority) = filter.priority {
        qb.push(" AND doc->>'priority' = ").push_bind(priority.as_str());
    }
    if let Some(due_before) = filter.due_before {
        // NULL due dates compare as NULL and are excluded
        qb.push(" AND doc->>'due_date' < ").push_bind(format_date(&due_before));
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn insert_task(&self, task: &Task) -> StoreResult<()> {
        sqlx::query("INSERT INTO tasks (id, doc) VALUES ($1, $2)")
            .bind(&task.id)
            .bind(Json(TaskDocument::from(task)))
            .execute(&self.pool)
            .await?;

        debug!(task_id = %task.id, "Inserted task");
        Ok(())
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT doc FROM tasks WHERE TRUE");

        if let Some(status) = filter.status {
            qb.push(" AND doc->>'status' = ").push_bind(status.as_str());
        }
        if let Some(priority) = filter.priority {
            qb.push(" AND doc->>'priority' = ").push_bind(priority.as_str());
        }
        if let Some(assigned_to) = &filter.assigned_to {
            qb.push(" AND doc->>'assigned_to' = ").push_bind(assigned_to.clone());
        }

        qb.push(" ORDER BY doc->>'created_at' DESC, id DESC LIMIT ")
            .push_bind(MAX_RESULTS as i64);

        let rows: Vec<(Json<TaskDocument>,)> = qb.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(|(Json(doc),)| Task::try_from(doc)).collect()
    }

    async fn find_task_by_id(&self, id: &str) -> StoreResult<Option<Task>> {
        let row: Option<(Json<TaskDocument>,)> =
            sqlx::query_as("SELECT doc FROM tasks WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(Json(doc),)| Task::try_from(doc)).transpose()
    }

    async fn update_task(&self, id: &str, update: &TaskUpdate) -> StoreResult<Task> {
        let patch = TaskPatchDocument::new(update, &crate::models::now());

        let row: Option<(Json<TaskDocument>,)> =
            sqlx::query_as("UPDATE tasks SET doc = doc || $2 WHERE id = $1 RETURNING doc")
                .bind(id)
                .bind(Json(&patch))
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some((Json(doc),)) => {
                debug!(task_id = %id, "Updated task");
                Task::try_from(doc)
            }
            None => Err(StoreError::NotFound("Task")),
        }
    }

    async fn delete_task(&self, id: &str) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Task"));
        }

        debug!(task_id = %id, "Deleted task");
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE doc->>'email' = $1)")
                .bind(&user.email)
                .fetch_one(&self.pool)
                .await?;

        if exists {
            return Err(StoreError::DuplicateEmail(user.email.clone()));
        }

        // The unique email index catches inserts that race past the check
        let result = sqlx::query("INSERT INTO users (id, doc) VALUES ($1, $2)")
            .bind(&user.id)
            .bind(Json(UserDocument::from(user)))
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!(email = %user.email, "Duplicate email rejected by unique index");
                Err(StoreError::DuplicateEmail(user.email.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_all_users(&self) -> StoreResult<Vec<User>> {
        let rows: Vec<(Json<UserDocument>,)> =
            sqlx::query_as("SELECT doc FROM users ORDER BY doc->>'created_at' ASC LIMIT $1")
                .bind(MAX_RESULTS as i64)
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|(Json(doc),)| User::try_from(doc)).collect()
    }

    async fn count_tasks(&self, filter: &TaskCountFilter) -> StoreResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tasks WHERE TRUE");
        push_count_filter(&mut qb, filter);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    async fn group_task_counts(&self, field: GroupField) -> StoreResult<Vec<GroupCount>> {
        let sql = match field {
            GroupField::Status => {
                "SELECT doc->>'status', COUNT(*) FROM tasks GROUP BY 1 ORDER BY 1"
            }
            GroupField::Priority => {
                "SELECT doc->>'priority', COUNT(*) FROM tasks GROUP BY 1 ORDER BY 1"
            }
        };

        let rows: Vec<(Option<String>, i64)> = sqlx::query_as(sql).fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|(value, count)| {
                let value = value.ok_or_else(|| {
                    StoreError::MalformedDocument(format!(
                        "task without a {} field",
                        field.document_key()
                    ))
                })?;
                Ok(GroupCount {
                    value,
                    count: count as u64,
                })
            })
            .collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::db::pool::health_check(&self.pool).await?;
        Ok(())
    }
}
