//! SQLite-backed task store implementation.
//!
//! The uniqueness and cascade invariants live in the schema itself, so they
//! hold even under concurrent writers: `users.username` is unique with
//! `COLLATE NOCASE`, `(user_id, title)` is unique on tasks, and tasks hang
//! off users with `ON DELETE CASCADE`.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use entities::{NewTask, NewUser, Task, TaskStatus, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::{TaskQuery, TaskStore, TaskStoreError, TaskStoreResult};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL COLLATE NOCASE UNIQUE,
        password_hash TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'NEW',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (user_id, title)
    )",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks (status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_title ON tasks (title)",
];

/// SQLite-backed task store.
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Opens (creating if missing) the database at `url` and ensures the
    /// schema exists. Foreign keys are enabled on every connection.
    pub async fn connect(url: &str) -> TaskStoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database is per-connection; keep the pool at one
        // connection so the schema stays visible.
        let max_connections = if url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Returns the underlying connection pool, for collaborators that share
    /// the same database (e.g. the token blacklist).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn init_schema(&self) -> TaskStoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Maps unique-constraint violations onto the domain-level conflict errors.
fn map_constraint(err: sqlx::Error) -> TaskStoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let message = db.message();
            if message.contains("users.username") {
                return TaskStoreError::UsernameTaken;
            }
            if message.contains("tasks.") {
                return TaskStoreError::DuplicateTitle;
            }
        }
    }
    TaskStoreError::Database(err)
}

fn user_from_row(row: &SqliteRow) -> TaskStoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn task_from_row(row: &SqliteRow) -> TaskStoreResult<Task> {
    let status: String = row.try_get("status")?;
    let status = TaskStatus::parse(&status)
        .ok_or_else(|| TaskStoreError::Other(format!("unknown task status in store: {status}")))?;

    Ok(Task {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Pushes the WHERE clause for `query` onto a builder.
fn push_filters<'a>(qb: &mut QueryBuilder<'a, Sqlite>, query: &'a TaskQuery) {
    let mut sep = " WHERE ";
    if let Some(status) = query.status {
        qb.push(sep).push("status = ").push_bind(status.as_str());
        sep = " AND ";
    }
    if let Some(user_id) = query.user_id {
        qb.push(sep).push("user_id = ").push_bind(user_id);
        sep = " AND ";
    }
    if let Some(term) = &query.search {
        let pattern = format!("%{}%", term.to_lowercase());
        qb.push(sep)
            .push("(LOWER(title) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(description) LIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: NewUser) -> TaskStoreResult<User> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, first_name, last_name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_constraint)?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_user(&self, id: i64) -> TaskStoreResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_user_by_username(&self, username: &str) -> TaskStoreResult<Option<User>> {
        // Exact match; the NOCASE collation on the column only guards
        // uniqueness, not credential lookup.
        let row = sqlx::query("SELECT * FROM users WHERE username = ? COLLATE BINARY")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn update_user(&self, user: User) -> TaskStoreResult<User> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, first_name = ?, last_name = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(now)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("User", user.id.to_string()));
        }
        Ok(User {
            updated_at: now,
            ..user
        })
    }

    async fn delete_user(&self, id: i64) -> TaskStoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("User", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    async fn create_task(&self, task: NewTask) -> TaskStoreResult<Task> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tasks (user_id, title, description, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_constraint)?;

        Ok(Task {
            id: result.last_insert_rowid(),
            user_id: task.user_id,
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_task(&self, id: i64) -> TaskStoreResult<Option<Task>> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(task_from_row).transpose()
    }

    async fn list_tasks(&self, query: TaskQuery) -> TaskStoreResult<(Vec<Task>, u64)> {
        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM tasks");
        push_filters(&mut count_qb, &query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, user_id, title, description, status, created_at, updated_at FROM tasks",
        );
        push_filters(&mut qb, &query);
        qb.push(" ORDER BY ")
            .push(query.order.field.column())
            .push(if query.order.descending { " DESC" } else { " ASC" })
            .push(" LIMIT ")
            .push_bind(query.page_size as i64)
            .push(" OFFSET ")
            .push_bind(query.offset() as i64);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let tasks = rows
            .iter()
            .map(task_from_row)
            .collect::<TaskStoreResult<Vec<_>>>()?;

        Ok((tasks, total as u64))
    }

    async fn update_task(&self, task: Task) -> TaskStoreResult<Task> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE tasks SET title = ?, description = ?, status = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(now)
        .bind(task.id)
        .execute(&self.pool)
        .await
        .map_err(map_constraint)?;

        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", task.id.to_string()));
        }
        Ok(Task {
            updated_at: now,
            ..task
        })
    }

    async fn delete_task(&self, id: i64) -> TaskStoreResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found("Task", id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_user(username: &str) -> (SqliteTaskStore, User) {
        let store = SqliteTaskStore::connect("sqlite::memory:").await.unwrap();
        let user = store
            .create_user(NewUser::new(username, "hash", "Test"))
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_username_constraint_is_case_insensitive() {
        let (store, _) = store_with_user("alice").await;

        let err = store
            .create_user(NewUser::new("ALICE", "hash", "Alice"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskStoreError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_duplicate_title_maps_to_domain_error() {
        let (store, alice) = store_with_user("alice").await;
        store
            .create_task(NewTask::new(alice.id, "Buy milk"))
            .await
            .unwrap();

        let err = store
            .create_task(NewTask::new(alice.id, "Buy milk"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskStoreError::DuplicateTitle));
    }

    #[tokio::test]
    async fn test_cascade_delete_via_foreign_key() {
        let (store, alice) = store_with_user("alice").await;
        let task = store
            .create_task(NewTask::new(alice.id, "Doomed"))
            .await
            .unwrap();

        store.delete_user(alice.id).await.unwrap();

        assert!(store.get_task(task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_counts_all_matches_not_just_the_page() {
        let (store, alice) = store_with_user("alice").await;
        for i in 0..15 {
            store
                .create_task(NewTask::new(alice.id, format!("Task {i:02}")))
                .await
                .unwrap();
        }

        let (page, total) = store
            .list_tasks(TaskQuery {
                page: 2,
                page_size: 10,
                ..TaskQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(total, 15);
        assert_eq!(page.len(), 5);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let (store, alice) = store_with_user("alice").await;
        store
            .create_task(NewTask::new(alice.id, "Water the FERNS"))
            .await
            .unwrap();

        let (page, total) = store
            .list_tasks(TaskQuery {
                search: Some("ferns".to_string()),
                ..TaskQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(total, 1);
        assert_eq!(page[0].title, "Water the FERNS");
    }
}
