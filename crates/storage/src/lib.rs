use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use uuid::Uuid;

use shared::domain::TaskId;

const TASK_COLUMNS: &str = "id, title, completed, created_at";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredTask {
    pub task_id: TaskId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every connection to `sqlite::memory:` opens its own database.
        let pool_options = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// All tasks in insertion order.
    pub async fn list_tasks(&self) -> Result<Vec<StoredTask>> {
        let rows = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY seq ASC"))
            .fetch_all(&self.pool)
            .await
            .context("failed to list tasks")?;
        rows.iter().map(task_from_row).collect()
    }

    pub async fn get_task(&self, task_id: &TaskId) -> Result<Option<StoredTask>> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(task_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load task {task_id}"))?;
        row.as_ref().map(task_from_row).transpose()
    }

    pub async fn insert_task(&self, title: &str, completed: bool) -> Result<StoredTask> {
        let task_id = TaskId(Uuid::new_v4().simple().to_string());
        let row = sqlx::query(&format!(
            "INSERT INTO tasks (id, title, completed, created_at) VALUES (?, ?, ?, ?)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(task_id.as_str())
        .bind(title)
        .bind(completed)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("failed to insert task")?;
        task_from_row(&row)
    }

    /// Applies the provided fields and returns the updated row, or `None` when
    /// no task has this id.
    pub async fn update_task(
        &self,
        task_id: &TaskId,
        title: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Option<StoredTask>> {
        let row = sqlx::query(&format!(
            "UPDATE tasks
             SET title = COALESCE(?, title), completed = COALESCE(?, completed)
             WHERE id = ?
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(title)
        .bind(completed)
        .bind(task_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update task {task_id}"))?;
        row.as_ref().map(task_from_row).transpose()
    }

    /// Returns whether a row was removed.
    pub async fn delete_task(&self, task_id: &TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(task_id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete task {task_id}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn task_from_row(row: &SqliteRow) -> Result<StoredTask> {
    Ok(StoredTask {
        task_id: TaskId(row.try_get("id")?),
        title: row.try_get("title")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get("created_at")?,
    })
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
