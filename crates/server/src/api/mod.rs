use chrono::SecondsFormat;
use serde_json::{Map, Value};
use shared::{
    domain::{is_blank_title, Task, TaskId},
    error::{ApiError, ErrorCode},
    protocol::{NewTask, TaskPatch},
};
use storage::{Storage, StoredTask};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_tasks(ctx: &ApiContext) -> Result<Vec<Task>, ApiError> {
    let tasks = ctx.storage.list_tasks().await.map_err(internal)?;
    Ok(tasks.into_iter().map(task_from_stored).collect())
}

pub async fn create_task(ctx: &ApiContext, new_task: NewTask) -> Result<Task, ApiError> {
    ensure_title_present(&new_task.title)?;
    let stored = ctx
        .storage
        .insert_task(&new_task.title, new_task.completed)
        .await
        .map_err(internal)?;
    Ok(task_from_stored(stored))
}

pub async fn update_task(
    ctx: &ApiContext,
    task_id: &TaskId,
    patch: TaskPatch,
) -> Result<Task, ApiError> {
    if let Some(title) = patch.title.as_deref() {
        ensure_title_present(title)?;
    }
    let stored = if patch.is_empty() {
        ctx.storage.get_task(task_id).await.map_err(internal)?
    } else {
        ctx.storage
            .update_task(task_id, patch.title.as_deref(), patch.completed)
            .await
            .map_err(internal)?
    };
    stored
        .map(task_from_stored)
        .ok_or_else(|| task_not_found(task_id))
}

pub async fn delete_task(ctx: &ApiContext, task_id: &TaskId) -> Result<(), ApiError> {
    if ctx.storage.delete_task(task_id).await.map_err(internal)? {
        Ok(())
    } else {
        Err(task_not_found(task_id))
    }
}

fn ensure_title_present(title: &str) -> Result<(), ApiError> {
    if is_blank_title(title) {
        return Err(ApiError::validation("task title cannot be empty"));
    }
    Ok(())
}

fn task_from_stored(stored: StoredTask) -> Task {
    let mut extra = Map::new();
    extra.insert(
        "createdAt".to_string(),
        Value::String(
            stored
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ),
    );
    Task {
        id: stored.task_id,
        title: stored.title,
        completed: stored.completed,
        extra,
    }
}

fn task_not_found(task_id: &TaskId) -> ApiError {
    ApiError::not_found(format!("task {task_id} not found"))
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
