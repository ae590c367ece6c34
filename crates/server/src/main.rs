use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use shared::{
    domain::{Task, TaskId},
    error::{ApiError, ErrorCode},
    protocol::{NewTask, TaskPatch},
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;

const MAX_BODY_BYTES: usize = 64 * 1024;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = &settings.database_url;
    let storage = Storage::new(database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), &settings.collection_path);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, collection = %settings.collection_path, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, collection_path: &str) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(collection_path, get(http_list_tasks).post(http_create_task))
        .route(
            &format!("{collection_path}/"),
            get(http_list_tasks).post(http_create_task),
        )
        .route(
            &format!("{collection_path}/:task_id"),
            patch(http_update_task).delete(http_delete_task),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.storage.health_check().await.map_err(|error| {
        error!(%error, "storage health check failed");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    Ok("ok")
}

async fn http_list_tasks(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Task>>> {
    api::list_tasks(&state.api)
        .await
        .map(Json)
        .map_err(api_error_response)
}

async fn http_create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = api::create_task(&state.api, req)
        .await
        .map_err(api_error_response)?;
    info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn http_update_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
    Json(req): Json<TaskPatch>,
) -> ApiResult<Json<Task>> {
    api::update_task(&state.api, &TaskId(task_id), req)
        .await
        .map(Json)
        .map_err(api_error_response)
}

async fn http_delete_task(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> ApiResult<StatusCode> {
    let task_id = TaskId(task_id);
    api::delete_task(&state.api, &task_id)
        .await
        .map_err(api_error_response)?;
    info!(%task_id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn api_error_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => {
            warn!(message = %err.message, "internal error while serving task request");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
