use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Task, TaskId},
    protocol::NewTask,
};
use url::Url;

use crate::error::{StoreOperation, TaskStoreError};

pub const DEFAULT_COLLECTION_URL: &str = "http://localhost:3000/todos";

/// Remote collection of tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>, TaskStoreError>;
    async fn create(&self, new_task: &NewTask) -> Result<Task, TaskStoreError>;
    /// Sends the full task representation; any response body is ignored.
    async fn update(&self, task_id: &TaskId, task: &Task) -> Result<(), TaskStoreError>;
    async fn delete(&self, task_id: &TaskId) -> Result<(), TaskStoreError>;
}

/// Store used when no usable collection url is configured. Every call fails.
pub struct MissingTaskStore {
    reason: String,
}

impl MissingTaskStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> TaskStoreError {
        TaskStoreError::Unavailable(self.reason.clone())
    }
}

#[async_trait]
impl TaskStore for MissingTaskStore {
    async fn list(&self) -> Result<Vec<Task>, TaskStoreError> {
        Err(self.unavailable())
    }

    async fn create(&self, _new_task: &NewTask) -> Result<Task, TaskStoreError> {
        Err(self.unavailable())
    }

    async fn update(&self, _task_id: &TaskId, _task: &Task) -> Result<(), TaskStoreError> {
        Err(self.unavailable())
    }

    async fn delete(&self, _task_id: &TaskId) -> Result<(), TaskStoreError> {
        Err(self.unavailable())
    }
}

/// JSON-over-HTTP task store rooted at a collection url such as
/// `http://localhost:3000/todos`.
///
/// Listing and creation hit the collection root with a trailing slash;
/// update and delete address `{collection}/{id}`.
pub struct HttpTaskStore {
    http: Client,
    collection_url: Url,
}

impl HttpTaskStore {
    pub fn new(collection_url: &str) -> Result<Self, TaskStoreError> {
        Self::with_client(Client::new(), collection_url)
    }

    pub fn with_client(http: Client, collection_url: &str) -> Result<Self, TaskStoreError> {
        let mut url = Url::parse(collection_url.trim()).map_err(|source| {
            TaskStoreError::InvalidUrl {
                url: collection_url.to_string(),
                source,
            }
        })?;
        if url.cannot_be_a_base() {
            return Err(TaskStoreError::NotACollectionUrl(collection_url.to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self {
            http,
            collection_url: url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn task_url(&self, task_id: &TaskId) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(task_id.as_str());
        }
        url
    }
}

fn http_error(operation: StoreOperation) -> impl FnOnce(reqwest::Error) -> TaskStoreError {
    move |source| TaskStoreError::Http { operation, source }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    async fn list(&self) -> Result<Vec<Task>, TaskStoreError> {
        let operation = StoreOperation::List;
        let res = self
            .http
            .get(self.collection_url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error(operation))?;
        res.json().await.map_err(http_error(operation))
    }

    async fn create(&self, new_task: &NewTask) -> Result<Task, TaskStoreError> {
        let operation = StoreOperation::Create;
        let res = self
            .http
            .post(self.collection_url.clone())
            .json(new_task)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error(operation))?;
        res.json().await.map_err(http_error(operation))
    }

    async fn update(&self, task_id: &TaskId, task: &Task) -> Result<(), TaskStoreError> {
        self.http
            .patch(self.task_url(task_id))
            .json(task)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error(StoreOperation::Update))?;
        Ok(())
    }

    async fn delete(&self, task_id: &TaskId) -> Result<(), TaskStoreError> {
        self.http
            .delete(self.task_url(task_id))
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(http_error(StoreOperation::Delete))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
