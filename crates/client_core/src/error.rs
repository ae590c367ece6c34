use std::fmt;

use thiserror::Error;

/// The four calls a task store exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    List,
    Create,
    Update,
    Delete,
}

impl StoreOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TaskStoreError {
    #[error("invalid task store url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("task store url '{0}' cannot hold task paths")]
    NotACollectionUrl(String),
    #[error("task {operation} request failed: {source}")]
    Http {
        operation: StoreOperation,
        #[source]
        source: reqwest::Error,
    },
    #[error("task store unavailable: {0}")]
    Unavailable(String),
}

impl TaskStoreError {
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Http { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error(transparent)]
    Network(#[from] TaskStoreError),
    #[error("task list session has been unmounted")]
    Unmounted,
}
