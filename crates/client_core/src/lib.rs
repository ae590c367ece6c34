//! Task list client core: the remote task store seam, the controller that
//! keeps local state in step with it, and the view-model a renderer draws.

pub mod controller;
pub mod error;
pub mod state;
pub mod store;
pub mod view;

pub use controller::{ControllerEvent, TaskListController};
pub use error::{ControllerError, StoreOperation, TaskStoreError};
pub use state::ControllerState;
pub use store::{HttpTaskStore, MissingTaskStore, TaskStore, DEFAULT_COLLECTION_URL};
pub use view::{TaskListView, TaskRow};
