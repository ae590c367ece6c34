//! UI layer for the desktop task list.

pub mod app;

pub use app::TaskListApp;
