//! Bridge between the UI thread and the backend worker that owns the task
//! list controller.

pub mod commands;
pub mod runtime;
