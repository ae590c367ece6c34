//! Backend events delivered to the UI thread.

use client_core::TaskListView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Fresh projection of the controller state.
    View(TaskListView),
    /// A task was created from the draft, so the input box empties.
    DraftCleared,
}
