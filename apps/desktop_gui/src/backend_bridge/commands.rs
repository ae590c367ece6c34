//! Backend commands queued from UI to backend worker.

use shared::domain::TaskId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    SetDraftTitle { text: String },
    RequestAdd { title: String },
    DismissAlert,
    ToggleComplete { task_id: TaskId },
    RequestDelete { task_id: TaskId },
    CancelDelete,
    ConfirmDelete,
    ToggleDisplayReversed,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetDraftTitle { .. } => "set_draft_title",
            Self::RequestAdd { .. } => "request_add",
            Self::DismissAlert => "dismiss_alert",
            Self::ToggleComplete { .. } => "toggle_complete",
            Self::RequestDelete { .. } => "request_delete",
            Self::CancelDelete => "cancel_delete",
            Self::ConfirmDelete => "confirm_delete",
            Self::ToggleDisplayReversed => "toggle_display_reversed",
        }
    }

    /// Whether the command waits on the task store.
    pub fn needs_network(&self) -> bool {
        matches!(
            self,
            Self::RequestAdd { .. } | Self::ToggleComplete { .. } | Self::ConfirmDelete
        )
    }
}
