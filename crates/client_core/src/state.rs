//! Session state owned by the task list controller and the transitions it
//! applies once a store call has resolved.

use shared::domain::{Task, TaskId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerState {
    tasks: Vec<Task>,
    draft_title: String,
    show_empty_title_alert: bool,
    pending_delete_id: Option<TaskId>,
    display_reversed: bool,
}

impl ControllerState {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn draft_title(&self) -> &str {
        &self.draft_title
    }

    pub fn show_empty_title_alert(&self) -> bool {
        self.show_empty_title_alert
    }

    pub fn pending_delete_id(&self) -> Option<&TaskId> {
        self.pending_delete_id.as_ref()
    }

    pub fn display_reversed(&self) -> bool {
        self.display_reversed
    }

    pub fn find_task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == task_id)
    }

    pub(crate) fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub(crate) fn set_draft_title(&mut self, text: String) -> bool {
        if self.draft_title == text {
            return false;
        }
        self.draft_title = text;
        true
    }

    pub(crate) fn raise_empty_title_alert(&mut self) -> bool {
        !std::mem::replace(&mut self.show_empty_title_alert, true)
    }

    pub(crate) fn dismiss_alert(&mut self) -> bool {
        std::mem::replace(&mut self.show_empty_title_alert, false)
    }

    /// Appends a task the store just created and clears the draft.
    pub(crate) fn append_created(&mut self, task: Task) {
        self.tasks.push(task);
        self.draft_title.clear();
    }

    /// Replaces the entry with the same id in place. Returns `false` when the
    /// id is no longer held.
    pub(crate) fn replace_task(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|held| held.id == task.id) {
            Some(held) => {
                *held = task;
                true
            }
            None => false,
        }
    }

    pub(crate) fn arm_delete(&mut self, task_id: TaskId) -> bool {
        if self.pending_delete_id.as_ref() == Some(&task_id) {
            return false;
        }
        self.pending_delete_id = Some(task_id);
        true
    }

    pub(crate) fn cancel_delete(&mut self) -> bool {
        self.pending_delete_id.take().is_some()
    }

    /// Drops a task the store just deleted. The confirmation target is
    /// cleared only while it still names that task.
    pub(crate) fn finish_delete(&mut self, task_id: &TaskId) {
        self.tasks.retain(|task| &task.id != task_id);
        if self.pending_delete_id.as_ref() == Some(task_id) {
            self.pending_delete_id = None;
        }
    }

    pub(crate) fn toggle_display_reversed(&mut self) {
        self.display_reversed = !self.display_reversed;
    }
}
