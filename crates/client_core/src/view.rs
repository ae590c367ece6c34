//! Render-ready projection of the controller state.

use shared::domain::TaskId;

use crate::state::ControllerState;

pub const EMPTY_LIST_TEXT: &str = "No tasks";
pub const EMPTY_TITLE_ALERT_TEXT: &str = "Task title cannot be empty!";
pub const DELETE_CONFIRMATION_TEXT: &str = "Are you sure you want to delete this task?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub display_title: String,
    pub completed: bool,
}

impl TaskRow {
    pub fn toggle_label(&self) -> &'static str {
        if self.completed {
            "Undo"
        } else {
            "Complete"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListView {
    pub rows: Vec<TaskRow>,
    pub draft_title: String,
    pub empty_title_alert: bool,
    pub delete_confirmation: Option<TaskId>,
    pub display_reversed: bool,
}

impl TaskListView {
    /// With `display_reversed` set, rows come out in reverse order and every
    /// title is reversed character by character.
    pub fn from_state(state: &ControllerState) -> Self {
        let reversed = state.display_reversed();
        let row = |task: &shared::domain::Task| TaskRow {
            id: task.id.clone(),
            display_title: if reversed {
                task.title.chars().rev().collect()
            } else {
                task.title.clone()
            },
            completed: task.completed,
        };
        let rows = if reversed {
            state.tasks().iter().rev().map(row).collect()
        } else {
            state.tasks().iter().map(row).collect()
        };

        Self {
            rows,
            draft_title: state.draft_title().to_string(),
            empty_title_alert: state.show_empty_title_alert(),
            delete_confirmation: state.pending_delete_id().cloned(),
            display_reversed: reversed,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::Task;

    fn sample_state() -> ControllerState {
        let mut state = ControllerState::default();
        state.replace_tasks(vec![
            Task::new("1", "Buy milk", false),
            Task::new("2", "Walk dog", true),
        ]);
        state
    }

    #[test]
    fn rows_follow_state_order() {
        let view = TaskListView::from_state(&sample_state());
        let titles: Vec<_> = view.rows.iter().map(|r| r.display_title.as_str()).collect();
        assert_eq!(titles, ["Buy milk", "Walk dog"]);
        assert_eq!(view.rows[0].toggle_label(), "Complete");
        assert_eq!(view.rows[1].toggle_label(), "Undo");
    }

    #[test]
    fn reversed_display_flips_order_and_title_characters() {
        let mut state = sample_state();
        state.toggle_display_reversed();

        let view = TaskListView::from_state(&state);

        assert!(view.display_reversed);
        assert_eq!(view.rows[0].id, TaskId::from("2"));
        assert_eq!(view.rows[0].display_title, "god klaW");
        assert_eq!(view.rows[1].display_title, "klim yuB");
        assert_eq!(state.tasks()[0].title, "Buy milk");
    }

    #[test]
    fn reversal_works_on_characters_not_bytes() {
        let mut state = ControllerState::default();
        state.replace_tasks(vec![Task::new("1", "café", false)]);
        state.toggle_display_reversed();

        let view = TaskListView::from_state(&state);
        assert_eq!(view.rows[0].display_title, "éfac");
    }

    #[test]
    fn modal_flags_are_projected() {
        let mut state = sample_state();
        state.raise_empty_title_alert();
        state.arm_delete(TaskId::from("2"));

        let view = TaskListView::from_state(&state);
        assert!(view.empty_title_alert);
        assert_eq!(view.delete_confirmation, Some(TaskId::from("2")));
        assert!(!view.is_empty());
        assert!(TaskListView::default().is_empty());
    }
}
