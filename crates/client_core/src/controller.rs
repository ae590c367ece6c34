//! Task list controller: owns the session state and keeps it in step with the
//! remote task store.
//!
//! Every mutating intent calls the store first and patches local state only
//! after the call succeeds. The state lock is never held across a store call,
//! so intents may overlap; each one applies its own patch, addressed by task
//! id, at the moment its call resolves.

use std::sync::Arc;

use shared::{
    domain::{is_blank_title, Task, TaskId},
    protocol::NewTask,
};
use tokio::sync::{broadcast, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::{
    error::{ControllerError, StoreOperation, TaskStoreError},
    state::ControllerState,
    store::TaskStore,
    view::TaskListView,
};

const EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    StateChanged,
    TaskAdded(TaskId),
    OperationFailed {
        operation: StoreOperation,
        message: String,
    },
}

struct Session {
    state: ControllerState,
    load_started: bool,
    unmounted: bool,
}

pub struct TaskListController {
    store: Arc<dyn TaskStore>,
    inner: Mutex<Session>,
    events: broadcast::Sender<ControllerEvent>,
}

impl TaskListController {
    pub fn new(store: Arc<dyn TaskStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Arc::new(Self {
            store,
            inner: Mutex::new(Session {
                state: ControllerState::default(),
                load_started: false,
                unmounted: false,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> ControllerState {
        self.inner.lock().await.state.clone()
    }

    pub async fn view(&self) -> TaskListView {
        TaskListView::from_state(&self.inner.lock().await.state)
    }

    /// Fetches the task list once per session. Later calls are ignored.
    pub async fn load(&self) -> Result<(), ControllerError> {
        {
            let mut session = self.session().await?;
            if session.load_started {
                debug!("task list load already started; ignoring repeat request");
                return Ok(());
            }
            session.load_started = true;
        }

        let result = self.store.list().await;
        let mut session = self.resume(StoreOperation::List).await?;
        match result {
            Ok(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                session.state.replace_tasks(tasks);
                drop(session);
                self.emit(ControllerEvent::StateChanged);
                Ok(())
            }
            Err(err) => {
                drop(session);
                Err(self.report(StoreOperation::List, err))
            }
        }
    }

    pub async fn set_draft_title(&self, text: impl Into<String>) {
        let Ok(mut session) = self.session().await else {
            return;
        };
        if session.state.set_draft_title(text.into()) {
            drop(session);
            self.emit(ControllerEvent::StateChanged);
        }
    }

    /// Submits the current draft title.
    pub async fn submit_draft(&self) -> Result<(), ControllerError> {
        let draft = self.session().await?.state.draft_title().to_string();
        self.request_add(&draft).await
    }

    /// Creates a task with `draft_title`, sent exactly as typed. A blank
    /// title raises the empty-title alert and never reaches the store.
    pub async fn request_add(&self, draft_title: &str) -> Result<(), ControllerError> {
        if is_blank_title(draft_title) {
            let mut session = self.session().await?;
            let changed = session.state.raise_empty_title_alert();
            drop(session);
            if changed {
                self.emit(ControllerEvent::StateChanged);
            }
            return Err(ControllerError::EmptyTitle);
        }
        self.ensure_mounted().await?;

        let result = self.store.create(&NewTask::pending(draft_title)).await;
        let mut session = self.resume(StoreOperation::Create).await?;
        match result {
            Ok(task) => {
                let task_id = task.id.clone();
                info!(%task_id, "task created");
                session.state.append_created(task);
                drop(session);
                self.emit(ControllerEvent::TaskAdded(task_id));
                self.emit(ControllerEvent::StateChanged);
                Ok(())
            }
            Err(err) => {
                drop(session);
                Err(self.report(StoreOperation::Create, err))
            }
        }
    }

    pub async fn dismiss_alert(&self) {
        let Ok(mut session) = self.session().await else {
            return;
        };
        if session.state.dismiss_alert() {
            drop(session);
            self.emit(ControllerEvent::StateChanged);
        }
    }

    /// Flips the completion flag of a held task. An id that is not held is
    /// ignored.
    pub async fn toggle_complete(&self, task_id: &TaskId) -> Result<(), ControllerError> {
        let toggled: Task = {
            let session = self.session().await?;
            match session.state.find_task(task_id) {
                Some(task) => task.toggled(),
                None => {
                    warn!(%task_id, "toggle requested for a task that is not held locally");
                    return Ok(());
                }
            }
        };

        let result = self.store.update(task_id, &toggled).await;
        let mut session = self.resume(StoreOperation::Update).await?;
        match result {
            Ok(()) => {
                let completed = toggled.completed;
                if session.state.replace_task(toggled) {
                    debug!(%task_id, completed, "task completion updated");
                    drop(session);
                    self.emit(ControllerEvent::StateChanged);
                } else {
                    debug!(%task_id, "task left local state before its update resolved");
                }
                Ok(())
            }
            Err(err) => {
                drop(session);
                Err(self.report(StoreOperation::Update, err))
            }
        }
    }

    pub async fn request_delete(&self, task_id: TaskId) {
        let Ok(mut session) = self.session().await else {
            return;
        };
        if session.state.arm_delete(task_id) {
            drop(session);
            self.emit(ControllerEvent::StateChanged);
        }
    }

    pub async fn cancel_delete(&self) {
        let Ok(mut session) = self.session().await else {
            return;
        };
        if session.state.cancel_delete() {
            drop(session);
            self.emit(ControllerEvent::StateChanged);
        }
    }

    /// Deletes the task awaiting confirmation. Without one this does nothing.
    /// On failure the confirmation stays armed so it can be retried.
    pub async fn confirm_delete(&self) -> Result<(), ControllerError> {
        let task_id = {
            let session = self.session().await?;
            match session.state.pending_delete_id() {
                Some(task_id) => task_id.clone(),
                None => {
                    debug!("delete confirmed with no pending target; ignoring");
                    return Ok(());
                }
            }
        };

        let result = self.store.delete(&task_id).await;
        let mut session = self.resume(StoreOperation::Delete).await?;
        match result {
            Ok(()) => {
                info!(%task_id, "task deleted");
                session.state.finish_delete(&task_id);
                drop(session);
                self.emit(ControllerEvent::StateChanged);
                Ok(())
            }
            Err(err) => {
                drop(session);
                Err(self.report(StoreOperation::Delete, err))
            }
        }
    }

    pub async fn toggle_display_reversed(&self) {
        let Ok(mut session) = self.session().await else {
            return;
        };
        session.state.toggle_display_reversed();
        drop(session);
        self.emit(ControllerEvent::StateChanged);
    }

    /// Ends the session. Store calls still in flight finish, but their
    /// results are dropped instead of being applied.
    pub async fn unmount(&self) {
        let mut session = self.inner.lock().await;
        if !session.unmounted {
            session.unmounted = true;
            debug!("task list session unmounted");
        }
    }

    async fn session(&self) -> Result<MutexGuard<'_, Session>, ControllerError> {
        let session = self.inner.lock().await;
        if session.unmounted {
            return Err(ControllerError::Unmounted);
        }
        Ok(session)
    }

    async fn ensure_mounted(&self) -> Result<(), ControllerError> {
        self.session().await.map(|_| ())
    }

    async fn resume(
        &self,
        operation: StoreOperation,
    ) -> Result<MutexGuard<'_, Session>, ControllerError> {
        self.session().await.inspect_err(|_| {
            debug!(%operation, "discarding task store result after unmount");
        })
    }

    fn report(&self, operation: StoreOperation, err: TaskStoreError) -> ControllerError {
        error!(%operation, error = %err, "task store call failed");
        self.emit(ControllerEvent::OperationFailed {
            operation,
            message: err.to_string(),
        });
        ControllerError::Network(err)
    }

    fn emit(&self, event: ControllerEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
