//! Backend worker: owns the tokio runtime and the task list controller, runs
//! queued UI commands against it, and feeds fresh views back to the UI.

use std::{sync::Arc, thread, time::Duration};

use client_core::{
    ControllerEvent, HttpTaskStore, MissingTaskStore, TaskListController, TaskStore,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::{
    runtime::Runtime,
    sync::broadcast::{self, error::RecvError},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

const UI_QUEUE_RETRY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub collection_url: String,
}

pub fn launch(config: BackendConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || run_backend(config, cmd_rx, ui_tx));
}

fn build_store(collection_url: &str) -> Arc<dyn TaskStore> {
    match HttpTaskStore::new(collection_url) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::error!(%collection_url, error = %err, "unusable task collection url");
            Arc::new(MissingTaskStore::new(err.to_string()))
        }
    }
}

fn run_backend(config: BackendConfig, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            return;
        }
    };

    let controller = TaskListController::new(build_store(&config.collection_url));
    serve_commands(&runtime, controller, cmd_rx, ui_tx);
}

/// Loads the task list and runs commands until the UI drops its end of the
/// command queue, then unmounts the controller.
fn serve_commands(
    runtime: &Runtime,
    controller: Arc<TaskListController>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    runtime.spawn(forward_views(
        Arc::clone(&controller),
        controller.subscribe_events(),
        ui_tx,
    ));
    runtime.spawn({
        let controller = Arc::clone(&controller);
        async move {
            // Failures are already reported by the controller.
            let _ = controller.load().await;
        }
    });

    // Local intents are applied before the next command is read so that
    // their order matches the order the UI queued them in.
    while let Ok(cmd) = cmd_rx.recv() {
        tracing::debug!(command = cmd.name(), "running ui command");
        if cmd.needs_network() {
            runtime.spawn(run_command(Arc::clone(&controller), cmd));
        } else {
            runtime.block_on(run_command(Arc::clone(&controller), cmd));
        }
    }

    tracing::info!("ui command queue closed; unmounting task list");
    runtime.block_on(controller.unmount());
}

async fn run_command(controller: Arc<TaskListController>, cmd: BackendCommand) {
    let name = cmd.name();
    let result = match cmd {
        BackendCommand::SetDraftTitle { text } => {
            controller.set_draft_title(text).await;
            Ok(())
        }
        BackendCommand::RequestAdd { title } => controller.request_add(&title).await,
        BackendCommand::DismissAlert => {
            controller.dismiss_alert().await;
            Ok(())
        }
        BackendCommand::ToggleComplete { task_id } => controller.toggle_complete(&task_id).await,
        BackendCommand::RequestDelete { task_id } => {
            controller.request_delete(task_id).await;
            Ok(())
        }
        BackendCommand::CancelDelete => {
            controller.cancel_delete().await;
            Ok(())
        }
        BackendCommand::ConfirmDelete => controller.confirm_delete().await,
        BackendCommand::ToggleDisplayReversed => {
            controller.toggle_display_reversed().await;
            Ok(())
        }
    };
    if let Err(err) = result {
        tracing::debug!(command = name, error = %err, "ui command finished with error");
    }
}

async fn forward_views(
    controller: Arc<TaskListController>,
    mut events: broadcast::Receiver<ControllerEvent>,
    ui_tx: Sender<UiEvent>,
) {
    loop {
        let ui_event = match events.recv().await {
            Ok(ControllerEvent::StateChanged) | Err(RecvError::Lagged(_)) => {
                UiEvent::View(controller.view().await)
            }
            Ok(ControllerEvent::TaskAdded(_)) => UiEvent::DraftCleared,
            Ok(ControllerEvent::OperationFailed { .. }) => continue,
            Err(RecvError::Closed) => break,
        };
        if !deliver(&ui_tx, ui_event).await {
            break;
        }
    }
}

/// Waits for room in the UI queue instead of dropping the event. Returns
/// false once the UI side is gone.
async fn deliver(ui_tx: &Sender<UiEvent>, mut ui_event: UiEvent) -> bool {
    let mut warned = false;
    loop {
        match ui_tx.try_send(ui_event) {
            Ok(()) => return true,
            Err(TrySendError::Full(returned)) => {
                if !warned {
                    tracing::warn!("ui event queue is full; waiting to deliver task list update");
                    warned = true;
                }
                ui_event = returned;
                tokio::time::sleep(UI_QUEUE_RETRY).await;
            }
            Err(TrySendError::Disconnected(_)) => return false,
        }
    }
}
