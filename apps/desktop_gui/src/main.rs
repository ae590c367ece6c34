mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::DEFAULT_COLLECTION_URL;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::{
    commands::BackendCommand,
    runtime::{launch, BackendConfig},
};
use controller::events::UiEvent;
use ui::TaskListApp;

const APP_TITLE: &str = "Tasks";

#[derive(Parser, Debug)]
#[command(about = "Desktop task list backed by a remote task collection")]
struct Args {
    /// Base url of the task collection.
    #[arg(long, default_value = DEFAULT_COLLECTION_URL)]
    server_url: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    launch(
        BackendConfig {
            collection_url: args.server_url,
        },
        cmd_rx,
        ui_tx,
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([420.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(TaskListApp::new(cmd_tx, ui_rx)))),
    )
}

#[cfg(test)]
mod tests {
    use super::{Args, BackendCommand};
    use crate::controller::orchestration::dispatch_backend_command;
    use clap::Parser;
    use crossbeam_channel::bounded;
    use shared::domain::TaskId;

    #[test]
    fn server_url_defaults_to_local_collection() {
        let args = Args::parse_from(["desktop_gui"]);
        assert_eq!(args.server_url, "http://localhost:3000/todos");

        let args = Args::parse_from(["desktop_gui", "--server-url", "http://tasks.lan/todos"]);
        assert_eq!(args.server_url, "http://tasks.lan/todos");
    }

    #[test]
    fn only_store_backed_commands_need_network() {
        let task_id = TaskId::from("1");
        assert!(BackendCommand::RequestAdd {
            title: "x".into()
        }
        .needs_network());
        assert!(BackendCommand::ToggleComplete {
            task_id: task_id.clone()
        }
        .needs_network());
        assert!(BackendCommand::ConfirmDelete.needs_network());
        assert!(!BackendCommand::RequestDelete { task_id }.needs_network());
        assert!(!BackendCommand::DismissAlert.needs_network());
        assert!(!BackendCommand::ToggleDisplayReversed.needs_network());
    }

    #[test]
    fn dispatch_reports_full_and_disconnected_queues() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
        assert!(dispatch_backend_command(&cmd_tx, BackendCommand::CancelDelete));
        assert!(!dispatch_backend_command(&cmd_tx, BackendCommand::CancelDelete));
        assert_eq!(cmd_rx.try_recv(), Ok(BackendCommand::CancelDelete));

        drop(cmd_rx);
        assert!(!dispatch_backend_command(&cmd_tx, BackendCommand::DismissAlert));
    }
}
