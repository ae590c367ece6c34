use client_core::{
    view::{DELETE_CONFIRMATION_TEXT, EMPTY_LIST_TEXT, EMPTY_TITLE_ALERT_TEXT},
    TaskListView,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::dispatch_backend_command};

const TITLE_HINT: &str = "Enter task title...";
const CONTENT_MAX_WIDTH: f32 = 640.0;

pub struct TaskListApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    view: TaskListView,
    /// Latest text typed into the input that no view has echoed back yet.
    unacknowledged_draft: Option<String>,
}

impl TaskListApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view: TaskListView::default(),
            unacknowledged_draft: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::View(view) => {
                    if self.unacknowledged_draft.as_deref() == Some(view.draft_title.as_str()) {
                        self.unacknowledged_draft = None;
                    }
                    self.view = view;
                }
                UiEvent::DraftCleared => self.unacknowledged_draft = None,
            }
        }
    }

    /// Draft text to show: the controller's, unless a newer edit is in flight.
    fn draft_text(&self) -> &str {
        self.unacknowledged_draft
            .as_deref()
            .unwrap_or(&self.view.draft_title)
    }

    fn send(&self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd);
    }

    fn show_composer(&mut self, ui: &mut egui::Ui, intents: &mut Vec<BackendCommand>) {
        let mut draft = self.draft_text().to_owned();
        ui.horizontal(|ui| {
            let input = ui.add(
                egui::TextEdit::singleline(&mut draft)
                    .hint_text(TITLE_HINT)
                    .desired_width(CONTENT_MAX_WIDTH - 160.0),
            );
            if input.changed() {
                intents.push(BackendCommand::SetDraftTitle {
                    text: draft.clone(),
                });
                self.unacknowledged_draft = Some(draft.clone());
            }
            let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Add").clicked() || submitted {
                intents.push(BackendCommand::RequestAdd {
                    title: draft.clone(),
                });
            }
            let reverse_label = if self.view.display_reversed {
                "Normal order"
            } else {
                "Reverse"
            };
            if ui.button(reverse_label).clicked() {
                intents.push(BackendCommand::ToggleDisplayReversed);
            }
        });
    }

    fn show_rows(&self, ui: &mut egui::Ui, intents: &mut Vec<BackendCommand>) {
        if self.view.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(EMPTY_LIST_TEXT).color(egui::Color32::GRAY));
            });
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for row in &self.view.rows {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        let mut title = egui::RichText::new(&row.display_title).size(16.0);
                        if row.completed {
                            title = title.strikethrough().color(egui::Color32::GRAY);
                        }
                        ui.label(title);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Delete").clicked() {
                                intents.push(BackendCommand::RequestDelete {
                                    task_id: row.id.clone(),
                                });
                            }
                            if ui.button(row.toggle_label()).clicked() {
                                intents.push(BackendCommand::ToggleComplete {
                                    task_id: row.id.clone(),
                                });
                            }
                        });
                    });
                });
            }
        });
    }

    fn show_modals(&self, ctx: &egui::Context, intents: &mut Vec<BackendCommand>) {
        if self.view.empty_title_alert {
            egui::Window::new("Empty title")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_TOP, [0.0, 120.0])
                .show(ctx, |ui| {
                    ui.label(EMPTY_TITLE_ALERT_TEXT);
                    if ui.button("OK").clicked() {
                        intents.push(BackendCommand::DismissAlert);
                    }
                });
        }

        if self.view.delete_confirmation.is_some() {
            egui::Window::new("Delete task")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_TOP, [0.0, 120.0])
                .show(ctx, |ui| {
                    ui.label(DELETE_CONFIRMATION_TEXT);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            intents.push(BackendCommand::CancelDelete);
                        }
                        if ui.button("Delete").clicked() {
                            intents.push(BackendCommand::ConfirmDelete);
                        }
                    });
                });
        }
    }
}

impl eframe::App for TaskListApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut intents = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.set_max_width(CONTENT_MAX_WIDTH);
                ui.heading("Tasks");
                ui.add_space(12.0);
                self.show_composer(ui, &mut intents);
                ui.add_space(8.0);
                self.show_rows(ui, &mut intents);
            });
        });
        self.show_modals(ctx, &mut intents);

        for cmd in intents {
            self.send(cmd);
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
