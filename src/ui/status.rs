//! Status bar and error dialogs.
//!
//! The engine and tools signal typed failures into resources; this module is
//! the notification boundary that presents them.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::history::UndoStack;
use crate::editor::{EditorError, PlacementTool, PointerPosition};
use crate::schematic::{AsyncFileOperation, LoadError, SaveError, SchematicData};

/// Bottom status bar: tool prompt, pointer position, history depth.
pub fn status_bar_ui(
    mut contexts: EguiContexts,
    tool: Res<PlacementTool>,
    doc: Res<SchematicData>,
    pointer: Res<PointerPosition>,
    undo_stack: Res<UndoStack>,
) -> Result {
    egui::TopBottomPanel::bottom("status_bar").show(contexts.ctx_mut()?, |ui| {
        ui.horizontal(|ui| {
            let prompt = tool
                .prompt(&doc)
                .unwrap_or_else(|| "Ready".to_string());
            ui.label(prompt);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(pos) = pointer.world {
                    ui.label(format!("x: {:.0}  y: {:.0}", pos.x, pos.y));
                }
                ui.separator();
                ui.label(format!(
                    "{} / {} steps",
                    undo_stack.applied_len(),
                    undo_stack.history_len()
                ));
                if let Some(session) = tool.session() {
                    ui.separator();
                    ui.label(format!("rot {}°", session.last_angle()));
                }
            });
        });
    });
    Ok(())
}

/// Modal for placement/undo failures.
pub fn editor_error_dialog_ui(
    mut contexts: EguiContexts,
    mut editor_error: ResMut<EditorError>,
) -> Result {
    let Some(message) = editor_error.message.clone() else {
        return Ok(());
    };

    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.colored_label(egui::Color32::RED, &message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                editor_error.message = None;
            }
        });
    Ok(())
}

/// Modals for save/load failures.
pub fn file_error_dialogs_ui(
    mut contexts: EguiContexts,
    mut save_error: ResMut<SaveError>,
    mut load_error: ResMut<LoadError>,
) -> Result {
    if let Some(message) = save_error.message.clone() {
        egui::Window::new("Save Error")
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(contexts.ctx_mut()?, |ui| {
                egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    ui.colored_label(egui::Color32::RED, &message);
                });
                if ui.button("OK").clicked() {
                    save_error.message = None;
                }
            });
    }

    if let Some(message) = load_error.message.clone() {
        egui::Window::new("Load Error")
            .collapsible(false)
            .resizable(true)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(contexts.ctx_mut()?, |ui| {
                egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    ui.colored_label(egui::Color32::RED, &message);
                });
                if ui.button("OK").clicked() {
                    load_error.message = None;
                }
            });
    }
    Ok(())
}

/// Blocking overlay while a file operation is in flight.
pub fn async_operation_modal_ui(
    mut contexts: EguiContexts,
    async_op: Res<AsyncFileOperation>,
) -> Result {
    if !async_op.is_busy() {
        return Ok(());
    }

    egui::Window::new("Working")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    async_op
                        .description
                        .clone()
                        .unwrap_or_else(|| "Working...".to_string()),
                );
            });
        });
    Ok(())
}
