use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::history::UndoStack;
use crate::editor::{CurrentTool, EditorError, EditorTool, GridSettings};
use crate::schematic::{DirtyState, SchematicData};

/// Main toolbar showing tools, undo/redo, and grid controls.
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut current_tool: ResMut<CurrentTool>,
    mut grid_settings: ResMut<GridSettings>,
    mut undo_stack: ResMut<UndoStack>,
    mut doc: ResMut<SchematicData>,
    dirty: Res<DirtyState>,
    mut editor_error: ResMut<EditorError>,
) -> Result {
    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                // Tool buttons with keyboard shortcuts
                for tool in EditorTool::all() {
                    let selected = current_tool.tool == *tool;
                    let button = egui::Button::new(
                        egui::RichText::new(tool.display_name()).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    if ui.add(button).clicked() {
                        current_tool.tool = *tool;
                    }
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Undo/redo with action labels in the hover text
                let undo_button =
                    ui.add_enabled(undo_stack.can_undo(), egui::Button::new("Undo"));
                let undo_hover = undo_stack
                    .undo_label()
                    .map(|label| format!("Undo: {}", label))
                    .unwrap_or_else(|| "Nothing to undo".to_string());
                if undo_button.on_hover_text(undo_hover).clicked()
                    && let Err(e) = undo_stack.undo(&mut doc)
                {
                    editor_error.message = Some(format!("Undo failed: {}", e));
                }

                let redo_button =
                    ui.add_enabled(undo_stack.can_redo(), egui::Button::new("Redo"));
                let redo_hover = undo_stack
                    .redo_label()
                    .map(|label| format!("Redo: {}", label))
                    .unwrap_or_else(|| "Nothing to redo".to_string());
                if redo_button.on_hover_text(redo_hover).clicked()
                    && let Err(e) = undo_stack.redo(&mut doc)
                {
                    editor_error.message = Some(format!("Redo failed: {}", e));
                }

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                ui.checkbox(&mut grid_settings.visible, "Grid");
                ui.checkbox(&mut grid_settings.snap_enabled, "Snap");

                // Right-aligned document name with unsaved marker
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let title = if dirty.is_dirty {
                        format!("{} *", doc.name)
                    } else {
                        doc.name.clone()
                    };
                    ui.label(egui::RichText::new(title).strong());
                });
            });
        });
    Ok(())
}
