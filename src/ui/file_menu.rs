use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::schematic::{
    CurrentSchematicFile, DirtyState, LoadSchematicRequest, NewSchematicRequest,
    SaveSchematicRequest,
};

#[derive(Resource, Default)]
pub struct FileMenuState {
    pub show_new_confirmation: bool,
}

/// Menu bar with file operations. Open/save paths go through the native
/// file dialog.
#[allow(clippy::too_many_arguments)]
pub fn file_menu_ui(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<FileMenuState>,
    dirty: Res<DirtyState>,
    current_file: Res<CurrentSchematicFile>,
    mut save_events: MessageWriter<SaveSchematicRequest>,
    mut load_events: MessageWriter<LoadSchematicRequest>,
    mut new_events: MessageWriter<NewSchematicRequest>,
) -> Result {
    egui::TopBottomPanel::top("menu_bar").show(contexts.ctx_mut()?, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New Schematic").clicked() {
                    if dirty.is_dirty {
                        menu_state.show_new_confirmation = true;
                    } else {
                        new_events.write(NewSchematicRequest);
                    }
                    ui.close();
                }

                if ui.button("Open...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Schematic", &["json"])
                        .pick_file()
                    {
                        load_events.write(LoadSchematicRequest { path });
                    }
                    ui.close();
                }

                ui.separator();

                if ui.button("Save").clicked() {
                    match &current_file.path {
                        Some(path) => {
                            save_events.write(SaveSchematicRequest { path: path.clone() });
                        }
                        None => {
                            if let Some(path) = save_dialog() {
                                save_events.write(SaveSchematicRequest { path });
                            }
                        }
                    }
                    ui.close();
                }

                if ui.button("Save As...").clicked() {
                    if let Some(path) = save_dialog() {
                        save_events.write(SaveSchematicRequest { path });
                    }
                    ui.close();
                }
            });
        });
    });
    Ok(())
}

fn save_dialog() -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Schematic", &["json"])
        .set_file_name("schematic.json")
        .save_file()
}

/// Confirmation shown when "New Schematic" would discard unsaved changes.
pub fn new_confirmation_ui(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<FileMenuState>,
    mut new_events: MessageWriter<NewSchematicRequest>,
) -> Result {
    if !menu_state.show_new_confirmation {
        return Ok(());
    }

    egui::Window::new("New Schematic")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Create a new schematic? Unsaved changes will be lost.");
            ui.horizontal(|ui| {
                if ui.button("Create New").clicked() {
                    new_events.write(NewSchematicRequest);
                    menu_state.show_new_confirmation = false;
                }
                if ui.button("Cancel").clicked() {
                    menu_state.show_new_confirmation = false;
                }
            });
        });
    Ok(())
}
