//! Properties panel for the selected symbol's component.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::history::{EditorCommand, UndoStack};
use crate::editor::{EditorError, SelectedSymbol};
use crate::schematic::{ComponentId, SchematicData};

/// Side panel showing the selected component; the designator can be renamed,
/// recorded as a single-command transaction.
#[allow(clippy::too_many_arguments)]
pub fn properties_panel_ui(
    mut contexts: EguiContexts,
    selected: Res<SelectedSymbol>,
    mut doc: ResMut<SchematicData>,
    mut undo_stack: ResMut<UndoStack>,
    mut editor_error: ResMut<EditorError>,
    mut draft: Local<Option<(ComponentId, String)>>,
) -> Result {
    let Some(symbol_id) = selected.symbol else {
        *draft = None;
        return Ok(());
    };
    let Some(symbol) = doc.symbol(symbol_id).cloned() else {
        *draft = None;
        return Ok(());
    };
    let Some(component) = doc.component(symbol.component).cloned() else {
        *draft = None;
        return Ok(());
    };

    // Reset the edit buffer when the selection changes.
    if draft.as_ref().map(|(id, _)| *id) != Some(symbol.component) {
        *draft = Some((symbol.component, component.designator.clone()));
    }

    egui::SidePanel::right("properties_panel")
        .resizable(false)
        .default_width(220.0)
        .show(contexts.ctx_mut()?, |ui| {
            ui.heading("Properties");
            ui.separator();

            ui.label(format!("Component: {}", component.definition));
            ui.label(format!("Gate: {}", symbol.gate));
            ui.label(format!(
                "Position: {:.0}, {:.0}  Rotation: {}°",
                symbol.placement.position.x,
                symbol.placement.position.y,
                symbol.placement.rotation_deg
            ));
            ui.add_space(8.0);

            if let Some((component_id, buffer)) = draft.as_mut() {
                ui.label("Designator:");
                ui.text_edit_singleline(buffer);
                let changed = *buffer != component.designator;
                let busy = undo_stack.is_transaction_open();
                if ui
                    .add_enabled(changed && !busy, egui::Button::new("Apply"))
                    .clicked()
                {
                    let result = rename_component(
                        *component_id,
                        component.designator.clone(),
                        buffer.clone(),
                        &mut doc,
                        &mut undo_stack,
                    );
                    if let Err(e) = result {
                        warn!("Rename failed: {}", e);
                        undo_stack.abort_transaction(&mut doc);
                        editor_error.message = Some(format!("Could not rename:\n\n{}", e));
                    }
                }
            }
        });
    Ok(())
}

fn rename_component(
    id: ComponentId,
    from: String,
    to: String,
    doc: &mut SchematicData,
    undo_stack: &mut UndoStack,
) -> Result<(), crate::editor::history::HistoryError> {
    undo_stack.begin_transaction("Rename Component")?;
    undo_stack.append_to_transaction(EditorCommand::SetDesignator { id, from, to }, doc)?;
    undo_stack.commit_transaction()?;
    Ok(())
}
