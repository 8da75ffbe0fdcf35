//! The component picker: the selection dialog the placement tool opens.
//!
//! Visible exactly while the state machine is awaiting a selection; the
//! outcome goes back to it as a `SelectionConfirmed`/`SelectionCancelled`
//! event, so cancellation is an ordinary result, not an error path.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::editor::{PlacementTool, ToolEvent};
use crate::library::{ComponentCatalog, DefinitionId, VariantId};

#[derive(Resource, Default)]
pub struct PickerState {
    pub selected: Option<(DefinitionId, VariantId)>,
}

pub fn component_picker_ui(
    mut contexts: EguiContexts,
    tool: Res<PlacementTool>,
    catalog: Res<ComponentCatalog>,
    mut picker: ResMut<PickerState>,
    mut events: MessageWriter<ToolEvent>,
    keyboard: Res<ButtonInput<KeyCode>>,
) -> Result {
    if !tool.is_awaiting_selection() {
        picker.selected = None;
        return Ok(());
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        events.write(ToolEvent::SelectionCancelled);
        return Ok(());
    }

    egui::Window::new("Add Component")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Choose a component from the library:");
            ui.add_space(4.0);

            egui::ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                for definition in catalog.browsable() {
                    let importable = catalog.resolve(&definition.id).is_ok();
                    let gate_count = definition
                        .default_variant()
                        .map(|v| v.gates.len())
                        .unwrap_or(0);
                    let label = format!(
                        "{}  ({} gate{}, {} pads){}",
                        definition.name,
                        gate_count,
                        if gate_count == 1 { "" } else { "s" },
                        definition.pads.len(),
                        if importable { "" } else { "  [workspace]" },
                    );

                    let is_selected = picker
                        .selected
                        .as_ref()
                        .is_some_and(|(id, _)| id == &definition.id);
                    let row = ui
                        .selectable_label(is_selected, label)
                        .on_hover_text(definition.id.as_str());
                    if row.clicked() {
                        let variant = definition
                            .default_variant()
                            .map(|v| v.id.clone())
                            .unwrap_or_else(|| VariantId::new("default"));
                        picker.selected = Some((definition.id.clone(), variant));
                    }

                    // Variant choice, when the definition offers more than one
                    if is_selected && definition.variants.len() > 1 {
                        ui.indent("variants", |ui| {
                            for variant in &definition.variants {
                                let variant_selected = picker
                                    .selected
                                    .as_ref()
                                    .is_some_and(|(_, v)| v == &variant.id);
                                if ui
                                    .selectable_label(variant_selected, &variant.name)
                                    .clicked()
                                {
                                    picker.selected =
                                        Some((definition.id.clone(), variant.id.clone()));
                                }
                            }
                        });
                    }
                }
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let can_place = picker.selected.is_some();
                if ui
                    .add_enabled(can_place, egui::Button::new("Place"))
                    .clicked()
                    && let Some((definition, variant)) = picker.selected.clone()
                {
                    events.write(ToolEvent::SelectionConfirmed { definition, variant });
                }
                if ui.button("Cancel").clicked() {
                    events.write(ToolEvent::SelectionCancelled);
                }
            });
        });
    Ok(())
}
