//! Single-symbol selection and component deletion for the select tool.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::library::ComponentCatalog;
use crate::schematic::{SchematicData, SymbolId, SymbolInstance};
use crate::ui::DialogState;

use super::history::{EditorCommand, UndoStack};
use super::input::PointerPosition;
use super::tools::{CurrentTool, EditorTool};
use super::EditorError;

/// The symbol the select tool currently has picked, if any.
#[derive(Resource, Default)]
pub struct SelectedSymbol {
    pub symbol: Option<SymbolId>,
}

/// Outline size used for hit testing when the definition cannot be resolved
/// (e.g. a schematic referencing a missing library part).
const FALLBACK_OUTLINE: Vec2 = Vec2::new(60.0, 60.0);

/// Body outline of a symbol, looked up through its component's definition.
pub fn symbol_outline(
    doc: &SchematicData,
    catalog: &ComponentCatalog,
    symbol: &SymbolInstance,
) -> Vec2 {
    doc.component(symbol.component)
        .and_then(|component| catalog.resolve(&component.definition).ok())
        .and_then(|definition| definition.variant(&doc.component(symbol.component)?.variant))
        .and_then(|variant| variant.gates.iter().find(|g| g.name == symbol.gate))
        .map(|gate| gate.outline)
        .unwrap_or(FALLBACK_OUTLINE)
}

/// Test a sheet position against a symbol's rotated body outline.
pub fn hit_test(
    doc: &SchematicData,
    catalog: &ComponentCatalog,
    symbol: &SymbolInstance,
    pos: Vec2,
) -> bool {
    let outline = symbol_outline(doc, catalog, symbol);
    let angle = -(symbol.placement.rotation_deg as f32).to_radians();
    let delta = pos - symbol.placement.position;
    let local = Vec2::new(
        delta.x * angle.cos() - delta.y * angle.sin(),
        delta.x * angle.sin() + delta.y * angle.cos(),
    );
    local.x.abs() <= outline.x / 2.0 && local.y.abs() <= outline.y / 2.0
}

/// Topmost symbol at a sheet position (highest id wins, matching draw order).
pub fn symbol_at(
    doc: &SchematicData,
    catalog: &ComponentCatalog,
    pos: Vec2,
) -> Option<SymbolId> {
    doc.symbols()
        .filter(|(_, symbol)| hit_test(doc, catalog, symbol, pos))
        .map(|(id, _)| id)
        .last()
}

/// Left click with the select tool picks the symbol under the pointer.
pub fn handle_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    dialog_state: Res<DialogState>,
    pointer: Res<PointerPosition>,
    doc: Res<SchematicData>,
    catalog: Res<ComponentCatalog>,
    mut selected: ResMut<SelectedSymbol>,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Select {
        return;
    }
    if dialog_state.any_modal_open {
        return;
    }
    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        return;
    }
    let Some(pos) = pointer.world else {
        return;
    };

    selected.symbol = symbol_at(&doc, &catalog, pos);
}

/// Delete removes the selected symbol's whole component (every placed gate
/// plus the circuit instance) as one committed transaction.
pub fn handle_deletion(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_tool: Res<CurrentTool>,
    dialog_state: Res<DialogState>,
    mut selected: ResMut<SelectedSymbol>,
    mut doc: ResMut<SchematicData>,
    mut undo_stack: ResMut<UndoStack>,
    mut editor_error: ResMut<EditorError>,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Select {
        return;
    }
    if dialog_state.any_modal_open {
        return;
    }
    if !keyboard.just_pressed(KeyCode::Delete) && !keyboard.just_pressed(KeyCode::Backspace) {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }
    let Some(symbol_id) = selected.symbol.take() else {
        return;
    };
    let Some(symbol) = doc.symbol(symbol_id).cloned() else {
        return;
    };

    if let Err(e) = delete_component(symbol.component, &mut doc, &mut undo_stack) {
        warn!("Delete failed: {}", e);
        undo_stack.abort_transaction(&mut doc);
        editor_error.message = Some(format!("Could not delete component:\n\n{}", e));
    }
}

fn delete_component(
    component: crate::schematic::ComponentId,
    doc: &mut SchematicData,
    undo_stack: &mut UndoStack,
) -> Result<(), super::history::HistoryError> {
    undo_stack.begin_transaction("Remove Component from Schematic")?;
    // Symbols first; the component remove is only legal once none remain.
    let symbols: Vec<(SymbolId, SymbolInstance)> = doc
        .symbols_of_component(component)
        .into_iter()
        .map(|(id, s)| (id, s.clone()))
        .collect();
    for (id, symbol) in symbols {
        undo_stack.append_to_transaction(EditorCommand::RemoveSymbol { id, symbol }, doc)?;
    }
    if let Some(instance) = doc.component(component).cloned() {
        undo_stack.append_to_transaction(
            EditorCommand::RemoveComponent {
                id: component,
                component: instance,
            },
            doc,
        )?;
    }
    undo_stack.commit_transaction()?;
    Ok(())
}
