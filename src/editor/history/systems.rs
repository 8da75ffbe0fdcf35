//! Bevy systems for undo/redo keyboard shortcuts.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::schematic::SchematicData;
use crate::ui::DialogState;

use super::super::EditorError;
use super::undo_stack::UndoStack;

/// System to handle the undo keyboard shortcut (Ctrl+Z).
pub fn handle_undo(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut undo_stack: ResMut<UndoStack>,
    mut doc: ResMut<SchematicData>,
    dialog_state: Res<DialogState>,
    mut editor_error: ResMut<EditorError>,
    mut contexts: EguiContexts,
) {
    if dialog_state.any_modal_open {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    // Ctrl+Z (without shift) = undo
    if ctrl && !shift && keyboard.just_pressed(KeyCode::KeyZ) {
        // An in-flight placement owns the open transaction; navigating
        // history under it would corrupt the rollback baseline.
        if undo_stack.is_transaction_open() {
            debug!("Undo ignored while a transaction is open");
            return;
        }
        if let Err(e) = undo_stack.undo(&mut doc) {
            warn!("Undo failed: {}", e);
            editor_error.message = Some(format!("Undo failed: {}", e));
        }
    }
}

/// System to handle the redo keyboard shortcut (Ctrl+Y or Ctrl+Shift+Z).
pub fn handle_redo(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut undo_stack: ResMut<UndoStack>,
    mut doc: ResMut<SchematicData>,
    dialog_state: Res<DialogState>,
    mut editor_error: ResMut<EditorError>,
    mut contexts: EguiContexts,
) {
    if dialog_state.any_modal_open {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    let redo_pressed = (ctrl && keyboard.just_pressed(KeyCode::KeyY))
        || (ctrl && shift && keyboard.just_pressed(KeyCode::KeyZ));

    if redo_pressed {
        if undo_stack.is_transaction_open() {
            debug!("Redo ignored while a transaction is open");
            return;
        }
        if let Err(e) = undo_stack.redo(&mut doc) {
            warn!("Redo failed: {}", e);
            editor_error.message = Some(format!("Redo failed: {}", e));
        }
    }
}
