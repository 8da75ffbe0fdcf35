//! Translates raw pointer/keyboard input into placement tool events.
//!
//! Positions are converted to world space and grid-snapped here, so the
//! state machine only ever sees sheet coordinates.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::ui::DialogState;

use super::camera::EditorCamera;
use super::grid::{snap_to_grid, GridSettings};
use super::placement::ToolEvent;
use super::tools::{CurrentTool, EditorTool};
use crate::schematic::SchematicData;

/// Current pointer position on the sheet, grid-snapped.
#[derive(Resource, Default)]
pub struct PointerPosition {
    pub world: Option<Vec2>,
}

/// Keeps [`PointerPosition`] up to date and emits `PointerMove` events while
/// the placement tool is active.
pub fn track_pointer(
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<EditorCamera>>,
    grid_settings: Res<GridSettings>,
    keyboard: Res<ButtonInput<KeyCode>>,
    doc: Res<SchematicData>,
    current_tool: Res<CurrentTool>,
    mut pointer: ResMut<PointerPosition>,
    mut events: MessageWriter<ToolEvent>,
    mut last_emitted: Local<Option<Vec2>>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_pos) else {
        return;
    };

    // Snap to grid unless Shift is held
    let snap_enabled = grid_settings.snap_enabled && !keyboard.pressed(KeyCode::ShiftLeft);
    let snapped = snap_to_grid(world_pos, doc.grid_interval, snap_enabled);
    pointer.world = Some(snapped);

    if current_tool.tool != EditorTool::AddComponent {
        *last_emitted = None;
        return;
    }
    if *last_emitted == Some(snapped) {
        return;
    }
    *last_emitted = Some(snapped);
    events.write(ToolEvent::PointerMove { pos: snapped });
}

/// Emits click/rotate/abort events for the placement tool.
pub fn emit_placement_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    current_tool: Res<CurrentTool>,
    dialog_state: Res<DialogState>,
    pointer: Res<PointerPosition>,
    mut events: MessageWriter<ToolEvent>,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::AddComponent {
        return;
    }
    if dialog_state.any_modal_open {
        return;
    }

    let over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false);
    let typing = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_keyboard_input())
        .unwrap_or(false);

    if !over_ui {
        if mouse_button.just_pressed(MouseButton::Left)
            && let Some(pos) = pointer.world
        {
            events.write(ToolEvent::PrimaryClick { pos });
        }
        if mouse_button.just_pressed(MouseButton::Right) {
            events.write(ToolEvent::SecondaryClick);
        }
    }

    if !typing {
        if keyboard.just_pressed(KeyCode::KeyR) {
            let shift =
                keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
            if shift {
                events.write(ToolEvent::RotateCcw);
            } else {
                events.write(ToolEvent::RotateCw);
            }
        }
        if keyboard.just_pressed(KeyCode::Escape) {
            events.write(ToolEvent::Abort);
        }
    }
}
