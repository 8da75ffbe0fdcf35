use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::ui::DialogState;

use super::placement::ToolEvent;
use super::selection::SelectedSymbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Select,
    AddComponent,
}

impl EditorTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select (V)",
            EditorTool::AddComponent => "Add Component (A)",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            EditorTool::Select => CursorIcon::System(SystemCursorIcon::Default),
            EditorTool::AddComponent => CursorIcon::System(SystemCursorIcon::Crosshair),
        }
    }

    pub fn all() -> &'static [EditorTool] {
        &[EditorTool::Select, EditorTool::AddComponent]
    }
}

#[derive(Resource, Default)]
pub struct CurrentTool {
    pub tool: EditorTool,
}

/// Keyboard shortcuts for tool switching.
pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_tool: ResMut<CurrentTool>,
    dialog_state: Res<DialogState>,
    mut contexts: EguiContexts,
) {
    if dialog_state.any_modal_open {
        return;
    }
    // Don't change tools if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let new_tool = if keyboard.just_pressed(KeyCode::KeyV) || keyboard.just_pressed(KeyCode::KeyS)
    {
        Some(EditorTool::Select)
    } else if keyboard.just_pressed(KeyCode::KeyA) {
        Some(EditorTool::AddComponent)
    } else {
        None
    };

    if let Some(tool) = new_tool {
        current_tool.tool = tool;
    }
}

/// Translates tool switches into state-machine events: entering the
/// placement tool opens the picker, leaving it tears the session down.
pub fn emit_tool_change_events(
    current_tool: Res<CurrentTool>,
    mut previous: Local<Option<EditorTool>>,
    mut events: MessageWriter<ToolEvent>,
    mut selected: ResMut<SelectedSymbol>,
) {
    let tool = current_tool.tool;
    if *previous == Some(tool) {
        return;
    }
    let old = previous.replace(tool);

    if old == Some(EditorTool::AddComponent) {
        events.write(ToolEvent::ToolDeactivated);
    }
    if tool == EditorTool::AddComponent {
        // Clear selection when leaving the select tool
        selected.symbol = None;
        events.write(ToolEvent::StartPlacement { definition: None });
    }
}

pub fn update_cursor_icon(
    current_tool: Res<CurrentTool>,
    window_query: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok(entity) = window_query.single() else {
        return;
    };

    // Use default cursor over UI, tool cursor in editor space
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    commands.entity(entity).insert(current_tool.tool.cursor_icon());
}
