mod camera;
mod grid;
pub mod history;
mod input;
pub mod placement;
mod render;
mod selection;
pub mod tools;

pub use camera::EditorCamera;
pub use grid::{snap_to_grid, GridSettings};
pub use input::PointerPosition;
pub use placement::{PlacementTool, ToolEvent};
pub use selection::SelectedSymbol;
pub use tools::{CurrentTool, EditorTool};

use bevy::prelude::*;

use history::UndoStack;

/// Editor-level error surfaced to the user through a modal dialog.
///
/// The engine and the tools only produce typed errors; this resource is the
/// presentation boundary the UI reads from.
#[derive(Resource, Default)]
pub struct EditorError {
    pub message: Option<String>,
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UndoStack>()
            .init_resource::<EditorError>()
            .init_resource::<tools::CurrentTool>()
            .init_resource::<GridSettings>()
            .init_resource::<PointerPosition>()
            .init_resource::<SelectedSymbol>()
            .init_resource::<PlacementTool>()
            .add_message::<ToolEvent>()
            .add_systems(Startup, camera::spawn_camera)
            .add_systems(
                Update,
                (
                    camera::camera_pan,
                    camera::camera_zoom,
                    camera::apply_camera_zoom,
                    grid::draw_grid,
                    tools::handle_tool_shortcuts,
                    tools::update_cursor_icon,
                ),
            )
            .add_systems(
                Update,
                // Event producers run before the state machine drains the
                // queue so one frame's input is handled in arrival order.
                (
                    tools::emit_tool_change_events,
                    input::track_pointer,
                    input::emit_placement_input,
                    placement::process_tool_events,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    selection::handle_selection,
                    selection::handle_deletion,
                    render::draw_symbols,
                    history::handle_undo,
                    history::handle_redo,
                ),
            );
    }
}
