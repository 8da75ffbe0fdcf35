mod component_picker;
pub mod file_menu;
mod properties;
mod status;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::editor::{EditorError, PlacementTool};
use crate::schematic::{AsyncFileOperation, LoadError, SaveError};

pub use component_picker::PickerState;

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers check this to avoid processing input while the
/// user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
fn update_dialog_state(
    tool: Res<PlacementTool>,
    file_menu: Res<file_menu::FileMenuState>,
    editor_error: Res<EditorError>,
    save_error: Res<SaveError>,
    load_error: Res<LoadError>,
    async_op: Res<AsyncFileOperation>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = tool.is_awaiting_selection()
        || file_menu.show_new_confirmation
        || editor_error.message.is_some()
        || save_error.message.is_some()
        || load_error.message.is_some()
        || async_op.is_busy();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<file_menu::FileMenuState>()
            .init_resource::<component_picker::PickerState>()
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Top panels first, then overlays/dialogs
                    file_menu::file_menu_ui,
                    toolbar::toolbar_ui,
                    status::status_bar_ui,
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    properties::properties_panel_ui,
                    component_picker::component_picker_ui,
                    file_menu::new_confirmation_ui,
                    status::editor_error_dialog_ui,
                    status::file_error_dialogs_ui,
                    status::async_operation_modal_ui,
                )
                    .after(status::status_bar_ui),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
