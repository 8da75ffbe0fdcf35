mod instance;
mod pad;
pub mod persistence;
mod schematic_data;

pub use instance::{
    normalize_angle, ComponentId, ComponentInstance, Placement, SymbolId, SymbolInstance,
};
pub use pad::{Pad, PadFormatError, PadShape, PadSide};
pub use persistence::{
    AsyncFileOperation, CurrentSchematicFile, DirtyState, LoadError, LoadSchematicRequest,
    NewSchematicRequest, SaveError, SaveSchematicRequest, SavedSchematic,
};
pub use schematic_data::{MutationError, SchematicData};

use bevy::prelude::*;

pub struct SchematicPlugin;

impl Plugin for SchematicPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SchematicData>()
            .init_resource::<LoadError>()
            .init_resource::<SaveError>()
            .init_resource::<CurrentSchematicFile>()
            .init_resource::<DirtyState>()
            .init_resource::<AsyncFileOperation>()
            .add_message::<SaveSchematicRequest>()
            .add_message::<LoadSchematicRequest>()
            .add_message::<NewSchematicRequest>()
            .add_systems(
                Update,
                (
                    persistence::save_schematic_system
                        .run_if(on_message::<SaveSchematicRequest>),
                    persistence::load_schematic_system
                        .run_if(on_message::<LoadSchematicRequest>),
                    persistence::new_schematic_system.run_if(on_message::<NewSchematicRequest>),
                    persistence::poll_save_tasks,
                    persistence::poll_load_tasks,
                    persistence::detect_document_changes,
                ),
            );
    }
}
