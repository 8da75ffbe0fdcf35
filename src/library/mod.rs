mod catalog;
mod definition;

pub use catalog::{builtin_definitions, ComponentCatalog, LookupError};
pub use definition::{
    ComponentDefinition, DefinitionFormatError, DefinitionId, Gate, SymbolVariant, VariantId,
};

use bevy::prelude::*;

pub struct LibraryPlugin;

impl Plugin for LibraryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ComponentCatalog>()
            .add_systems(Startup, catalog::scan_component_library);
    }
}
