//! Schematic save/load systems and task polling.
//!
//! File I/O and JSON parsing run on the IO task pool; results are polled back
//! on the main thread, where the document is swapped in synchronously.
//! Loading validates structural invariants (unique ids, known component
//! references) and fails without touching the current document.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editor::history::UndoStack;
use crate::editor::placement::PlacementTool;
use crate::library::{DefinitionId, VariantId};

use super::instance::{ComponentId, ComponentInstance, Placement, SymbolId, SymbolInstance};
use super::schematic_data::SchematicData;

// ---------------------------------------------------------------------------
// Saved document types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedComponent {
    pub id: u64,
    pub definition: DefinitionId,
    pub variant: VariantId,
    pub designator: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSymbol {
    pub id: u64,
    pub component: u64,
    pub gate: String,
    pub position: Vec2,
    pub rotation_deg: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSchematic {
    pub name: String,
    pub grid_interval: f32,
    pub components: Vec<SavedComponent>,
    pub symbols: Vec<SavedSymbol>,
}

/// Structural validation failure in a persisted schematic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchematicValidationError {
    #[error("duplicate component id {0} in schematic file")]
    DuplicateComponentId(u64),
    #[error("duplicate symbol id {0} in schematic file")]
    DuplicateSymbolId(u64),
    #[error("symbol {symbol} references unknown component {component}")]
    UnknownComponent { symbol: u64, component: u64 },
}

impl SavedSchematic {
    pub fn from_document(doc: &SchematicData) -> Self {
        Self {
            name: doc.name.clone(),
            grid_interval: doc.grid_interval,
            components: doc
                .components()
                .map(|(id, c)| SavedComponent {
                    id: id.0,
                    definition: c.definition.clone(),
                    variant: c.variant.clone(),
                    designator: c.designator.clone(),
                })
                .collect(),
            symbols: doc
                .symbols()
                .map(|(id, s)| SavedSymbol {
                    id: id.0,
                    component: s.component.0,
                    gate: s.gate.clone(),
                    position: s.placement.position,
                    rotation_deg: s.placement.rotation_deg,
                })
                .collect(),
        }
    }

    /// Rebuild a document, validating ids and references. Never coerces
    /// malformed data into a partial document.
    pub fn into_document(self) -> Result<SchematicData, SchematicValidationError> {
        let mut doc = SchematicData::default();
        doc.name = self.name;
        doc.grid_interval = self.grid_interval;
        for saved in self.components {
            let id = ComponentId(saved.id);
            doc.insert_component(
                id,
                ComponentInstance {
                    definition: saved.definition,
                    variant: saved.variant,
                    designator: saved.designator,
                },
            )
            .map_err(|_| SchematicValidationError::DuplicateComponentId(saved.id))?;
        }
        for saved in self.symbols {
            let id = SymbolId(saved.id);
            if doc.symbol(id).is_some() {
                return Err(SchematicValidationError::DuplicateSymbolId(saved.id));
            }
            let component = ComponentId(saved.component);
            if doc.component(component).is_none() {
                return Err(SchematicValidationError::UnknownComponent {
                    symbol: saved.id,
                    component: saved.component,
                });
            }
            doc.insert_symbol(
                id,
                SymbolInstance {
                    component,
                    gate: saved.gate,
                    placement: Placement::new(saved.position, saved.rotation_deg),
                },
            )
            .map_err(|_| SchematicValidationError::DuplicateSymbolId(saved.id))?;
        }
        Ok(doc)
    }
}

// ---------------------------------------------------------------------------
// Messages, resources, task results
// ---------------------------------------------------------------------------

#[derive(Message)]
pub struct SaveSchematicRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct LoadSchematicRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct NewSchematicRequest;

/// Resource tracking load errors for display to the user.
#[derive(Resource, Default)]
pub struct LoadError {
    pub message: Option<String>,
}

/// Resource tracking save errors for display to the user.
#[derive(Resource, Default)]
pub struct SaveError {
    pub message: Option<String>,
}

/// Resource tracking the currently loaded schematic file path.
#[derive(Resource, Default)]
pub struct CurrentSchematicFile {
    pub path: Option<PathBuf>,
}

/// Resource tracking whether the document has unsaved changes.
#[derive(Resource, Default)]
pub struct DirtyState {
    pub is_dirty: bool,
    /// Swallow the next change-detection tick (set after load/new/save).
    pub suppress_once: bool,
}

impl DirtyState {
    pub fn mark_clean(&mut self) {
        self.is_dirty = false;
        self.suppress_once = true;
    }
}

/// Resource tracking async file operations for the modal overlay.
#[derive(Resource, Default)]
pub struct AsyncFileOperation {
    pub is_saving: bool,
    pub is_loading: bool,
    pub description: Option<String>,
}

impl AsyncFileOperation {
    pub fn is_busy(&self) -> bool {
        self.is_saving || self.is_loading
    }
}

pub struct SaveResult {
    pub path: PathBuf,
    pub error: Option<String>,
}

pub struct LoadResult {
    pub path: PathBuf,
    pub document: Option<SchematicData>,
    pub error: Option<String>,
}

#[derive(Component)]
pub struct SaveSchematicTask(pub Task<SaveResult>);

#[derive(Component)]
pub struct LoadSchematicTask(pub Task<LoadResult>);

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Starts an async save operation.
pub fn save_schematic_system(
    mut commands: Commands,
    mut events: MessageReader<SaveSchematicRequest>,
    doc: Res<SchematicData>,
    mut async_op: ResMut<AsyncFileOperation>,
) {
    for event in events.read() {
        if async_op.is_busy() {
            warn!("File operation already in progress");
            continue;
        }

        let saved = SavedSchematic::from_document(&doc);
        let path = event.path.clone();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("schematic")
            .to_string();

        async_op.is_saving = true;
        async_op.description = Some(format!("Saving {}...", file_name));

        let task = IoTaskPool::get().spawn(async move {
            let json = match serde_json::to_string_pretty(&saved) {
                Ok(json) => json,
                Err(e) => {
                    return SaveResult {
                        path,
                        error: Some(format!("Failed to serialize schematic: {}", e)),
                    };
                }
            };
            match std::fs::write(&path, json) {
                Ok(()) => SaveResult { path, error: None },
                Err(e) => SaveResult {
                    path,
                    error: Some(format!("Failed to write file: {}", e)),
                },
            }
        });
        commands.spawn(SaveSchematicTask(task));
    }
}

/// Starts an async load operation (file I/O, parsing, and validation).
pub fn load_schematic_system(
    mut commands: Commands,
    mut events: MessageReader<LoadSchematicRequest>,
    mut async_op: ResMut<AsyncFileOperation>,
) {
    for event in events.read() {
        if async_op.is_busy() {
            warn!("File operation already in progress");
            continue;
        }

        let path = event.path.clone();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("schematic")
            .to_string();

        async_op.is_loading = true;
        async_op.description = Some(format!("Loading {}...", file_name));

        let task = IoTaskPool::get().spawn(async move {
            let json = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    return LoadResult {
                        path,
                        document: None,
                        error: Some(format!("Failed to read file: {}", e)),
                    };
                }
            };
            let saved = match serde_json::from_str::<SavedSchematic>(&json) {
                Ok(saved) => saved,
                Err(e) => {
                    return LoadResult {
                        path,
                        document: None,
                        error: Some(format!("Failed to parse schematic file: {}", e)),
                    };
                }
            };
            match saved.into_document() {
                Ok(document) => LoadResult {
                    path,
                    document: Some(document),
                    error: None,
                },
                Err(e) => LoadResult {
                    path,
                    document: None,
                    error: Some(format!("Invalid schematic file: {}", e)),
                },
            }
        });
        commands.spawn(LoadSchematicTask(task));
    }
}

/// Replaces the current document with an empty one.
#[allow(clippy::too_many_arguments)]
pub fn new_schematic_system(
    mut events: MessageReader<NewSchematicRequest>,
    mut doc: ResMut<SchematicData>,
    mut undo_stack: ResMut<UndoStack>,
    mut tool: ResMut<PlacementTool>,
    mut current_file: ResMut<CurrentSchematicFile>,
    mut dirty: ResMut<DirtyState>,
) {
    for _ in events.read() {
        tool.deactivate(&mut doc, &mut undo_stack);
        *doc = SchematicData::default();
        undo_stack.clear();
        current_file.path = None;
        dirty.mark_clean();
        info!("Created new schematic");
    }
}

pub fn poll_save_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut SaveSchematicTask)>,
    mut async_op: ResMut<AsyncFileOperation>,
    mut save_error: ResMut<SaveError>,
    mut current_file: ResMut<CurrentSchematicFile>,
    mut dirty: ResMut<DirtyState>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();
        async_op.is_saving = false;
        async_op.description = None;

        match result.error {
            Some(error) => {
                warn!("Save failed: {}", error);
                save_error.message = Some(error);
            }
            None => {
                info!("Saved schematic to {:?}", result.path);
                current_file.path = Some(result.path);
                dirty.mark_clean();
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn poll_load_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut LoadSchematicTask)>,
    mut async_op: ResMut<AsyncFileOperation>,
    mut load_error: ResMut<LoadError>,
    mut doc: ResMut<SchematicData>,
    mut undo_stack: ResMut<UndoStack>,
    mut tool: ResMut<PlacementTool>,
    mut current_file: ResMut<CurrentSchematicFile>,
    mut dirty: ResMut<DirtyState>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();
        async_op.is_loading = false;
        async_op.description = None;

        match (result.document, result.error) {
            (Some(document), None) => {
                // Close any in-flight placement against the old document
                // before swapping it out.
                tool.deactivate(&mut doc, &mut undo_stack);
                *doc = document;
                undo_stack.clear();
                current_file.path = Some(result.path.clone());
                dirty.mark_clean();
                info!(
                    "Loaded schematic from {:?} ({} components, {} symbols)",
                    result.path,
                    doc.component_count(),
                    doc.symbol_count()
                );
            }
            (_, error) => {
                let message =
                    error.unwrap_or_else(|| "Load produced no document".to_string());
                warn!("Load failed: {}", message);
                load_error.message = Some(message);
            }
        }
    }
}

/// Marks the document dirty whenever it changes, except for the tick right
/// after a load/save/new marked it clean.
pub fn detect_document_changes(doc: Res<SchematicData>, mut dirty: ResMut<DirtyState>) {
    if !doc.is_changed() || doc.is_added() {
        return;
    }
    if dirty.suppress_once {
        dirty.suppress_once = false;
        return;
    }
    dirty.is_dirty = true;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_doc() -> SchematicData {
        let mut doc = SchematicData::default();
        doc.name = "Amp Board".to_string();
        let cid = doc.allocate_component_id();
        doc.insert_component(
            cid,
            ComponentInstance {
                definition: DefinitionId::new("dual-opamp"),
                variant: VariantId::new("default"),
                designator: "U1".to_string(),
            },
        )
        .unwrap();
        for (gate, x) in [("A", 100.0), ("B", 300.0)] {
            let sid = doc.allocate_symbol_id();
            doc.insert_symbol(
                sid,
                SymbolInstance {
                    component: cid,
                    gate: gate.to_string(),
                    placement: Placement::new(Vec2::new(x, 50.0), 90),
                },
            )
            .unwrap();
        }
        doc
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let doc = populated_doc();
        let saved = SavedSchematic::from_document(&doc);
        let json = serde_json::to_string(&saved).unwrap();
        let reparsed: SavedSchematic = serde_json::from_str(&json).unwrap();
        let restored = reparsed.into_document().unwrap();
        assert_eq!(doc, restored);
    }

    #[test]
    fn test_duplicate_component_id_fails() {
        let mut saved = SavedSchematic::from_document(&populated_doc());
        let duplicate = saved.components[0].clone();
        saved.components.push(duplicate);
        assert_eq!(
            saved.into_document(),
            Err(SchematicValidationError::DuplicateComponentId(1))
        );
    }

    #[test]
    fn test_duplicate_symbol_id_fails() {
        let mut saved = SavedSchematic::from_document(&populated_doc());
        let duplicate = saved.symbols[0].clone();
        saved.symbols.push(duplicate);
        assert!(matches!(
            saved.into_document(),
            Err(SchematicValidationError::DuplicateSymbolId(_))
        ));
    }

    #[test]
    fn test_unknown_component_reference_fails() {
        let mut saved = SavedSchematic::from_document(&populated_doc());
        saved.symbols[0].component = 99;
        let symbol = saved.symbols[0].id;
        assert_eq!(
            saved.into_document(),
            Err(SchematicValidationError::UnknownComponent {
                symbol,
                component: 99
            })
        );
    }

    #[test]
    fn test_loaded_document_allocators_advance() {
        let saved = SavedSchematic::from_document(&populated_doc());
        let mut restored = saved.into_document().unwrap();
        let fresh = restored.allocate_symbol_id();
        assert!(fresh.0 > 2, "allocator must start past loaded ids");
    }

    #[test]
    fn test_dirty_state_mark_clean() {
        let mut dirty = DirtyState {
            is_dirty: true,
            suppress_once: false,
        };
        dirty.mark_clean();
        assert!(!dirty.is_dirty);
        assert!(dirty.suppress_once);
    }
}
