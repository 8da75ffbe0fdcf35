use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use thiserror::Error;

use super::definition::{ComponentDefinition, DefinitionId, VariantId};

/// A definition lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("the component \"{0}\" was not found in any library")]
    NotFound(DefinitionId),
    #[error(
        "the component \"{0}\" exists in the workspace library but not in the \
         project library; importing workspace components is not implemented yet"
    )]
    NotImported(DefinitionId),
    #[error("the component \"{definition}\" has no symbol variant \"{variant}\"")]
    UnknownVariant {
        definition: DefinitionId,
        variant: VariantId,
    },
    #[error("the symbol variant \"{variant}\" of \"{definition}\" does not contain any gates")]
    EmptyVariant {
        definition: DefinitionId,
        variant: VariantId,
    },
}

/// Component catalog with a workspace tier and a project tier.
///
/// Only project-tier definitions can be placed. A definition that exists in
/// the workspace tier alone resolves to `LookupError::NotImported`; there is
/// deliberately no auto-import policy.
#[derive(Resource, Default)]
pub struct ComponentCatalog {
    pub library_path: PathBuf,
    project: BTreeMap<DefinitionId, ComponentDefinition>,
    workspace: BTreeMap<DefinitionId, ComponentDefinition>,
}

impl ComponentCatalog {
    /// Resolve a definition for placement into the active document.
    pub fn resolve(&self, id: &DefinitionId) -> Result<&ComponentDefinition, LookupError> {
        if let Some(definition) = self.project.get(id) {
            return Ok(definition);
        }
        if self.workspace.contains_key(id) {
            return Err(LookupError::NotImported(id.clone()));
        }
        Err(LookupError::NotFound(id.clone()))
    }

    /// Definitions offered by the picker dialog, project tier first.
    pub fn browsable(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.project
            .values()
            .chain(self.workspace.values().filter(|d| !self.project.contains_key(&d.id)))
    }

    pub fn project_len(&self) -> usize {
        self.project.len()
    }

    pub fn workspace_len(&self) -> usize {
        self.workspace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.project.is_empty() && self.workspace.is_empty()
    }

    pub fn insert_project(&mut self, definition: ComponentDefinition) {
        self.project.insert(definition.id.clone(), definition);
    }

    pub fn insert_workspace(&mut self, definition: ComponentDefinition) {
        self.workspace.insert(definition.id.clone(), definition);
    }
}

/// Startup system: scan `library/{project,workspace}` for definition files,
/// falling back to the built-in demo set when nothing is found.
pub fn scan_component_library(mut catalog: ResMut<ComponentCatalog>) {
    let library_path = crate::paths::library_dir();
    catalog.library_path = library_path.clone();

    let project = load_definitions_from(&library_path.join("project"));
    let workspace = load_definitions_from(&library_path.join("workspace"));

    for definition in project {
        catalog.insert_project(definition);
    }
    for definition in workspace {
        catalog.insert_workspace(definition);
    }

    if catalog.is_empty() {
        for definition in builtin_definitions() {
            catalog.insert_workspace(definition.clone());
            catalog.insert_project(definition);
        }
        info!(
            "No library directory found, seeded {} built-in definitions",
            catalog.project_len()
        );
    } else {
        info!(
            "Loaded component library: {} project, {} workspace definitions",
            catalog.project_len(),
            catalog.workspace_len()
        );
    }
}

fn load_definitions_from(dir: &Path) -> Vec<ComponentDefinition> {
    let mut definitions = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return definitions;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to read definition file {:?}: {}", path, e);
                continue;
            }
        };
        match ComponentDefinition::from_json(&json) {
            Ok(definition) => definitions.push(definition),
            Err(e) => warn!("Skipping invalid definition file {:?}: {}", path, e),
        }
    }
    definitions
}

/// Demo definitions used when no library directory exists on disk.
pub fn builtin_definitions() -> Vec<ComponentDefinition> {
    let jsons = [
        include_str!("builtin/resistor.json"),
        include_str!("builtin/dual_opamp.json"),
        include_str!("builtin/quad_nand.json"),
    ];
    jsons
        .iter()
        .filter_map(|json| match ComponentDefinition::from_json(json) {
            Ok(definition) => Some(definition),
            Err(e) => {
                error!("Built-in definition failed to parse: {}", e);
                None
            }
        })
        .collect()
}
