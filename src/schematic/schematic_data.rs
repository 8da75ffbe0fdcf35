use std::collections::BTreeMap;

use bevy::prelude::*;
use thiserror::Error;

use super::instance::{ComponentId, ComponentInstance, Placement, SymbolId, SymbolInstance};

/// A mutation could not be applied against the current document state.
///
/// Commands in the undo history report this when their target instance (or
/// its owning component) no longer exists, or when a create would collide
/// with an existing id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("component {0} does not exist in the schematic")]
    ComponentNotFound(ComponentId),
    #[error("component {0} already exists in the schematic")]
    ComponentExists(ComponentId),
    #[error("component {0} still has symbols placed on the sheet")]
    ComponentInUse(ComponentId),
    #[error("symbol {0} does not exist in the schematic")]
    SymbolNotFound(SymbolId),
    #[error("symbol {0} already exists in the schematic")]
    SymbolExists(SymbolId),
}

/// The schematic document: all component and symbol instances of one sheet.
///
/// This is the single mutation surface for the editor. Interactive edits go
/// through commands on the undo stack, which call the checked methods here;
/// preview mutations (the pointer-following symbol) use the same setters
/// directly through the open live edit-command.
#[derive(Resource, Debug, Clone)]
pub struct SchematicData {
    pub name: String,
    pub grid_interval: f32,
    components: BTreeMap<ComponentId, ComponentInstance>,
    symbols: BTreeMap<SymbolId, SymbolInstance>,
    next_component_id: u64,
    next_symbol_id: u64,
}

/// Equality compares observable document state. The id allocators advance
/// monotonically even across undo and are excluded, so undoing N steps
/// restores a document *equal* to the original.
impl PartialEq for SchematicData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.grid_interval == other.grid_interval
            && self.components == other.components
            && self.symbols == other.symbols
    }
}

impl Default for SchematicData {
    fn default() -> Self {
        Self {
            name: "Untitled Schematic".to_string(),
            grid_interval: crate::constants::DEFAULT_GRID_INTERVAL,
            components: BTreeMap::new(),
            symbols: BTreeMap::new(),
            next_component_id: 1,
            next_symbol_id: 1,
        }
    }
}

impl SchematicData {
    /// Reserve an id for a new component instance.
    pub fn allocate_component_id(&mut self) -> ComponentId {
        let id = ComponentId(self.next_component_id);
        self.next_component_id += 1;
        id
    }

    /// Reserve an id for a new symbol instance.
    pub fn allocate_symbol_id(&mut self) -> SymbolId {
        let id = SymbolId(self.next_symbol_id);
        self.next_symbol_id += 1;
        id
    }

    /// Next free designator for the given prefix ("U" -> "U1", "U2", ...).
    pub fn next_designator(&self, prefix: &str) -> String {
        let mut n = 1;
        loop {
            let candidate = format!("{}{}", prefix, n);
            if !self.components.values().any(|c| c.designator == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    pub fn component(&self, id: ComponentId) -> Option<&ComponentInstance> {
        self.components.get(&id)
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&SymbolInstance> {
        self.symbols.get(&id)
    }

    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &ComponentInstance)> {
        self.components.iter().map(|(id, c)| (*id, c))
    }

    pub fn symbols(&self) -> impl Iterator<Item = (SymbolId, &SymbolInstance)> {
        self.symbols.iter().map(|(id, s)| (*id, s))
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn insert_component(
        &mut self,
        id: ComponentId,
        component: ComponentInstance,
    ) -> Result<(), MutationError> {
        if self.components.contains_key(&id) {
            return Err(MutationError::ComponentExists(id));
        }
        self.components.insert(id, component);
        self.next_component_id = self.next_component_id.max(id.0 + 1);
        Ok(())
    }

    /// Remove a component instance. Fails while any symbol still refers to
    /// it, so composite undo order (symbols first) is enforced by the data.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<ComponentInstance, MutationError> {
        if !self.components.contains_key(&id) {
            return Err(MutationError::ComponentNotFound(id));
        }
        if self.symbols.values().any(|s| s.component == id) {
            return Err(MutationError::ComponentInUse(id));
        }
        self.components
            .remove(&id)
            .ok_or(MutationError::ComponentNotFound(id))
    }

    pub fn insert_symbol(
        &mut self,
        id: SymbolId,
        symbol: SymbolInstance,
    ) -> Result<(), MutationError> {
        if self.symbols.contains_key(&id) {
            return Err(MutationError::SymbolExists(id));
        }
        if !self.components.contains_key(&symbol.component) {
            return Err(MutationError::ComponentNotFound(symbol.component));
        }
        self.symbols.insert(id, symbol);
        self.next_symbol_id = self.next_symbol_id.max(id.0 + 1);
        Ok(())
    }

    pub fn remove_symbol(&mut self, id: SymbolId) -> Result<SymbolInstance, MutationError> {
        self.symbols
            .remove(&id)
            .ok_or(MutationError::SymbolNotFound(id))
    }

    pub fn set_symbol_placement(
        &mut self,
        id: SymbolId,
        placement: Placement,
    ) -> Result<(), MutationError> {
        let symbol = self
            .symbols
            .get_mut(&id)
            .ok_or(MutationError::SymbolNotFound(id))?;
        symbol.placement = placement;
        Ok(())
    }

    pub fn set_designator(
        &mut self,
        id: ComponentId,
        designator: String,
    ) -> Result<(), MutationError> {
        let component = self
            .components
            .get_mut(&id)
            .ok_or(MutationError::ComponentNotFound(id))?;
        component.designator = designator;
        Ok(())
    }

    /// Symbols belonging to one component, in id order.
    pub fn symbols_of_component(&self, id: ComponentId) -> Vec<(SymbolId, &SymbolInstance)> {
        self.symbols
            .iter()
            .filter(|(_, s)| s.component == id)
            .map(|(sid, s)| (*sid, s))
            .collect()
    }
}
