//! Reversible editor commands and the live symbol edit-command.

use crate::schematic::{
    ComponentId, ComponentInstance, MutationError, Placement, SchematicData, SymbolId,
    SymbolInstance,
};

/// A reversible mutation of exactly one document instance.
///
/// Each variant captures its forward parameters and enough prior state to
/// invert itself. Redo re-applies the captured parameters; nothing is
/// re-derived from current document state.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// A component instance was added to the circuit.
    AddComponent {
        id: ComponentId,
        component: ComponentInstance,
    },
    /// A component instance was removed from the circuit.
    RemoveComponent {
        id: ComponentId,
        component: ComponentInstance,
    },
    /// A gate symbol was placed on the sheet.
    AddSymbol { id: SymbolId, symbol: SymbolInstance },
    /// A gate symbol was removed from the sheet.
    RemoveSymbol { id: SymbolId, symbol: SymbolInstance },
    /// A symbol was moved and/or rotated.
    EditSymbol {
        id: SymbolId,
        from: Placement,
        to: Placement,
    },
    /// A component's designator was changed.
    SetDesignator {
        id: ComponentId,
        from: String,
        to: String,
    },
}

impl EditorCommand {
    /// Apply the forward mutation. Fails without side effects if the target
    /// is no longer valid.
    pub fn execute(&self, doc: &mut SchematicData) -> Result<(), MutationError> {
        match self {
            EditorCommand::AddComponent { id, component } => {
                doc.insert_component(*id, component.clone())
            }
            EditorCommand::RemoveComponent { id, .. } => doc.remove_component(*id).map(|_| ()),
            EditorCommand::AddSymbol { id, symbol } => doc.insert_symbol(*id, symbol.clone()),
            EditorCommand::RemoveSymbol { id, .. } => doc.remove_symbol(*id).map(|_| ()),
            EditorCommand::EditSymbol { id, to, .. } => doc.set_symbol_placement(*id, *to),
            EditorCommand::SetDesignator { id, to, .. } => doc.set_designator(*id, to.clone()),
        }
    }

    /// Apply the inverse mutation, restoring the state captured at
    /// construction time.
    pub fn undo(&self, doc: &mut SchematicData) -> Result<(), MutationError> {
        match self {
            EditorCommand::AddComponent { id, .. } => doc.remove_component(*id).map(|_| ()),
            EditorCommand::RemoveComponent { id, component } => {
                doc.insert_component(*id, component.clone())
            }
            EditorCommand::AddSymbol { id, .. } => doc.remove_symbol(*id).map(|_| ()),
            EditorCommand::RemoveSymbol { id, symbol } => doc.insert_symbol(*id, symbol.clone()),
            EditorCommand::EditSymbol { id, from, .. } => doc.set_symbol_placement(*id, *from),
            EditorCommand::SetDesignator { id, from, .. } => {
                doc.set_designator(*id, from.clone())
            }
        }
    }
}

/// Live edit-command for the symbol currently following the pointer.
///
/// Captures the symbol's placement when the edit begins; preview calls
/// mutate the document immediately but only update the recorded target
/// placement. `into_command` freezes the edit into an [`EditorCommand`]
/// whose undo restores the pre-preview placement, so aborted previews leave
/// no trace.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEdit {
    id: SymbolId,
    from: Placement,
    to: Placement,
}

impl SymbolEdit {
    /// Begin editing a symbol, capturing its current placement.
    pub fn begin(doc: &SchematicData, id: SymbolId) -> Result<Self, MutationError> {
        let symbol = doc.symbol(id).ok_or(MutationError::SymbolNotFound(id))?;
        Ok(Self {
            id,
            from: symbol.placement,
            to: symbol.placement,
        })
    }

    pub fn symbol_id(&self) -> SymbolId {
        self.id
    }

    /// Set the target position. With `preview` the document is updated
    /// immediately so the viewport follows the pointer.
    pub fn set_position(
        &mut self,
        doc: &mut SchematicData,
        position: bevy::prelude::Vec2,
        preview: bool,
    ) -> Result<(), MutationError> {
        self.to = self.to.with_position(position);
        if preview {
            doc.set_symbol_placement(self.id, self.to)?;
        }
        Ok(())
    }

    /// Set the target rotation, with the same preview semantics.
    pub fn set_rotation(
        &mut self,
        doc: &mut SchematicData,
        rotation_deg: i32,
        preview: bool,
    ) -> Result<(), MutationError> {
        self.to = self.to.with_rotation(rotation_deg);
        if preview {
            doc.set_symbol_placement(self.id, self.to)?;
        }
        Ok(())
    }

    /// Freeze the edit into a history command.
    pub fn into_command(self) -> EditorCommand {
        EditorCommand::EditSymbol {
            id: self.id,
            from: self.from,
            to: self.to,
        }
    }
}
