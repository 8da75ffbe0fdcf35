//! Ordered command groups forming one user-visible undo step.

use bevy::prelude::*;

use crate::schematic::{MutationError, SchematicData};

use super::command::EditorCommand;
use super::error::TransactionError;

/// An ordered sequence of commands that execute and undo as one unit.
///
/// Children run in append order on execute/redo and in strictly reverse
/// order on undo. If a child fails partway through execute, the already
/// executed children are undone before the error propagates, so a composite
/// is never left half-applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeCommand {
    label: String,
    commands: Vec<EditorCommand>,
    committed: bool,
}

impl CompositeCommand {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
            committed: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Append a command. Composition is frozen once committed.
    pub fn append(&mut self, command: EditorCommand) -> Result<(), TransactionError> {
        if self.committed {
            return Err(TransactionError::AlreadyCommitted);
        }
        self.commands.push(command);
        Ok(())
    }

    /// Seal the composite; no further appends are accepted.
    pub fn mark_committed(&mut self) {
        self.committed = true;
    }

    /// Execute all children in order, rolling back on partial failure.
    pub fn execute(&self, doc: &mut SchematicData) -> Result<(), MutationError> {
        for (index, command) in self.commands.iter().enumerate() {
            if let Err(e) = command.execute(doc) {
                // Unwind the children that already ran, newest first.
                for executed in self.commands[..index].iter().rev() {
                    if let Err(rollback) = executed.undo(doc) {
                        warn!(
                            "Rollback of \"{}\" failed after partial execute: {}",
                            self.label, rollback
                        );
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Undo all children in reverse order.
    pub fn undo(&self, doc: &mut SchematicData) -> Result<(), MutationError> {
        for command in self.commands.iter().rev() {
            command.undo(doc)?;
        }
        Ok(())
    }

    /// Undo as much as possible, reporting failures without stopping.
    /// Used by transaction abort, which must never propagate.
    pub fn undo_best_effort(&self, doc: &mut SchematicData) {
        for command in self.commands.iter().rev() {
            if let Err(e) = command.undo(doc) {
                warn!("Rollback failure while aborting \"{}\": {}", self.label, e);
            }
        }
    }
}
