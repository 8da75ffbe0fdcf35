//! The transactional undo stack.

use bevy::prelude::*;

use crate::schematic::SchematicData;

use super::command::EditorCommand;
use super::composite::CompositeCommand;
use super::error::{HistoryError, TransactionError};

/// Linear undo history plus at most one open transaction.
///
/// The history is a vector of committed composites with a cursor marking the
/// undo/redo boundary: everything before the cursor is applied, everything
/// at or after it is redoable. All interactive document mutation happens
/// through the open transaction.
#[derive(Resource, Default)]
pub struct UndoStack {
    history: Vec<CompositeCommand>,
    /// Number of applied composites; `history[cursor..]` is the redo tail.
    cursor: usize,
    open: Option<CompositeCommand>,
}

impl UndoStack {
    /// Open a new transaction. Starting a new edit branch discards any redo
    /// tail beyond the cursor.
    pub fn begin_transaction(
        &mut self,
        label: impl Into<String>,
    ) -> Result<(), TransactionError> {
        if let Some(open) = &self.open {
            return Err(TransactionError::AlreadyOpen(open.label().to_string()));
        }
        self.history.truncate(self.cursor);
        self.open = Some(CompositeCommand::new(label));
        Ok(())
    }

    /// Execute a command immediately and append it to the open transaction.
    /// If execution fails the command is not appended.
    pub fn append_to_transaction(
        &mut self,
        command: EditorCommand,
        doc: &mut SchematicData,
    ) -> Result<(), HistoryError> {
        let open = self.open.as_mut().ok_or(TransactionError::NotOpen)?;
        command.execute(doc)?;
        open.append(command)?;
        Ok(())
    }

    /// Close the open transaction and push it onto the history. An empty
    /// composite is dropped instead of polluting the history.
    pub fn commit_transaction(&mut self) -> Result<(), TransactionError> {
        let mut open = self.open.take().ok_or(TransactionError::NotOpen)?;
        if open.is_empty() {
            return Ok(());
        }
        open.mark_committed();
        self.history.push(open);
        self.cursor = self.history.len();
        Ok(())
    }

    /// Undo everything appended so far and discard the open transaction.
    ///
    /// Safe to call with no open transaction (no-op). Never propagates:
    /// abort runs on error-recovery paths, so rollback failures are logged
    /// and the transaction is cleared regardless.
    pub fn abort_transaction(&mut self, doc: &mut SchematicData) {
        let Some(open) = self.open.take() else {
            return;
        };
        open.undo_best_effort(doc);
    }

    /// Move the cursor back by one composite.
    pub fn undo(&mut self, doc: &mut SchematicData) -> Result<(), HistoryError> {
        if let Some(open) = &self.open {
            return Err(TransactionError::AlreadyOpen(open.label().to_string()).into());
        }
        if self.cursor == 0 {
            return Ok(());
        }
        self.history[self.cursor - 1].undo(doc)?;
        self.cursor -= 1;
        Ok(())
    }

    /// Move the cursor forward by one composite, re-executing its captured
    /// commands.
    pub fn redo(&mut self, doc: &mut SchematicData) -> Result<(), HistoryError> {
        if let Some(open) = &self.open {
            return Err(TransactionError::AlreadyOpen(open.label().to_string()).into());
        }
        if self.cursor >= self.history.len() {
            return Ok(());
        }
        self.history[self.cursor].execute(doc)?;
        self.cursor += 1;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.open.is_none() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.open.is_none() && self.cursor < self.history.len()
    }

    /// Label of the composite the next `undo` would revert.
    pub fn undo_label(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .and_then(|i| self.history.get(i))
            .map(|c| c.label())
    }

    /// Label of the composite the next `redo` would re-apply.
    pub fn redo_label(&self) -> Option<&str> {
        self.history.get(self.cursor).map(|c| c.label())
    }

    pub fn is_transaction_open(&self) -> bool {
        self.open.is_some()
    }

    /// Number of committed composites (applied or redoable).
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of composites the cursor has applied.
    pub fn applied_len(&self) -> usize {
        self.cursor
    }

    /// Number of commands appended to the open transaction so far.
    pub fn open_len(&self) -> Option<usize> {
        self.open.as_ref().map(|c| c.len())
    }

    /// Drop all history and any open transaction without touching the
    /// document. Used when the document itself is replaced.
    pub fn clear(&mut self) {
        if let Some(open) = &self.open {
            warn!(
                "Undo stack cleared while transaction \"{}\" was still open",
                open.label()
            );
        }
        self.history.clear();
        self.cursor = 0;
        self.open = None;
    }
}
