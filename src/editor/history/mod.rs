//! Transactional undo/redo engine.
//!
//! All reversible document mutation is expressed as [`EditorCommand`]s
//! grouped into [`CompositeCommand`]s, one composite per user-visible
//! action. The [`UndoStack`] owns the committed history and the transaction
//! protocol (begin/append/commit/abort) that interactive tools drive.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last action
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo the last undone action
//!
//! ## Module Structure
//!
//! - [`command`] - EditorCommand enum plus the live SymbolEdit edit-command
//! - [`composite`] - CompositeCommand groups with rollback on partial failure
//! - [`undo_stack`] - UndoStack resource and the transaction protocol
//! - [`error`] - transaction and mutation error types
//! - [`systems`] - Bevy systems for keyboard shortcuts

mod command;
mod composite;
mod error;
mod systems;
mod undo_stack;

#[cfg(test)]
mod tests;

// Re-exports
pub use command::{EditorCommand, SymbolEdit};
pub use composite::CompositeCommand;
pub use error::{HistoryError, MutationError, TransactionError};
pub use systems::{handle_redo, handle_undo};
pub use undo_stack::UndoStack;
