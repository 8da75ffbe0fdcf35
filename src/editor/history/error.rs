//! Error types for the transactional undo engine.

use thiserror::Error;

pub use crate::schematic::MutationError;

/// The undo stack's transaction protocol was used out of order.
///
/// These are contract violations of the calling code, not user-facing
/// conditions; callers are expected to gate their entry points on
/// [`UndoStack::is_transaction_open`](super::UndoStack::is_transaction_open).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("a transaction is already open (\"{0}\")")]
    AlreadyOpen(String),
    #[error("no transaction is open")]
    NotOpen,
    #[error("the command group was already committed")]
    AlreadyCommitted,
}

/// Any failure from an undo-stack operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
}
