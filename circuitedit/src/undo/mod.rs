//! Command engine
//!
//! Every structural edit is an [`UndoCommand`]. Composite edits are
//! [`UndoCommandGroup`]s, which commit all of their children or none of
//! them. [`UndoStack`] keeps the linear undo/redo history of a model.

mod command;
mod group;
mod stack;

pub use command::{CommandHandle, CommandState, UndoCommand};
pub use group::UndoCommandGroup;
pub use stack::{HistoryEntry, UndoStack};
