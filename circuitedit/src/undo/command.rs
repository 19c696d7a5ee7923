use serde::{Deserialize, Serialize};

use crate::core::{EditError, EditResult};

/// Lifecycle of a command.
///
/// `Created → Executed → Undone → Redone → Undone → …`, or
/// `Created → Failed` if the first execution fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandState {
    Created,
    Executed,
    Undone,
    Redone,
    Failed,
}

impl CommandState {
    /// Whether the command's effect is currently applied to the model.
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandState::Executed | CommandState::Redone)
    }
}

/// A reversible edit of a model `M`.
///
/// Implementors only provide the `perform_*` operations; sequencing is
/// enforced by [`CommandHandle`]. A failing `perform_execute` must leave the
/// model untouched.
pub trait UndoCommand<M> {
    fn text(&self) -> &str;

    /// Apply the edit. Returns whether the model was changed at all.
    fn perform_execute(&mut self, model: &mut M) -> EditResult<bool>;

    fn perform_undo(&mut self, model: &mut M) -> EditResult<()>;

    /// Apply the edit again after an undo. Element identities may be
    /// regenerated; the resulting model must be structurally equal.
    fn perform_redo(&mut self, model: &mut M) -> EditResult<()>;
}

/// Owns a command and tracks its state.
pub struct CommandHandle<M> {
    command: Box<dyn UndoCommand<M>>,
    state: CommandState,
}

impl<M> CommandHandle<M> {
    pub fn new(command: impl UndoCommand<M> + 'static) -> Self {
        Self::boxed(Box::new(command))
    }

    pub fn boxed(command: Box<dyn UndoCommand<M>>) -> Self {
        Self {
            command,
            state: CommandState::Created,
        }
    }

    pub fn text(&self) -> &str {
        self.command.text()
    }

    pub fn state(&self) -> CommandState {
        self.state
    }

    pub fn execute(&mut self, model: &mut M) -> EditResult<bool> {
        self.expect_state(&[CommandState::Created])?;
        match self.command.perform_execute(model) {
            Ok(effect) => {
                self.state = CommandState::Executed;
                Ok(effect)
            }
            Err(e) => {
                self.state = CommandState::Failed;
                Err(e)
            }
        }
    }

    pub fn undo(&mut self, model: &mut M) -> EditResult<()> {
        self.expect_state(&[CommandState::Executed, CommandState::Redone])?;
        self.command.perform_undo(model)?;
        self.state = CommandState::Undone;
        Ok(())
    }

    pub fn redo(&mut self, model: &mut M) -> EditResult<()> {
        self.expect_state(&[CommandState::Undone])?;
        self.command.perform_redo(model)?;
        self.state = CommandState::Redone;
        Ok(())
    }

    fn expect_state(&self, allowed: &[CommandState]) -> EditResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(EditError::InvalidState {
                command: self.text().to_string(),
                state: self.state,
            })
        }
    }
}

impl<M> std::fmt::Debug for CommandHandle<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandHandle")
            .field("text", &self.text())
            .field("state", &self.state)
            .finish()
    }
}
