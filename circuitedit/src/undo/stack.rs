use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::EditResult;

use super::command::{CommandHandle, UndoCommand};

/// What the history shows for one executed command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub executed_at: DateTime<Utc>,
}

/// Linear undo/redo history over a model.
pub struct UndoStack<M> {
    commands: Vec<(CommandHandle<M>, HistoryEntry)>,
    /// Number of commands currently applied.
    current: usize,
}

impl<M> Default for UndoStack<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> UndoStack<M> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            current: 0,
        }
    }

    /// Execute a command and push it. Commands without effect are dropped;
    /// a pushed command discards the redo history.
    pub fn exec_cmd(
        &mut self,
        model: &mut M,
        command: impl UndoCommand<M> + 'static,
    ) -> EditResult<bool> {
        let mut handle = CommandHandle::new(command);
        if !handle.execute(model)? {
            tracing::debug!("\"{}\" had no effect, not added to history", handle.text());
            return Ok(false);
        }
        self.commands.truncate(self.current);
        let entry = HistoryEntry {
            text: handle.text().to_string(),
            executed_at: Utc::now(),
        };
        self.commands.push((handle, entry));
        self.current += 1;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    pub fn can_redo(&self) -> bool {
        self.current < self.commands.len()
    }

    pub fn undo_text(&self) -> Option<&str> {
        self.current
            .checked_sub(1)
            .map(|i| self.commands[i].1.text.as_str())
    }

    pub fn redo_text(&self) -> Option<&str> {
        self.commands.get(self.current).map(|(_, e)| e.text.as_str())
    }

    /// Returns whether anything was undone.
    pub fn undo(&mut self, model: &mut M) -> EditResult<bool> {
        if !self.can_undo() {
            return Ok(false);
        }
        self.commands[self.current - 1].0.undo(model)?;
        self.current -= 1;
        Ok(true)
    }

    /// Returns whether anything was redone.
    pub fn redo(&mut self, model: &mut M) -> EditResult<bool> {
        if !self.can_redo() {
            return Ok(false);
        }
        self.commands[self.current].0.redo(model)?;
        self.current += 1;
        Ok(true)
    }

    /// Entries of all commands currently applied, oldest first.
    pub fn history(&self) -> Vec<&HistoryEntry> {
        self.commands[..self.current].iter().map(|(_, e)| e).collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EditError;

    struct Add(i32);

    impl UndoCommand<i32> for Add {
        fn text(&self) -> &str {
            "add"
        }

        fn perform_execute(&mut self, model: &mut i32) -> EditResult<bool> {
            if self.0 == i32::MIN {
                return Err(EditError::logic("overflow"));
            }
            *model += self.0;
            Ok(self.0 != 0)
        }

        fn perform_undo(&mut self, model: &mut i32) -> EditResult<()> {
            *model -= self.0;
            Ok(())
        }

        fn perform_redo(&mut self, model: &mut i32) -> EditResult<()> {
            *model += self.0;
            Ok(())
        }
    }

    #[test]
    fn test_undo_redo_cursor() {
        let mut stack = UndoStack::new();
        let mut model = 0;
        stack.exec_cmd(&mut model, Add(1)).unwrap();
        stack.exec_cmd(&mut model, Add(2)).unwrap();
        assert_eq!(model, 3);

        assert!(stack.undo(&mut model).unwrap());
        assert_eq!(model, 1);
        assert!(stack.can_redo());

        stack.exec_cmd(&mut model, Add(10)).unwrap();
        assert!(!stack.can_redo(), "new command discards redo history");
        assert_eq!(model, 11);
        assert_eq!(stack.history().len(), 2);

        assert!(stack.undo(&mut model).unwrap());
        assert!(stack.undo(&mut model).unwrap());
        assert!(!stack.undo(&mut model).unwrap());
        assert_eq!(model, 0);
        assert!(stack.redo(&mut model).unwrap());
        assert_eq!(model, 1);
        assert_eq!(stack.undo_text(), Some("add"));
    }

    #[test]
    fn test_commands_without_effect_are_dropped() {
        let mut stack = UndoStack::new();
        let mut model = 0;
        assert!(!stack.exec_cmd(&mut model, Add(0)).unwrap());
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_failed_command_is_not_pushed() {
        let mut stack = UndoStack::new();
        let mut model = 0;
        assert!(stack.exec_cmd(&mut model, Add(i32::MIN)).is_err());
        assert!(!stack.can_undo());
        assert_eq!(model, 0);
    }

    #[test]
    fn test_history_serializes() {
        let mut stack = UndoStack::new();
        let mut model = 0;
        stack.exec_cmd(&mut model, Add(4)).unwrap();
        let json = serde_json::to_string(&stack.history()).unwrap();
        assert!(json.contains("\"text\":\"add\""));
    }
}
