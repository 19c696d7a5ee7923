use crate::core::EditResult;

use super::command::{CommandHandle, UndoCommand};

/// An ordered sequence of child commands committed as one edit.
///
/// Children are either appended before the group runs
/// ([`append_child`](Self::append_child)) or created and executed while it
/// runs ([`exec_new_child_cmd`](Self::exec_new_child_cmd), inside
/// [`execute_atomically`](Self::execute_atomically)). If any child fails, all
/// children executed so far are undone in reverse order and the error is
/// returned; the group then holds no children.
pub struct UndoCommandGroup<M> {
    text: String,
    pending: Vec<Box<dyn UndoCommand<M>>>,
    children: Vec<CommandHandle<M>>,
}

impl<M> UndoCommandGroup<M> {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pending: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Queue a child to be executed when the group itself is executed.
    pub fn append_child(&mut self, command: impl UndoCommand<M> + 'static) {
        self.pending.push(Box::new(command));
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn children(&self) -> &[CommandHandle<M>] {
        &self.children
    }

    /// Execute `command` right away and keep it as the next child.
    pub fn exec_new_child_cmd(
        &mut self,
        model: &mut M,
        command: impl UndoCommand<M> + 'static,
    ) -> EditResult<bool> {
        self.exec_boxed_child(model, Box::new(command))
    }

    fn exec_boxed_child(
        &mut self,
        model: &mut M,
        command: Box<dyn UndoCommand<M>>,
    ) -> EditResult<bool> {
        let mut handle = CommandHandle::boxed(command);
        let effect = handle.execute(model)?;
        self.children.push(handle);
        Ok(effect)
    }

    /// Run `build`, which adds children through `exec_new_child_cmd`. On
    /// success the group reports whether it has any children; on failure
    /// every child executed so far is rolled back before the error is
    /// returned.
    pub fn execute_atomically<F>(&mut self, model: &mut M, build: F) -> EditResult<bool>
    where
        F: FnOnce(&mut Self, &mut M) -> EditResult<()>,
    {
        match build(self, model) {
            Ok(()) => Ok(self.child_count() > 0),
            Err(e) => {
                self.rollback(model);
                Err(e)
            }
        }
    }

    /// Undo all children in reverse order. If one of them fails, the
    /// children undone so far are redone again.
    pub fn undo_children(&mut self, model: &mut M) -> EditResult<()> {
        for i in (0..self.children.len()).rev() {
            if let Err(e) = self.children[i].undo(model) {
                tracing::warn!("Undo of \"{}\" failed, restoring: {}", self.text, e);
                for child in &mut self.children[i + 1..] {
                    if let Err(e) = child.redo(model) {
                        tracing::error!("Restoring \"{}\" failed: {}", child.text(), e);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Redo all children in order. If one of them fails, the children redone
    /// so far are undone again.
    pub fn redo_children(&mut self, model: &mut M) -> EditResult<()> {
        for i in 0..self.children.len() {
            if let Err(e) = self.children[i].redo(model) {
                tracing::warn!("Redo of \"{}\" failed, restoring: {}", self.text, e);
                for child in self.children[..i].iter_mut().rev() {
                    if let Err(e) = child.undo(model) {
                        tracing::error!("Restoring \"{}\" failed: {}", child.text(), e);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn rollback(&mut self, model: &mut M) {
        tracing::warn!(
            "\"{}\" failed, rolling back {} executed command(s)",
            self.text,
            self.children.len()
        );
        while let Some(mut child) = self.children.pop() {
            if let Err(e) = child.undo(model) {
                tracing::error!("Rollback of \"{}\" failed: {}", child.text(), e);
            }
        }
    }
}

impl<M> UndoCommand<M> for UndoCommandGroup<M> {
    fn text(&self) -> &str {
        &self.text
    }

    fn perform_execute(&mut self, model: &mut M) -> EditResult<bool> {
        let pending = std::mem::take(&mut self.pending);
        self.execute_atomically(model, |group, model| {
            for command in pending {
                group.exec_boxed_child(model, command)?;
            }
            Ok(())
        })
    }

    fn perform_undo(&mut self, model: &mut M) -> EditResult<()> {
        self.undo_children(model)
    }

    fn perform_redo(&mut self, model: &mut M) -> EditResult<()> {
        self.redo_children(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EditError;
    use crate::undo::CommandState;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Adds `delta` to the model and records every call.
    struct Step {
        name: String,
        delta: i32,
        fail: bool,
        fail_undo: bool,
        fail_redo: bool,
        log: Log,
    }

    impl Step {
        fn new(name: &str, delta: i32, log: &Log) -> Self {
            Self {
                name: name.to_string(),
                delta,
                fail: false,
                fail_undo: false,
                fail_redo: false,
                log: Rc::clone(log),
            }
        }

        fn failing(name: &str, log: &Log) -> Self {
            Self {
                fail: true,
                ..Self::new(name, 1000, log)
            }
        }

        fn failing_undo(name: &str, delta: i32, log: &Log) -> Self {
            Self {
                fail_undo: true,
                ..Self::new(name, delta, log)
            }
        }

        fn failing_redo(name: &str, delta: i32, log: &Log) -> Self {
            Self {
                fail_redo: true,
                ..Self::new(name, delta, log)
            }
        }
    }

    impl UndoCommand<i32> for Step {
        fn text(&self) -> &str {
            &self.name
        }

        fn perform_execute(&mut self, model: &mut i32) -> EditResult<bool> {
            self.log.borrow_mut().push(format!("exec {}", self.name));
            if self.fail {
                return Err(EditError::logic(format!("{} failed", self.name)));
            }
            *model += self.delta;
            Ok(true)
        }

        fn perform_undo(&mut self, model: &mut i32) -> EditResult<()> {
            self.log.borrow_mut().push(format!("undo {}", self.name));
            if self.fail_undo {
                return Err(EditError::logic(format!("{} cannot be undone", self.name)));
            }
            *model -= self.delta;
            Ok(())
        }

        fn perform_redo(&mut self, model: &mut i32) -> EditResult<()> {
            self.log.borrow_mut().push(format!("redo {}", self.name));
            if self.fail_redo {
                return Err(EditError::logic(format!("{} cannot be redone", self.name)));
            }
            *model += self.delta;
            Ok(())
        }
    }

    #[test]
    fn test_group_executes_in_order_and_undoes_in_reverse() {
        let log = Log::default();
        let mut group = UndoCommandGroup::new("group");
        group.append_child(Step::new("a", 1, &log));
        group.append_child(Step::new("b", 10, &log));

        let mut handle = CommandHandle::new(group);
        let mut model = 0;
        assert!(handle.execute(&mut model).unwrap());
        assert_eq!(model, 11);
        handle.undo(&mut model).unwrap();
        assert_eq!(model, 0);
        handle.redo(&mut model).unwrap();
        assert_eq!(model, 11);
        assert_eq!(handle.state(), CommandState::Redone);

        assert_eq!(
            *log.borrow(),
            vec!["exec a", "exec b", "undo b", "undo a", "redo a", "redo b"]
        );
    }

    #[test]
    fn test_rollback_on_kth_failure() {
        for k in 1..=4 {
            let log = Log::default();
            let mut group = UndoCommandGroup::new("group");
            for i in 1..=4 {
                if i == k {
                    group.append_child(Step::failing(&i.to_string(), &log));
                } else {
                    group.append_child(Step::new(&i.to_string(), i, &log));
                }
            }

            let mut handle = CommandHandle::new(group);
            let mut model = 100;
            assert!(handle.execute(&mut model).is_err());
            assert_eq!(model, 100, "model must be untouched after failure {}", k);
            assert_eq!(handle.state(), CommandState::Failed);

            let log = log.borrow();
            for i in 1..k {
                let name = i.to_string();
                assert_eq!(log.iter().filter(|l| **l == format!("exec {}", name)).count(), 1);
                assert_eq!(log.iter().filter(|l| **l == format!("undo {}", name)).count(), 1);
            }
            for i in k + 1..=4 {
                assert!(!log.iter().any(|l| l.ends_with(&format!(" {}", i))));
            }
        }
    }

    #[test]
    fn test_execute_atomically_rolls_back() {
        let log = Log::default();
        let mut group: UndoCommandGroup<i32> = UndoCommandGroup::new("build");
        let mut model = 0;
        let result = group.execute_atomically(&mut model, |g, m| {
            g.exec_new_child_cmd(m, Step::new("a", 5, &log))?;
            g.exec_new_child_cmd(m, Step::failing("b", &log))?;
            g.exec_new_child_cmd(m, Step::new("c", 7, &log))?;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(model, 0);
        assert_eq!(group.child_count(), 0);
        assert_eq!(*log.borrow(), vec!["exec a", "exec b", "undo a"]);
    }

    #[test]
    fn test_empty_group_has_no_effect() {
        let mut handle = CommandHandle::new(UndoCommandGroup::<i32>::new("empty"));
        let mut model = 0;
        assert!(!handle.execute(&mut model).unwrap());
    }

    #[test]
    fn test_out_of_sequence_calls_are_rejected() {
        let log = Log::default();
        let mut handle = CommandHandle::new(Step::new("a", 1, &log));
        let mut model = 0;

        assert!(matches!(
            handle.undo(&mut model),
            Err(EditError::InvalidState { state: CommandState::Created, .. })
        ));
        assert!(handle.redo(&mut model).is_err());
        handle.execute(&mut model).unwrap();
        assert!(handle.execute(&mut model).is_err());
        assert!(handle.redo(&mut model).is_err());
        assert_eq!(model, 1);
    }

    #[test]
    fn test_failed_command_cannot_be_undone() {
        let log = Log::default();
        let mut handle = CommandHandle::new(Step::failing("x", &log));
        let mut model = 0;
        assert!(handle.execute(&mut model).is_err());
        assert!(handle.undo(&mut model).is_err());
        assert_eq!(*log.borrow(), vec!["exec x"]);
    }

    #[test]
    fn test_failed_undo_restores_executed_state() {
        let log = Log::default();
        let mut group = UndoCommandGroup::new("group");
        group.append_child(Step::new("a", 1, &log));
        group.append_child(Step::failing_undo("b", 10, &log));
        group.append_child(Step::new("c", 100, &log));

        let mut handle = CommandHandle::new(group);
        let mut model = 0;
        handle.execute(&mut model).unwrap();
        assert_eq!(model, 111);

        assert!(matches!(handle.undo(&mut model), Err(EditError::Logic(_))));
        assert_eq!(model, 111);
        assert_eq!(handle.state(), CommandState::Executed);
        assert_eq!(
            *log.borrow(),
            vec!["exec a", "exec b", "exec c", "undo c", "undo b", "redo c"]
        );
    }

    #[test]
    fn test_failed_redo_restores_undone_state() {
        let log = Log::default();
        let mut group = UndoCommandGroup::new("group");
        group.append_child(Step::new("a", 1, &log));
        group.append_child(Step::failing_redo("b", 10, &log));
        group.append_child(Step::new("c", 100, &log));

        let mut handle = CommandHandle::new(group);
        let mut model = 0;
        handle.execute(&mut model).unwrap();
        handle.undo(&mut model).unwrap();
        assert_eq!(model, 0);

        assert!(handle.redo(&mut model).is_err());
        assert_eq!(model, 0);
        assert_eq!(handle.state(), CommandState::Undone);
        let log = log.borrow();
        assert_eq!(log[6..].to_vec(), vec!["redo a", "redo b", "undo a"]);
    }

    #[test]
    fn test_rollback_continues_past_failed_undo() {
        let log = Log::default();
        let mut group: UndoCommandGroup<i32> = UndoCommandGroup::new("build");
        let mut model = 0;
        let result = group.execute_atomically(&mut model, |g, m| {
            g.exec_new_child_cmd(m, Step::new("a", 5, &log))?;
            g.exec_new_child_cmd(m, Step::failing_undo("b", 20, &log))?;
            g.exec_new_child_cmd(m, Step::failing("c", &log))?;
            Ok(())
        });

        assert!(matches!(result, Err(EditError::Logic(msg)) if msg == "c failed"));
        // b stays applied, a is still undone
        assert_eq!(model, 20);
        assert_eq!(group.child_count(), 0);
        assert_eq!(
            *log.borrow(),
            vec!["exec a", "exec b", "exec c", "undo b", "undo a"]
        );
    }
}
