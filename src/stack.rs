//! Frame stack: nested invocations as an explicit LIFO
//!
//! The root frame sits at the bottom; the parent of any frame is the one
//! directly beneath it. Frames only leave the stack through
//! [`FrameStack::pop_and_run`], which always executes a frame before
//! dropping it.

use crate::executor::{ExecuteError, Executor, Spawner};
use crate::frame::Frame;

#[derive(Debug, Clone)]
pub struct FrameStack<'a> {
    frames: Vec<Frame<'a>>,
}

impl Default for FrameStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FrameStack<'a> {
    /// Create a stack holding only the root frame
    pub fn new() -> Self {
        FrameStack {
            frames: vec![Frame::root()],
        }
    }

    /// Enter a nested invocation; the new frame inherits the delimiter of
    /// the current top.
    pub fn push(&mut self) -> &mut Frame<'a> {
        let frame = match self.frames.last() {
            Some(parent) => Frame::nested_in(parent),
            None => Frame::root(),
        };
        self.frames.push(frame);
        tracing::trace!(depth = self.frames.len(), "frame pushed");
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// The frame currently receiving tokens
    pub fn current(&self) -> Option<&Frame<'a>> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut Frame<'a>> {
        self.frames.last_mut()
    }

    /// Whether the current frame is nested inside another
    pub fn has_parent(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pop the current frame and execute it against its parent.
    ///
    /// If the popped frame is marked for auto double-pop, the new current
    /// frame is popped and executed as well. Returns the root's exit status
    /// if the root ran.
    pub fn pop_and_run<S: Spawner>(
        &mut self,
        executor: &mut Executor<S>,
    ) -> Result<Option<i32>, ExecuteError> {
        let mut root_status = None;
        loop {
            let Some(mut child) = self.frames.pop() else {
                break;
            };
            let repeat = child.auto_pop_twice();
            child.flush();
            tracing::trace!(depth = self.frames.len() + 1, repeat, "frame popped");

            if let Some(status) = executor.run(child, self.frames.last_mut())? {
                root_status = Some(status);
            }

            if !repeat {
                break;
            }
        }
        Ok(root_status)
    }

    /// Drop every frame above the root without running it
    pub fn discard_nested(&mut self) -> usize {
        let dropped = self.frames.len().saturating_sub(1);
        self.frames.truncate(1);
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fake::ScriptedSpawner;
    use crate::frame::NUL;
    use std::ffi::OsString;

    #[test]
    fn starts_with_root_only() {
        let stack = FrameStack::new();
        assert_eq!(stack.depth(), 1);
        assert!(!stack.has_parent());
    }

    #[test]
    fn push_inherits_delimiter_from_top() {
        let mut stack = FrameStack::new();
        stack.current_mut().unwrap().set_delimiter(NUL);
        let child = stack.push();
        assert_eq!(child.delimiter(), NUL);
        assert!(child.flag_mode());
        assert!(stack.has_parent());
    }

    #[test]
    fn pop_runs_nested_frame_into_parent() {
        let root_cmd = OsString::from("echo");
        let child_cmd = OsString::from("list");
        let mut stack = FrameStack::new();
        stack.current_mut().unwrap().append_argument(&root_cmd, false);
        stack.push().append_argument(&child_cmd, false);

        let mut exec = Executor::new(ScriptedSpawner::default().with_output("list", b"a\nb"));
        let status = stack.pop_and_run(&mut exec).unwrap();

        assert_eq!(status, None);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current().unwrap().argv(), vec!["echo", "a", "b"]);
    }

    #[test]
    fn auto_pop_twice_runs_parent_too() {
        let shell = OsString::from("/bin/sh");
        let flag = OsString::from("-c");
        let words: Vec<OsString> = ["echo", "hi"].iter().map(OsString::from).collect();

        let mut stack = FrameStack::new();
        let root = stack.current_mut().unwrap();
        root.append_argument(&shell, true);
        root.append_argument(&flag, false);
        let quoted = stack.push();
        quoted.set_quote_mode(true);
        quoted.set_auto_pop_twice(true);
        for w in &words {
            quoted.append_argument(w, false);
        }

        let mut exec = Executor::new(ScriptedSpawner::default());
        let status = stack.pop_and_run(&mut exec).unwrap();

        assert_eq!(status, Some(0));
        assert!(stack.is_empty());
        assert_eq!(
            exec.spawner().foreground,
            vec![vec![
                OsString::from("/bin/sh"),
                OsString::from("-c"),
                OsString::from("echo hi"),
            ]]
        );
    }

    #[test]
    fn discard_nested_keeps_root() {
        let mut stack = FrameStack::new();
        stack.push();
        stack.push();
        assert_eq!(stack.discard_nested(), 2);
        assert_eq!(stack.depth(), 1);
    }
}
