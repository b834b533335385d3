//! Token dispatcher: classifies command-line tokens and drives the stack
//!
//! Tokens are handled one at a time:
//! - `-[` opens a nested invocation
//! - `]-` closes the current nested invocation and runs it
//! - leading `-c`, `-q`, `-0`, `-n`, `--` configure the current frame
//! - anything else is a literal argument of the current frame

use crate::config::Config;
use crate::executor::{ExecuteError, Executor, ProcessSpawner, Spawner};
use crate::frame::{NEWLINE, NUL};
use crate::stack::FrameStack;
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use thiserror::Error;

/// Opens a nested invocation
pub const OPEN_MARKER: &str = "-[";

/// Closes a nested invocation
pub const CLOSE_MARKER: &str = "]-";

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Expected ]- ({depth} unclosed -[)")]
    Unmatched { depth: usize },
    #[error("unexpected argument after the command already ran: {0}")]
    RootClosed(String),
    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

/// Drives a [`FrameStack`] from a sequence of command-line tokens
pub struct Dispatcher<'a, S = ProcessSpawner> {
    stack: FrameStack<'a>,
    executor: Executor<S>,
    shell: Option<OsString>,
    root_status: Option<i32>,
}

impl<'a, S: Spawner> Dispatcher<'a, S> {
    pub fn new(config: &Config, spawner: S) -> Self {
        Dispatcher {
            stack: FrameStack::new(),
            executor: Executor::new(spawner),
            shell: config.shell.clone(),
            root_status: None,
        }
    }

    pub fn stack(&self) -> &FrameStack<'a> {
        &self.stack
    }

    pub fn spawner(&self) -> &S {
        self.executor.spawner()
    }

    pub fn into_spawner(self) -> S {
        self.executor.into_spawner()
    }

    /// Exit status of the root command, once it has run
    pub fn root_status(&self) -> Option<i32> {
        self.root_status
    }

    /// Classify one token and apply it to the current frame
    pub fn feed(&mut self, token: &'a OsStr) -> Result<(), DispatchError> {
        let has_parent = self.stack.has_parent();
        let Some(frame) = self.stack.current_mut() else {
            return Err(DispatchError::RootClosed(
                token.to_string_lossy().into_owned(),
            ));
        };

        let bytes = token.as_bytes();
        if frame.flag_mode() && is_flag(bytes) {
            self.apply_flag(bytes);
            return Ok(());
        }

        frame.end_flags();
        if token == OPEN_MARKER {
            self.stack.push();
        } else if token == CLOSE_MARKER && has_parent {
            self.pop()?;
        } else {
            frame.append_argument(token, false);
        }
        Ok(())
    }

    /// Feed every token in order
    pub fn feed_all<I>(&mut self, tokens: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = &'a OsStr>,
    {
        for token in tokens {
            self.feed(token)?;
        }
        Ok(())
    }

    /// End of input: close the current frame and report the exit status.
    ///
    /// A frame left open is an error. The root still runs with whatever
    /// arguments it had collected before the error is returned.
    pub fn finish(&mut self) -> Result<i32, DispatchError> {
        self.pop()?;

        if !self.stack.is_empty() {
            let depth = self.stack.discard_nested() + 1;
            tracing::debug!(depth, "unclosed nesting at end of input");
            self.pop()?;
            return Err(DispatchError::Unmatched { depth });
        }

        Ok(self.root_status.unwrap_or(0))
    }

    fn pop(&mut self) -> Result<(), DispatchError> {
        if let Some(status) = self.stack.pop_and_run(&mut self.executor)? {
            self.root_status = Some(status);
        }
        Ok(())
    }

    fn apply_flag(&mut self, bytes: &[u8]) {
        let Some(frame) = self.stack.current_mut() else {
            return;
        };
        if bytes.len() != 2 {
            tracing::trace!(flag = %String::from_utf8_lossy(bytes), "unknown option ignored");
            return;
        }

        match bytes[1] {
            b'-' => frame.end_flags(),
            b'q' => frame.set_quote_mode(true),
            b'0' => frame.set_delimiter(NUL),
            b'n' => frame.set_delimiter(NEWLINE),
            b'c' => self.shell_command(),
            other => {
                tracing::trace!(flag = %char::from(other), "unknown option ignored");
            }
        }
    }

    /// `-c`: run the rest of the current frame as one shell command string
    fn shell_command(&mut self) {
        let Some(frame) = self.stack.current_mut() else {
            return;
        };
        if frame.quote_mode() {
            return;
        }
        let Some(shell) = &self.shell else {
            tracing::debug!("SHELL is not set; -c ignored");
            return;
        };

        frame.append_owned(shell.clone());
        frame.append_argument(OsStr::new("-c"), false);

        let quoted = self.stack.push();
        quoted.set_quote_mode(true);
        quoted.set_auto_pop_twice(true);
    }
}

/// A leading `-` token, other than one starting with the open marker
fn is_flag(bytes: &[u8]) -> bool {
    bytes.first() == Some(&b'-') && bytes.get(1) != Some(&b'[')
}

/// Expand and run `tokens` with real processes, returning the root's exit
/// status.
pub fn run_tokens(tokens: &[OsString], config: &Config) -> Result<i32, DispatchError> {
    let mut dispatcher = Dispatcher::new(config, ProcessSpawner);
    dispatcher.feed_all(tokens.iter().map(OsString::as_os_str))?;
    dispatcher.finish()
}
