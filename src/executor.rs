//! Executor: runs a popped frame as a process
//!
//! The root frame runs in the foreground with the caller's terminal. A
//! nested frame runs with its stdout piped back; every byte is routed into
//! the parent frame, which turns each delimited record into one argument.

use crate::frame::Frame;
use crate::quote;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

/// Exit status reported for a program that could not be executed
pub const EXEC_FAILURE_STATUS: i32 = 1;

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("cannot run an empty command")]
    EmptyCommand,
    #[error("failed to spawn {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("failed to read output of {program}: {source}")]
    Pipe { program: String, source: io::Error },
    #[error("failed to wait for {program}: {source}")]
    Wait { program: String, source: io::Error },
    #[error("failed to write standard output: {0}")]
    Stdout(#[source] io::Error),
}

/// Process launching as seen by the executor.
///
/// Both operations block until the child has exited and return its exit
/// status.
pub trait Spawner {
    /// Run `argv` with inherited stdin, stdout and stderr.
    fn run_foreground(&mut self, argv: &[&OsStr]) -> Result<i32, ExecuteError>;

    /// Run `argv` with stdout piped into `sink` until end-of-stream.
    fn run_captured(&mut self, argv: &[&OsStr], sink: &mut dyn Write) -> Result<i32, ExecuteError>;
}

/// Spawns real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessSpawner;

impl Spawner for ProcessSpawner {
    fn run_foreground(&mut self, argv: &[&OsStr]) -> Result<i32, ExecuteError> {
        let (program, args) = argv.split_first().ok_or(ExecuteError::EmptyCommand)?;

        let status = match Command::new(program).args(args).status() {
            Ok(status) => status,
            Err(e) if is_exec_failure(&e) => return Ok(report_exec_failure(program, &e)),
            Err(e) => return Err(spawn_error(program, e)),
        };

        Ok(exit_code(status))
    }

    fn run_captured(&mut self, argv: &[&OsStr], sink: &mut dyn Write) -> Result<i32, ExecuteError> {
        let (program, args) = argv.split_first().ok_or(ExecuteError::EmptyCommand)?;

        let mut child = match Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if is_exec_failure(&e) => return Ok(report_exec_failure(program, &e)),
            Err(e) => return Err(spawn_error(program, e)),
        };
        tracing::debug!(pid = child.id(), program = ?program, "spawned captured child");

        // Drain to end-of-stream, then close our end before waiting.
        let copied = match child.stdout.take() {
            Some(mut stdout) => io::copy(&mut stdout, sink).map(|_| ()),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "child stdout was not captured",
            )),
        };

        let status = child.wait().map_err(|source| ExecuteError::Wait {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;
        copied.map_err(|source| ExecuteError::Pipe {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;

        Ok(exit_code(status))
    }
}

/// Errors that mean the program itself could not be executed, as opposed
/// to the system failing to create a process.
///
/// Any errno reported by exec (ENOENT, EACCES, ENOTDIR, ENOEXEC, ELOOP,
/// E2BIG, ...) stays confined to that one child. Fork resource exhaustion
/// is fatal.
fn is_exec_failure(e: &io::Error) -> bool {
    e.raw_os_error().is_some()
        && !matches!(
            e.kind(),
            io::ErrorKind::WouldBlock | io::ErrorKind::OutOfMemory
        )
}

fn report_exec_failure(program: &OsStr, e: &io::Error) -> i32 {
    eprintln!("{}: {}", program.to_string_lossy(), e);
    EXEC_FAILURE_STATUS
}

fn spawn_error(program: &OsStr, source: io::Error) -> ExecuteError {
    ExecuteError::Spawn {
        program: program.to_string_lossy().into_owned(),
        source,
    }
}

/// Exit code of a finished child; death by signal maps to 128 + signal.
pub fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match status.code() {
        Some(code) => code,
        None => match status.signal() {
            Some(signal) => 128 + signal,
            None => 255,
        },
    }
}

/// Splits a byte stream into records and appends them to a frame.
///
/// Every delimiter byte flushes the frame's pending word; any other byte is
/// appended to it. Call [`RecordSplitter::finish`] at end-of-stream to keep
/// a final record that had no trailing delimiter.
pub struct RecordSplitter<'f, 'a> {
    target: &'f mut Frame<'a>,
    delimiter: u8,
}

impl<'f, 'a> RecordSplitter<'f, 'a> {
    pub fn new(target: &'f mut Frame<'a>, delimiter: u8) -> Self {
        RecordSplitter { target, delimiter }
    }

    pub fn finish(self) {
        self.target.flush();
    }
}

impl Write for RecordSplitter<'_, '_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if byte == self.delimiter {
                self.target.flush();
            } else {
                self.target.push_byte(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs popped frames through a [`Spawner`]
#[derive(Debug, Default)]
pub struct Executor<S = ProcessSpawner> {
    spawner: S,
}

impl<S: Spawner> Executor<S> {
    pub fn new(spawner: S) -> Self {
        Executor { spawner }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    pub fn into_spawner(self) -> S {
        self.spawner
    }

    /// Execute `frame`, consuming it.
    ///
    /// Returns the exit status when the frame was the root and actually
    /// ran; nested frames and skipped empty frames return `None`. Output of
    /// a nested frame lands in `parent` as new arguments.
    pub fn run<'a>(
        &mut self,
        frame: Frame<'a>,
        parent: Option<&mut Frame<'a>>,
    ) -> Result<Option<i32>, ExecuteError> {
        if frame.is_empty() {
            tracing::debug!("empty frame skipped");
            return Ok(None);
        }

        if frame.quote_mode() {
            let is_root = parent.is_none();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            quote::quote(frame, parent, &mut out).map_err(ExecuteError::Stdout)?;
            return Ok(is_root.then_some(0));
        }

        io::stdout().flush().map_err(ExecuteError::Stdout)?;

        let argv = frame.argv();
        match parent {
            None => {
                tracing::debug!(argv = ?argv, "running root command");
                let status = self.spawner.run_foreground(&argv)?;
                tracing::debug!(status, "root command exited");
                Ok(Some(status))
            }
            Some(parent) => {
                tracing::debug!(argv = ?argv, delimiter = frame.delimiter(), "running nested command");
                let mut splitter = RecordSplitter::new(parent, frame.delimiter());
                let status = self.spawner.run_captured(&argv, &mut splitter)?;
                splitter.finish();
                tracing::debug!(status, "nested command exited");
                Ok(None)
            }
        }
    }
}
