//! crow - inline command expansion without a shell
//!
//! # Overview
//!
//! crow runs a command whose arguments may contain other commands. Any
//! command between `-[` and `]-` is executed first, and each line of its
//! standard output becomes one argument of the enclosing command.
//! Expansions nest, and no shell is involved.
//!
//! ```text
//! # Play all ogg files
//! crow vlc -[ locate .ogg ]-
//!
//! # Same, with NUL-separated output so names may contain newlines
//! crow vlc -[ -0 locate -0 .ogg ]-
//!
//! # Collapse an expansion into a single argument
//! crow grep -[ -q echo two words ]- file.txt
//!
//! # Run the rest of the line through $SHELL -c
//! crow -c ls '*.rs'
//! ```
//!
//! # Options
//!
//! Options apply to the frame they appear in and are only recognised
//! before the first literal argument of that frame:
//!
//! - `-c` run the rest of the frame as a `$SHELL -c` command string
//! - `-q` join the frame's arguments into one argument instead of running it
//! - `-n` split output on newlines (default)
//! - `-0` split output on NUL bytes
//! - `--` stop option processing
//!
//! # Example
//!
//! ```rust,no_run
//! use crow::{Config, Dispatcher, ProcessSpawner};
//! use std::ffi::OsString;
//!
//! let tokens: Vec<OsString> = ["echo", "-[", "ls", "]-"].iter().map(OsString::from).collect();
//! let mut dispatcher = Dispatcher::new(&Config::from_env(), ProcessSpawner);
//! dispatcher.feed_all(tokens.iter().map(OsString::as_os_str)).unwrap();
//! let status = dispatcher.finish().unwrap();
//! ```

pub mod config;
pub mod dispatch;
pub mod executor;
pub mod frame;
pub mod quote;
pub mod stack;
pub mod word;

// Re-export commonly used items
pub use config::Config;
pub use dispatch::{run_tokens, DispatchError, Dispatcher, CLOSE_MARKER, OPEN_MARKER};
pub use executor::{ExecuteError, Executor, ProcessSpawner, RecordSplitter, Spawner};
pub use frame::{Arg, Frame};
pub use stack::FrameStack;
pub use word::WordBuffer;
