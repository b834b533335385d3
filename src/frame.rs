//! Frame: one nested invocation under construction
//!
//! A frame collects the argument vector of one command. Literal tokens are
//! stored borrowed from the command line; everything produced at runtime
//! (streamed records, quote-joined strings, the shell path) is owned.

use crate::word::WordBuffer;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};

/// Default record delimiter
pub const NEWLINE: u8 = b'\n';

/// NUL record delimiter, selected with `-0`
pub const NUL: u8 = b'\0';

/// One argument of a frame, either borrowed from the command line or owned.
pub type Arg<'a> = Cow<'a, OsStr>;

#[derive(Debug, Clone)]
pub struct Frame<'a> {
    arguments: Vec<Arg<'a>>,
    pending: WordBuffer,
    flag_mode: bool,
    quote_mode: bool,
    auto_pop_twice: bool,
    delimiter: u8,
}

impl<'a> Frame<'a> {
    /// Create a frame splitting child output on `delimiter`
    pub fn new(delimiter: u8) -> Self {
        Frame {
            arguments: Vec::new(),
            pending: WordBuffer::new(),
            flag_mode: true,
            quote_mode: false,
            auto_pop_twice: false,
            delimiter,
        }
    }

    /// Create the root frame
    pub fn root() -> Self {
        Self::new(NEWLINE)
    }

    /// Create a frame nested under `parent`, inheriting its delimiter
    pub fn nested_in(parent: &Frame<'_>) -> Self {
        Self::new(parent.delimiter)
    }

    /// Append a command-line token.
    ///
    /// With `force_copy` the frame keeps a private copy; otherwise the token
    /// is borrowed for the frame's lifetime.
    pub fn append_argument(&mut self, text: &'a OsStr, force_copy: bool) {
        if force_copy {
            self.arguments.push(Cow::Owned(text.to_os_string()));
        } else {
            self.arguments.push(Cow::Borrowed(text));
        }
    }

    /// Append an argument the frame already owns
    pub fn append_owned(&mut self, text: OsString) {
        self.arguments.push(Cow::Owned(text));
    }

    /// Append one streamed byte to the pending word
    pub fn push_byte(&mut self, byte: u8) {
        self.pending.push(byte);
    }

    /// Move the pending word into the argument list.
    ///
    /// An empty pending word is dropped.
    pub fn flush(&mut self) {
        if let Some(word) = self.pending.take() {
            tracing::trace!(word = ?word, "record flushed");
            self.arguments.push(Cow::Owned(word));
        }
    }

    pub fn arguments(&self) -> &[Arg<'a>] {
        &self.arguments
    }

    /// Borrowed view of the argument vector, in execution order
    pub fn argv(&self) -> Vec<&OsStr> {
        self.arguments.iter().map(|a| a.as_ref()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub(crate) fn pending_mut(&mut self) -> &mut WordBuffer {
        &mut self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn flag_mode(&self) -> bool {
        self.flag_mode
    }

    /// Stop interpreting leading `-x` tokens as options. Permanent.
    pub fn end_flags(&mut self) {
        self.flag_mode = false;
    }

    pub fn quote_mode(&self) -> bool {
        self.quote_mode
    }

    pub fn set_quote_mode(&mut self, on: bool) {
        self.quote_mode = on;
    }

    pub fn auto_pop_twice(&self) -> bool {
        self.auto_pop_twice
    }

    pub fn set_auto_pop_twice(&mut self, on: bool) {
        self.auto_pop_twice = on;
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn set_delimiter(&mut self, delimiter: u8) {
        self.delimiter = delimiter;
    }
}

impl Default for Frame<'_> {
    fn default() -> Self {
        Self::root()
    }
}
