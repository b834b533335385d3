//! Word buffer: assembles one argument at a time from a byte stream

use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;

/// Growable byte accumulator for a partially streamed argument.
///
/// Bytes are appended one at a time as a child's output arrives. A
/// completed word is taken out with [`WordBuffer::take`], which resets the
/// buffer for the next record.
#[derive(Debug, Default, Clone)]
pub struct WordBuffer {
    bytes: Vec<u8>,
}

impl WordBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one byte
    pub fn push(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Append a run of bytes
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Take the accumulated word, leaving the buffer empty.
    ///
    /// Returns `None` for an empty buffer: empty records between two
    /// delimiters never become arguments.
    pub fn take(&mut self) -> Option<OsString> {
        if self.bytes.is_empty() {
            return None;
        }
        Some(OsString::from_vec(std::mem::take(&mut self.bytes)))
    }

    /// Take the accumulated bytes as a word even when empty
    pub fn take_all(&mut self) -> OsString {
        OsString::from_vec(std::mem::take(&mut self.bytes))
    }
}
