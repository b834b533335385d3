//! Quote mode: collapse a frame's arguments into one argument
//!
//! Arguments are joined with single spaces. Embedded spaces, quotes and
//! other shell metacharacters are passed through unescaped.

use crate::frame::Frame;
use std::ffi::OsString;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;

/// Join the frame's arguments with single spaces.
///
/// The frame's own pending buffer is reused as the assembly buffer.
pub fn join_arguments(frame: &mut Frame<'_>) -> OsString {
    frame.flush();
    let mut joined = std::mem::take(frame.pending_mut());
    for (i, arg) in frame.arguments().iter().enumerate() {
        if i > 0 {
            joined.push(b' ');
        }
        joined.extend_from_slice(arg.as_bytes());
    }
    joined.take_all()
}

/// Collapse `frame` into a single argument of `parent`.
///
/// Without a parent the joined line is written to `out` instead, with no
/// trailing newline.
pub fn quote<'a>(
    mut frame: Frame<'a>,
    parent: Option<&mut Frame<'a>>,
    out: &mut dyn Write,
) -> io::Result<()> {
    let joined = join_arguments(&mut frame);
    match parent {
        Some(parent) => {
            tracing::debug!(joined = ?joined, "quoted frame collapsed into parent");
            parent.append_owned(joined);
        }
        None => {
            out.write_all(joined.as_bytes())?;
            out.flush()?;
        }
    }
    Ok(())
}
