//! Events the PTY reader thread sends to whoever drains a session's
//! output (§4.4: `read_output`/`poll_process` consume these).

use std::io;

#[derive(Debug)]
pub enum PtyEvent {
    /// New bytes from the child's stdout/stderr.
    Output(Vec<u8>),
    /// The reader hit EOF: the child closed the PTY.
    Exited,
    /// The reader encountered an I/O error and gave up.
    Error(io::Error),
}
