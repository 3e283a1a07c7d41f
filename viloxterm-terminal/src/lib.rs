//! PTY-backed terminal sessions.

mod backend;
mod event;
mod pty;
mod registry;
mod session;

pub use backend::{Feature, PtyBackend, TerminalBackend};
pub use event::PtyEvent;
pub use pty::PtyHandle;
pub use registry::SessionRegistry;
pub use session::TerminalSession;
