//! `TerminalSession` (§4.4): the platform-independent record a
//! `TerminalBackend` operates on.

use std::path::PathBuf;
use std::time::SystemTime;

use viloxterm_common::SessionId;

use crate::pty::PtyHandle;

pub struct TerminalSession {
    pub session_id: SessionId,
    pub command: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub rows: u16,
    pub cols: u16,
    pub created_at: SystemTime,
    pub last_activity: SystemTime,
    pub active: bool,
    /// Opaque per-platform handle; `None` until `start_process` succeeds.
    pub(crate) platform_data: Option<PtyHandle>,
}

impl TerminalSession {
    pub fn new(command: impl Into<String>, args: Vec<String>, rows: u16, cols: u16) -> Self {
        let now = SystemTime::now();
        TerminalSession {
            session_id: SessionId::new(),
            command: command.into(),
            args,
            cwd: None,
            rows,
            cols,
            created_at: now,
            last_activity: now,
            active: false,
            platform_data: None,
        }
    }

    pub fn with_cwd(mut self, cwd: PathBuf) -> Self {
        self.cwd = Some(cwd);
        self
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = SystemTime::now();
    }
}
