//! `TerminalBackend` (§4.4): the operation surface a terminal widget drives
//! a session through. Failure semantics throughout: start failures return
//! `false` with a `log::error!` diagnostic; read/write failures mark the
//! session inactive and report `false`; nothing panics or propagates a
//! raw I/O error past this boundary.

use std::time::Duration;

use crate::pty::PtyHandle;
use crate::session::TerminalSession;

/// Feature query answered by `TerminalBackend::supports`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Resize,
    Colors,
    Unicode,
    Input,
    Output,
}

pub trait TerminalBackend {
    fn start_process(&self, session: &mut TerminalSession) -> bool;

    /// Returns whatever output has accumulated since the last call, up to
    /// `max_bytes`. Empty on no new output; never blocks.
    fn read_output(&self, session: &mut TerminalSession, max_bytes: usize) -> Vec<u8>;

    fn write_input(&self, session: &mut TerminalSession, data: &[u8]) -> bool;

    fn resize(&self, session: &mut TerminalSession, rows: u16, cols: u16) -> bool;

    fn is_process_alive(&self, session: &TerminalSession) -> bool;

    fn terminate_process(&self, session: &mut TerminalSession) -> bool;

    /// Releases the session's platform resources. Idempotent.
    fn cleanup(&self, session: &mut TerminalSession);

    /// Blocks up to `timeout` waiting for new output or exit; returns
    /// whether something became available.
    fn poll_process(&self, session: &TerminalSession, timeout: Duration) -> bool;

    fn supports(&self, feature: Feature) -> bool;
}

/// `TerminalBackend` implementation backed by `portable-pty` via
/// `PtyHandle`.
#[derive(Debug, Default)]
pub struct PtyBackend;

impl TerminalBackend for PtyBackend {
    fn start_process(&self, session: &mut TerminalSession) -> bool {
        let cwd = session
            .cwd
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

        match PtyHandle::spawn(&session.command, &session.args, &cwd, session.rows, session.cols) {
            Ok(handle) => {
                session.platform_data = Some(handle);
                session.active = true;
                true
            }
            Err(e) => {
                log::error!("failed to start terminal process {:?}: {e}", session.command);
                session.active = false;
                false
            }
        }
    }

    fn read_output(&self, session: &mut TerminalSession, max_bytes: usize) -> Vec<u8> {
        let Some(handle) = session.platform_data.as_ref() else {
            return Vec::new();
        };
        let (bytes, exited, error) = handle.try_read(max_bytes);
        if exited {
            session.active = false;
        }
        if let Some(e) = error {
            log::warn!("terminal read error on session {}: {e}", session.session_id);
            session.active = false;
        }
        if !bytes.is_empty() {
            session.touch();
        }
        bytes
    }

    fn write_input(&self, session: &mut TerminalSession, data: &[u8]) -> bool {
        let Some(handle) = session.platform_data.as_mut() else {
            return false;
        };
        match handle.write(data) {
            Ok(()) => {
                session.touch();
                true
            }
            Err(e) => {
                log::warn!("terminal write error on session {}: {e}", session.session_id);
                session.active = false;
                false
            }
        }
    }

    fn resize(&self, session: &mut TerminalSession, rows: u16, cols: u16) -> bool {
        session.rows = rows;
        session.cols = cols;
        let Some(handle) = session.platform_data.as_ref() else {
            return false;
        };
        match handle.resize(rows, cols) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("terminal resize error on session {}: {e}", session.session_id);
                false
            }
        }
    }

    fn is_process_alive(&self, session: &TerminalSession) -> bool {
        if !session.active {
            return false;
        }
        session.platform_data.is_some()
    }

    fn terminate_process(&self, session: &mut TerminalSession) -> bool {
        let Some(handle) = session.platform_data.as_mut() else {
            return false;
        };
        if handle.try_wait().is_some() {
            session.active = false;
            return true;
        }
        // `portable-pty` exposes only a single force-kill primitive, not a
        // distinct graceful-then-force pair; approximate the spec's "wait
        // briefly, force-kill if necessary" by giving the child a short
        // grace window to exit on its own before killing it.
        for _ in 0..5 {
            if handle.try_wait().is_some() {
                session.active = false;
                return true;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        let killed = handle.kill().is_ok();
        session.active = false;
        killed
    }

    fn cleanup(&self, session: &mut TerminalSession) {
        session.platform_data = None;
        session.active = false;
    }

    fn poll_process(&self, session: &TerminalSession, timeout: Duration) -> bool {
        match session.platform_data.as_ref() {
            Some(handle) => handle.poll(timeout),
            None => false,
        }
    }

    fn supports(&self, feature: Feature) -> bool {
        matches!(
            feature,
            Feature::Resize | Feature::Colors | Feature::Unicode | Feature::Input | Feature::Output
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_session() -> TerminalSession {
        TerminalSession::new("/bin/sh", vec!["-c".into(), "echo hello && sleep 10".into()], 24, 80)
    }

    #[test]
    fn lifecycle_start_read_terminate() {
        let backend = PtyBackend;
        let mut session = shell_session();

        assert!(backend.start_process(&mut session));
        assert!(backend.is_process_alive(&session));

        backend.poll_process(&session, Duration::from_millis(500));
        let out = backend.read_output(&mut session, 4096);
        assert!(out.is_empty() || out.windows(5).any(|w| w == b"hello"));

        assert!(backend.terminate_process(&mut session));
        assert!(!backend.is_process_alive(&session));

        backend.cleanup(&mut session);
        assert!(session.platform_data.is_none());
    }

    #[test]
    fn operations_before_start_fail_softly() {
        let backend = PtyBackend;
        let mut session = shell_session();

        assert!(!backend.write_input(&mut session, b"x"));
        assert!(backend.read_output(&mut session, 16).is_empty());
        assert!(!backend.resize(&mut session, 30, 100));
        assert!(!backend.is_process_alive(&session));
    }

    #[test]
    fn supports_reports_expected_features() {
        let backend = PtyBackend;
        assert!(backend.supports(Feature::Resize));
        assert!(backend.supports(Feature::Input));
        assert!(backend.supports(Feature::Output));
    }

    #[test]
    fn start_failure_for_nonexistent_command_is_reported_not_panicked() {
        let backend = PtyBackend;
        let mut session = TerminalSession::new("/no/such/binary-xyz", vec![], 24, 80);
        assert!(!backend.start_process(&mut session));
        assert!(!session.active);
    }
}
