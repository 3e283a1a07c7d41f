//! Low-level PTY spawning and I/O-thread management.
//!
//! Grounded on `lite-edit-terminal::pty::PtyHandle`: `portable_pty` for
//! the cross-platform PTY pair, a `crossbeam_channel` plus a background
//! reader thread for non-blocking reads, killing the child and dropping
//! the thread handle (without joining, since the reader may be blocked in
//! `read`) on teardown. The teacher's own terminal crate delegates to an
//! external `par_term_emu_core_rust` dependency that isn't a real,
//! fetchable crate in this context, so this module substitutes the
//! `portable-pty`/`crossbeam-channel` pairing already used elsewhere in
//! the example pack.

use std::io::{Read, Write};
use std::path::Path;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver};
use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::event::PtyEvent;

/// Reader-thread-to-consumer queue depth before the reader blocks on send.
const EVENT_QUEUE_CAPACITY: usize = 1024;

pub struct PtyHandle {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
    event_rx: Receiver<PtyEvent>,
    reader_thread: Option<JoinHandle<()>>,
}

impl PtyHandle {
    pub fn spawn(
        command: &str,
        args: &[String],
        cwd: &Path,
        rows: u16,
        cols: u16,
    ) -> std::io::Result<Self> {
        let pty_system = native_pty_system();
        let size = PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        };
        let pair = pty_system
            .openpty(size)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        let mut builder = CommandBuilder::new(command);
        builder.args(args);
        builder.cwd(cwd);
        builder.env("TERM", "xterm-256color");
        builder.env("COLORTERM", "truecolor");

        let child = pair
            .slave
            .spawn_command(builder)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        // Bounded so a slow consumer applies backpressure to the reader
        // thread rather than letting output buffer without limit.
        let (event_tx, event_rx) = bounded(EVENT_QUEUE_CAPACITY);

        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        let reader_thread = thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) => {
                        let _ = event_tx.send(PtyEvent::Exited);
                        break;
                    }
                    Ok(n) => {
                        if event_tx.send(PtyEvent::Output(buf[..n].to_vec())).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = event_tx.send(PtyEvent::Error(e));
                        break;
                    }
                }
            }
        });

        Ok(PtyHandle {
            master: pair.master,
            writer,
            child,
            event_rx,
            reader_thread: Some(reader_thread),
        })
    }

    pub fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()
    }

    pub fn resize(&self, rows: u16, cols: u16) -> std::io::Result<()> {
        self.master
            .resize(PtySize { rows, cols, pixel_width: 0, pixel_height: 0 })
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    /// Non-blocking drain of accumulated reader-thread events, up to
    /// `max_bytes` of output. Exit/error events short-circuit further
    /// draining for this call.
    pub fn try_read(&self, max_bytes: usize) -> (Vec<u8>, bool, Option<std::io::Error>) {
        let mut collected = Vec::new();
        let mut exited = false;
        let mut error = None;
        while collected.len() < max_bytes {
            match self.event_rx.try_recv() {
                Ok(PtyEvent::Output(mut bytes)) => {
                    let room = max_bytes - collected.len();
                    if bytes.len() > room {
                        bytes.truncate(room);
                    }
                    collected.extend(bytes);
                }
                Ok(PtyEvent::Exited) => {
                    exited = true;
                    break;
                }
                Ok(PtyEvent::Error(e)) => {
                    error = Some(e);
                    break;
                }
                Err(_) => break,
            }
        }
        (collected, exited, error)
    }

    /// Block up to `timeout` waiting for the first reader-thread event.
    pub fn poll(&self, timeout: std::time::Duration) -> bool {
        self.event_rx.recv_timeout(timeout).is_ok()
    }

    pub fn try_wait(&mut self) -> Option<i32> {
        match self.child.try_wait() {
            Ok(Some(status)) => Some(status.exit_code() as i32),
            Ok(None) => None,
            Err(_) => Some(-1),
        }
    }

    pub fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().map_err(|e| std::io::Error::other(e.to_string()))
    }
}

impl Drop for PtyHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        // The reader thread unblocks on EOF/error once the PTY closes; we
        // deliberately don't join it since it may still be inside a
        // blocking read on some platforms.
        self.reader_thread.take();
    }
}
