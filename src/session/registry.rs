//! PID file bookkeeping for the single running timer.
//!
//! The timer process writes its PID on start and removes it on every exit
//! path. `pomo end` reads it back and signals that process. Nothing here is
//! locked: two timers started together both write the file and the last one
//! wins.

use super::StatusPublisher;
use crate::error::{PomoError, Result};
use crate::storage::{StorageRoot, remove_file, write_file};
use std::fs;
use std::path::PathBuf;

/// Proof that this process registered itself. Hand it back to
/// [`SessionRegistry::end`] when the run is over.
#[derive(Debug)]
#[must_use]
pub struct SessionHandle {
    pid: u32,
    registered: bool,
}

impl SessionHandle {
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// False when the PID file could not be written; `pomo end` cannot reach
    /// this session.
    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

#[derive(Debug, Clone)]
pub struct SessionRegistry {
    pid_file: PathBuf,
    status: StatusPublisher,
}

impl SessionRegistry {
    pub fn new(storage: &StorageRoot) -> Self {
        Self {
            pid_file: storage.pid_file(),
            status: StatusPublisher::new(storage),
        }
    }

    /// PID recorded in the PID file, if any.
    pub fn recorded_pid(&self) -> Option<u32> {
        let contents = fs::read_to_string(&self.pid_file).ok()?;
        contents.trim().parse().ok()
    }

    /// Records the current process as the active session. Failure to write is
    /// logged, and the timer runs anyway.
    pub fn begin(&self) -> SessionHandle {
        let pid = std::process::id();

        if let Some(other) = self.recorded_pid() {
            if other != pid && is_process_alive(other) {
                tracing::warn!(other, pid, "another session is active, taking over the pid file");
                eprintln!("Warning: replacing active session (PID {})", other);
            }
        }

        let registered = match write_file(&self.pid_file, &format!("{}\n", pid)) {
            Ok(()) => {
                tracing::info!(pid, path = %self.pid_file.display(), "session registered");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not register session, `end` will not reach it");
                false
            }
        };
        SessionHandle { pid, registered }
    }

    /// Removes the PID file if it still names this session.
    pub fn end(&self, handle: SessionHandle) {
        if !handle.registered {
            return;
        }
        match self.recorded_pid() {
            Some(pid) if pid != handle.pid => {
                tracing::info!(pid, ours = handle.pid, "pid file belongs to a newer session, leaving it");
            }
            _ => {
                if let Err(e) = remove_file(&self.pid_file) {
                    tracing::warn!(error = %e, "failed to remove pid file");
                }
                tracing::info!(pid = handle.pid, "session released");
            }
        }
    }

    /// Signals the recorded session to stop and removes its PID and status
    /// files. A PID file left behind by a dead process (or by ourselves) is
    /// reaped and reported as no active session.
    pub fn terminate(&self) -> Result<u32> {
        let Some(pid) = self.recorded_pid() else {
            if self.pid_file.exists() {
                tracing::warn!("pid file is unreadable, removing it");
                self.reap();
            }
            return Err(PomoError::NoActiveSession);
        };

        if pid == std::process::id() || !is_process_alive(pid) {
            tracing::info!(pid, "reaping stale session files");
            self.reap();
            return Err(PomoError::NoActiveSession);
        }

        send_terminate(pid).map_err(|e| PomoError::io(format!("signalling PID {}", pid), e))?;
        tracing::info!(pid, "sent terminate signal");
        self.reap();
        Ok(pid)
    }

    fn reap(&self) {
        if let Err(e) = remove_file(&self.pid_file) {
            tracing::warn!(error = %e, "failed to remove pid file");
        }
        self.status.clear();
    }
}

/// `kill(pid, 0)`; a permission error still means the process exists.
pub fn is_process_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        let Ok(pid) = libc::pid_t::try_from(pid) else {
            return false;
        };
        if pid <= 0 {
            return false;
        }
        // SAFETY: signal 0 performs only the existence and permission check.
        if unsafe { libc::kill(pid, 0) } == 0 {
            return true;
        }
        std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
        false
    }
}

fn send_terminate(pid: u32) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let pid = libc::pid_t::try_from(pid)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        // SAFETY: plain kill(2) with a validated, positive pid.
        if unsafe { libc::kill(pid, libc::SIGTERM) } == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
    #[cfg(not(unix))]
    {
        let _ = pid;
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "signals are not supported on this platform",
        ))
    }
}
