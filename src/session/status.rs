use crate::error::{PomoError, Result};
use crate::storage::{StorageRoot, atomic_write, remove_file};
use crate::timer::Frame;
use std::fs;
use std::path::PathBuf;

/// Mirrors rendered frames to the `status` file for `pomo -status`.
///
/// Each publish replaces the file with one complete frame. The last frame
/// stays on disk until [`clear`](Self::clear) runs, so a reader may see the
/// final frame of a session that has already exited.
#[derive(Debug, Clone)]
pub struct StatusPublisher {
    path: PathBuf,
}

impl StatusPublisher {
    pub fn new(storage: &StorageRoot) -> Self {
        Self {
            path: storage.status_file(),
        }
    }

    pub fn publish(&self, frame: &Frame) -> Result<()> {
        atomic_write(&self.path, &frame.snapshot())
    }

    pub fn clear(&self) {
        match remove_file(&self.path) {
            Ok(true) => tracing::debug!("status snapshot cleared"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "failed to clear status snapshot"),
        }
    }

    /// Latest snapshot, as written. No freshness check.
    pub fn read(&self) -> Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PomoError::NoActiveTimer),
            Err(e) => Err(PomoError::io_at("reading", &self.path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn frame(text: &str) -> Frame {
        Frame {
            header: format!("header {text}"),
            countdown: format!("countdown {text}"),
            bar: format!("bar {text}"),
        }
    }

    #[test]
    fn read_without_snapshot_reports_no_timer() {
        let tmp = TempDir::new().unwrap();
        let publisher = StatusPublisher::new(&StorageRoot::with_root(tmp.path().join("pomo")));
        assert!(matches!(publisher.read(), Err(PomoError::NoActiveTimer)));
    }

    #[test]
    fn publish_overwrites_with_latest_frame() {
        let tmp = TempDir::new().unwrap();
        let publisher = StatusPublisher::new(&StorageRoot::with_root(tmp.path().join("pomo")));

        publisher.publish(&frame("one")).unwrap();
        publisher.publish(&frame("two")).unwrap();

        let text = publisher.read().unwrap();
        assert_eq!(text, "header two\ncountdown two\nbar two\n");
    }

    #[test]
    fn clear_removes_snapshot_and_is_repeatable() {
        let tmp = TempDir::new().unwrap();
        let publisher = StatusPublisher::new(&StorageRoot::with_root(tmp.path().join("pomo")));
        publisher.publish(&frame("x")).unwrap();
        publisher.clear();
        publisher.clear();
        assert!(matches!(publisher.read(), Err(PomoError::NoActiveTimer)));
    }

    #[test]
    fn concurrent_reader_only_sees_whole_frames() {
        let tmp = TempDir::new().unwrap();
        let publisher = StatusPublisher::new(&StorageRoot::with_root(tmp.path().join("pomo")));

        let short = frame("a");
        let long = frame(&"\x1b[38;2;0;204;255m█".repeat(200));
        let expected = [short.snapshot(), long.snapshot()];

        let reader = {
            let publisher = publisher.clone();
            let expected = expected.clone();
            std::thread::spawn(move || {
                for _ in 0..2000 {
                    match publisher.read() {
                        Ok(text) => assert!(expected.contains(&text), "torn read: {text:?}"),
                        Err(PomoError::NoActiveTimer) => {}
                        Err(e) => panic!("unexpected error: {e}"),
                    }
                }
            })
        };

        for i in 0..2000 {
            let next = if i % 2 == 0 { &long } else { &short };
            publisher.publish(next).unwrap();
        }

        reader.join().unwrap();
        assert!(expected.contains(&publisher.read().unwrap()));
    }
}
