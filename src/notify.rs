use crate::timer::TimerMode;
use notify_rust::Notification;
use std::process::{Command, Stdio};

/// Announces a finished session. Best effort: failures never reach the caller.
pub trait Notifier {
    fn notify(&self, mode: TimerMode);
}

/// Desktop notification plus a short sound.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, mode: TimerMode) {
        if let Err(e) = send_notification(mode.label(), mode.done_message()) {
            tracing::debug!(error = %e, "desktop notification failed");
        }
        if let Err(e) = play_sound() {
            tracing::debug!(error = %e, "alert sound failed");
        }
    }
}

fn send_notification(summary: &str, body: &str) -> Result<(), Box<dyn std::error::Error>> {
    Notification::new().summary(summary).body(body).show()?;
    Ok(())
}

#[cfg(target_os = "macos")]
const SOUND_COMMAND: (&str, &str) = ("afplay", "/System/Library/Sounds/Ping.aiff");
#[cfg(not(target_os = "macos"))]
const SOUND_COMMAND: (&str, &str) = ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga");

/// Spawns the player detached; we don't wait for it.
fn play_sound() -> std::io::Result<()> {
    let (program, file) = SOUND_COMMAND;
    Command::new(program)
        .arg(file)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
