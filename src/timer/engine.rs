//! The countdown state machine.
//!
//! `Idle -> Running -> Completed | Terminated`. A run registers the session,
//! ticks once per second until the countdown hits zero or a termination
//! signal arrives, then releases the session through one teardown path.

use super::mode::TimerMode;
use super::render::{Countdown, DisplaySink, Frame, Renderer};
use crate::notify::Notifier;
use crate::session::{SessionHandle, SessionRegistry, StatusPublisher};
use chrono::{DateTime, Local, TimeDelta};
use std::future::Future;
use tokio::time::{Duration, MissedTickBehavior, interval};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Completed,
    Terminated,
}

#[derive(Debug, Clone, Copy)]
pub struct TimerSettings {
    pub mode: TimerMode,
    pub minutes: u32,
    /// Mirror frames to the status file.
    pub track: bool,
    pub renderer: Renderer,
}

pub struct TimerEngine<S: DisplaySink, N: Notifier> {
    settings: TimerSettings,
    registry: SessionRegistry,
    status: StatusPublisher,
    sink: S,
    notifier: N,
    state: EngineState,
}

impl<S: DisplaySink, N: Notifier> TimerEngine<S, N> {
    pub fn new(
        settings: TimerSettings,
        registry: SessionRegistry,
        status: StatusPublisher,
        sink: S,
        notifier: N,
    ) -> Self {
        Self {
            settings,
            registry,
            status,
            sink,
            notifier,
            state: EngineState::Idle,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    fn total_secs(&self) -> u64 {
        u64::from(self.settings.minutes) * 60
    }

    /// Runs until the countdown finishes or `shutdown` resolves. The shutdown
    /// future must already be listening when passed in.
    pub async fn run_until<F>(&mut self, shutdown: F) -> ExitReason
    where
        F: Future<Output = ()>,
    {
        let total = self.total_secs();
        let (start, end) = clock_labels(Local::now(), total);
        let header = self
            .settings
            .renderer
            .header(self.settings.mode.label(), &start, &end);

        let handle = self.registry.begin();
        self.state = EngineState::Running;
        tracing::info!(
            mode = self.settings.mode.label(),
            minutes = self.settings.minutes,
            track = self.settings.track,
            pid = handle.pid(),
            registered = handle.is_registered(),
            "timer started"
        );

        let reason = tokio::select! {
            _ = self.tick_loop(header, total) => ExitReason::Completed,
            _ = shutdown => ExitReason::Terminated,
        };

        self.release_session(handle, reason);
        reason
    }

    async fn tick_loop(&mut self, header: String, total: u64) {
        if let Err(e) = self.sink.begin(&header) {
            tracing::warn!(error = %e, "display unavailable");
        }

        let mut ticker = interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        for tick in Countdown::new(total) {
            ticker.tick().await;

            let renderer = self.settings.renderer;
            let frame = Frame {
                header: header.clone(),
                countdown: renderer.countdown(self.settings.minutes, &tick),
                bar: renderer.bar(&tick),
            };

            if let Err(e) = self.sink.draw(&frame) {
                tracing::warn!(error = %e, "failed to draw frame");
            }
            if self.settings.track {
                if let Err(e) = self.status.publish(&frame) {
                    tracing::warn!(error = %e, "failed to publish status");
                }
            }
        }
    }

    /// Shared teardown for both exit reasons.
    fn release_session(&mut self, handle: SessionHandle, reason: ExitReason) {
        if let Err(e) = self.sink.finish() {
            tracing::warn!(error = %e, "failed to restore display");
        }
        self.registry.end(handle);
        if self.settings.track {
            self.status.clear();
        }

        self.state = match reason {
            ExitReason::Completed => EngineState::Completed,
            ExitReason::Terminated => EngineState::Terminated,
        };
        tracing::info!(?reason, "timer finished");

        if reason == ExitReason::Completed {
            self.notifier.notify(self.settings.mode);
        }
    }
}

/// `HH:MM` labels for the start and the projected end of a run.
pub fn clock_labels(now: DateTime<Local>, total_secs: u64) -> (String, String) {
    let end = now + TimeDelta::seconds(i64::try_from(total_secs).unwrap_or(i64::MAX / 1000));
    (
        now.format("%H:%M").to_string(),
        end.format("%H:%M").to_string(),
    )
}

/// Resolves on SIGTERM (sent by `pomo end`) or SIGINT. Handlers are installed
/// before this returns.
#[cfg(unix)]
pub fn termination_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    let mut int = signal(SignalKind::interrupt())?;
    Ok(async move {
        tokio::select! {
            _ = term.recv() => tracing::info!("received SIGTERM"),
            _ = int.recv() => tracing::info!("received SIGINT"),
        }
    })
}

#[cfg(not(unix))]
pub fn termination_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
    })
}
