mod cli;
mod color;
mod error;
mod logging;
mod notify;
mod session;
mod storage;
mod timer;

use cli::{Action, Invocation};
use color::RESET;
use error::{PomoError, Result};
use notify::DesktopNotifier;
use session::{SessionRegistry, StatusPublisher};
use std::process::ExitCode;
use storage::{ColorStore, Config, ConfigStore, StorageRoot};
use timer::{TerminalSink, TimerEngine, TimerMode, TimerSettings, termination_signal};

#[tokio::main]
async fn main() -> ExitCode {
    let storage = StorageRoot::resolve();
    logging::init(&storage);

    let invocation = match cli::parse(std::env::args().skip(1)) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run 'pomo --help' for usage.");
            return ExitCode::FAILURE;
        }
    };

    match run(&invocation, &storage).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::info!(error = %e, "command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(inv: &Invocation, storage: &StorageRoot) -> Result<()> {
    let action = inv.action();
    if action == Action::Help {
        print!("{}", cli::USAGE);
        return Ok(());
    }

    let config_store = ConfigStore::new(storage);
    let mut config = config_store.load();
    if inv.apply_settings(&mut config) {
        persist(&config_store, &config);
    }

    let colors = ColorStore::new(storage);

    match action {
        Action::Help => {}
        Action::Status => {
            let snapshot = StatusPublisher::new(storage).read()?;
            print!("{}", snapshot);
        }
        Action::End => {
            let pid = SessionRegistry::new(storage).terminate()?;
            println!("Ended timer (PID {})", pid);
        }
        Action::ListPalettes => {
            let mut any = false;
            for palette in colors.list() {
                any = true;
                println!(
                    "{:<16} {}{}{} {}{}{}",
                    palette.name,
                    palette.fg1.fg(),
                    palette.fg1,
                    RESET,
                    palette.fg2.fg(),
                    palette.fg2,
                    RESET
                );
            }
            if !any {
                println!("No saved palettes");
            }
        }
        Action::SavePalette(name) => {
            colors.save(&name, config.fg1, config.fg2)?;
            println!("Saved palette '{}' ({} {})", name, config.fg1, config.fg2);
        }
        Action::LoadPalette(name) => {
            let palette = colors.load(&name)?;
            config.fg1 = palette.fg1;
            config.fg2 = palette.fg2;
            persist(&config_store, &config);
            println!("Loaded palette '{}' ({} {})", name, palette.fg1, palette.fg2);
        }
        Action::DeletePalette(name) => {
            colors.delete(&name)?;
            println!("Deleted palette '{}'", name);
        }
        Action::SettingsSaved => {
            println!(
                "Saved: pomodoro {}m, break {}m, colors {} {}",
                config.pomodoro_minutes, config.break_minutes, config.fg1, config.fg2
            );
        }
        Action::Run(mode) => run_timer(mode, inv, &config, storage).await?,
    }

    Ok(())
}

/// Config writes never abort a command; the in-memory values still apply.
fn persist(store: &ConfigStore, config: &Config) {
    if let Err(e) = store.save(config) {
        tracing::warn!(error = %e, "could not persist config");
    }
}

async fn run_timer(
    mode: TimerMode,
    inv: &Invocation,
    config: &Config,
    storage: &StorageRoot,
) -> Result<()> {
    let settings = TimerSettings {
        mode,
        minutes: inv.minutes_for(mode, config),
        track: inv.track,
        renderer: timer::Renderer {
            fg1: config.fg1,
            fg2: config.fg2,
        },
    };

    let shutdown =
        termination_signal().map_err(|e| PomoError::io("installing signal handlers", e))?;

    let mut engine = TimerEngine::new(
        settings,
        SessionRegistry::new(storage),
        StatusPublisher::new(storage),
        TerminalSink::stdout(),
        DesktopNotifier,
    );
    let reason = engine.run_until(shutdown).await;
    tracing::debug!(?reason, state = ?engine.state(), "engine stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use color::Rgb;
    use std::fs;
    use tempfile::TempDir;

    fn invocation(args: &[&str]) -> Invocation {
        cli::parse(args.iter().map(|s| s.to_string())).unwrap()
    }

    fn storage() -> (StorageRoot, TempDir) {
        let tmp = TempDir::new().unwrap();
        (StorageRoot::with_root(tmp.path().join("pomo")), tmp)
    }

    #[tokio::test]
    async fn saved_palette_becomes_active_when_loaded() {
        let (storage, _tmp) = storage();
        run(&invocation(&["-c1", "#112233", "-c2", "#445566"]), &storage)
            .await
            .unwrap();
        run(&invocation(&["-savec", "work"]), &storage).await.unwrap();
        run(&invocation(&["-c1", "#000000", "-c2", "#FFFFFF"]), &storage)
            .await
            .unwrap();

        run(&invocation(&["-loadc", "work"]), &storage).await.unwrap();

        let config = fs::read_to_string(storage.config_file()).unwrap();
        assert!(config.contains("COLOR1=#112233\n"));
        assert!(config.contains("COLOR2=#445566\n"));
    }

    #[tokio::test]
    async fn missing_palette_is_an_error() {
        let (storage, _tmp) = storage();
        let err = run(&invocation(&["-loadc", "nope"]), &storage)
            .await
            .unwrap_err();
        assert!(matches!(err, PomoError::PaletteNotFound(_)));
        assert!(!storage.config_file().exists());
    }

    #[tokio::test]
    async fn end_without_session_reports_and_leaves_nothing() {
        let (storage, _tmp) = storage();
        let err = run(&invocation(&["end"]), &storage).await.unwrap_err();
        assert!(matches!(err, PomoError::NoActiveSession));
        assert!(!storage.pid_file().exists());
        assert!(!storage.status_file().exists());
        assert!(!storage.root().exists());
    }

    #[tokio::test]
    async fn status_without_timer_reports_no_active_timer() {
        let (storage, _tmp) = storage();
        let err = run(&invocation(&["-status"]), &storage).await.unwrap_err();
        assert!(matches!(err, PomoError::NoActiveTimer));
    }

    #[tokio::test]
    async fn durations_persist_without_running() {
        let (storage, _tmp) = storage();
        run(&invocation(&["-setp", "50", "-setb", "10"]), &storage)
            .await
            .unwrap();

        let config = ConfigStore::new(&storage).load();
        assert_eq!(config.pomodoro_minutes, 50);
        assert_eq!(config.break_minutes, 10);
        assert_eq!(config.fg1, Rgb::WHITE);
        assert!(!storage.pid_file().exists());
    }

    #[tokio::test]
    async fn deleting_palette_twice_fails_the_second_time() {
        let (storage, _tmp) = storage();
        run(&invocation(&["-savec", "calm"]), &storage).await.unwrap();
        run(&invocation(&["-deletec", "calm"]), &storage).await.unwrap();
        let err = run(&invocation(&["-deletec", "calm"]), &storage)
            .await
            .unwrap_err();
        assert!(matches!(err, PomoError::PaletteNotFound(_)));
    }
}
