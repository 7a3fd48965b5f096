//! Foreground run loop.
//!
//! Multiplexes stdin commands, the tick driver, engine events and Ctrl-C on
//! a single task. The engine is only ever touched from this loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::commands::RunArgs;
use super::display::Display;
use super::handler::{CommandHandler, Reply};
use crate::config::resolve_settings;
use crate::engine::{EffectDispatcher, IntervalTicker, TimerEngine, TimerEvent};
use crate::notification::{DesktopNotifier, Notifier};
use crate::sound::{try_create_player, TonePlayer};
use crate::tasks::TaskList;
use crate::types::{format_clock, Settings};

/// Builds the effect backends for `settings`.
///
/// The audio device is only opened when sound is enabled at startup.
fn build_effects(settings: &Settings) -> EffectDispatcher {
    let player = if settings.sound_enabled {
        try_create_player().map(|p| p as Arc<dyn TonePlayer>)
    } else {
        debug!("Sound disabled, audio output not opened");
        None
    };
    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new());
    EffectDispatcher::new(player, Some(notifier))
}

/// Builds the engine from the settings file, flags and startup tasks.
fn build_engine(
    args: &RunArgs,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
) -> Result<TimerEngine<TaskList>> {
    let file_settings =
        resolve_settings(args.config.as_deref()).context("Failed to load settings")?;
    let settings = file_settings.apply(&args.to_update());

    let mut tasks = TaskList::new();
    for text in &args.tasks {
        tasks
            .add(text)
            .with_context(|| format!("Invalid task '{}'", text))?;
    }

    let effects = build_effects(&settings);
    Ok(TimerEngine::new(settings, tasks, effects, event_tx))
}

fn print_reply(reply: Reply) {
    match reply {
        Reply::Message(text) => println!("{}", text),
        Reply::Error { message, hint } => Display::show_error_with_hint(&message, &hint),
        Reply::Silent | Reply::Quit => {}
    }
}

fn print_event(event: &TimerEvent) {
    if let Some(line) = Display::event(event) {
        println!("{}", line);
    }
}

/// Runs the interactive timer until `quit`, end of input or Ctrl-C.
///
/// # Errors
///
/// Returns an error if the settings cannot be loaded or stdin fails.
pub async fn run(args: RunArgs) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut handler = CommandHandler::new(build_engine(&args, event_tx)?);

    let state = handler.engine().state();
    println!(
        "pomoflow: {} {} (paused). Type 'help' for commands.",
        state.mode.label(),
        format_clock(state.remaining_seconds)
    );

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut ticker = IntervalTicker::every_second();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        ticker.sync(handler.engine().tick_token());

        tokio::select! {
            biased;

            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            Some(event) = event_rx.recv() => print_event(&event),
            token = ticker.next() => {
                handler.engine_mut().on_tick(token);
            }
            line = lines.next_line() => {
                match line.context("Failed to read from stdin")? {
                    Some(line) => match handler.handle_line(&line) {
                        Reply::Quit => break,
                        reply => print_reply(reply),
                    },
                    None => {
                        debug!("End of input");
                        break;
                    }
                }
            }
        }
    }

    while let Ok(event) = event_rx.try_recv() {
        print_event(&event);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_engine_applies_flags_over_defaults() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let args = RunArgs {
            work: Some(45),
            no_sound: true,
            no_notifications: true,
            tasks: vec!["write report".to_string()],
            ..RunArgs::default()
        };

        let engine = build_engine(&args, tx).unwrap();

        assert_eq!(engine.settings().work_minutes, 45);
        assert!(!engine.settings().sound_enabled);
        assert_eq!(engine.state().remaining_seconds, 2700);
        assert_eq!(engine.tasks().len(), 1);
    }

    #[test]
    fn test_build_engine_missing_config_fails() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            config: Some(dir.path().join("missing.json")),
            ..RunArgs::default()
        };

        let err = build_engine(&args, tx).err().unwrap();
        assert!(format!("{:#}", err).contains("missing.json"));
    }

    #[test]
    fn test_build_engine_rejects_blank_task() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let args = RunArgs {
            no_sound: true,
            tasks: vec!["   ".to_string()],
            ..RunArgs::default()
        };

        assert!(build_engine(&args, tx).is_err());
    }
}
