//! Plays a workout in the terminal.
//!
//! The engine runs on the current thread. One select loop multiplexes the
//! engine's live tick with commands typed on stdin.

mod sinks;

use std::rc::Rc;

use tabata_core::error::CoreError;
use tabata_core::storage::AudioConfig;
use tabata_core::timer::{FixedConfirmation, NoWakeLock, Ports, TickHandle, TICK_INTERVAL};
use tabata_core::{EventRecorder, TimerEngine, TimerStatus, WorkoutCatalog};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;
use tracing::warn;

use sinks::{
    next_line, BellCues, Input, StdinConfirmation, TerminalNotice, TerminalPresenter,
    TerminalWakeLock,
};

pub struct PlayerOptions {
    pub json: bool,
    pub assume_yes: bool,
    pub audio: AudioConfig,
    pub wake_lock: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Quit,
    /// Stdin closed while the workout waited on the user.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    PauseResume,
    Skip,
    Prev,
    Done,
    Quit,
    Status,
    Unknown,
}

impl Command {
    fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "p" | "pause" | "resume" => Command::PauseResume,
            "n" | "next" | "skip" => Command::Skip,
            "b" | "back" | "prev" => Command::Prev,
            "" | "d" | "done" => Command::Done,
            "q" | "quit" => Command::Quit,
            "s" | "status" => Command::Status,
            _ => Command::Unknown,
        }
    }
}

fn spawn_input_reader() -> Input {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    Rc::new(Mutex::new(rx))
}

/// When the engine's live tick is next due.
///
/// A handle keeps its cadence from one tick to the next. A new handle, or
/// a restart after the loop was held up, is due one interval from now.
#[derive(Debug, Default)]
struct TickSchedule {
    due: Option<(TickHandle, Instant)>,
}

impl TickSchedule {
    /// Follow the engine's live handle. Returns when it is due.
    fn sync(&mut self, live: Option<TickHandle>, now: Instant) -> Option<Instant> {
        self.due = match (live, self.due) {
            (Some(live), Some((handle, at))) if live == handle => Some((handle, at)),
            (Some(live), _) => Some((live, now + TICK_INTERVAL)),
            (None, _) => None,
        };
        self.due.map(|(_, at)| at)
    }

    /// The due handle fired; schedule its next tick.
    fn fired(&mut self) -> Option<TickHandle> {
        let (handle, at) = self.due?;
        self.due = Some((handle, at + TICK_INTERVAL));
        Some(handle)
    }

    /// Forget the cadence, so no backlog of missed ticks fires at once.
    fn restart(&mut self) {
        self.due = None;
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn print_events(recorder: &EventRecorder) -> Result<(), CoreError> {
    for event in recorder.drain() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}

/// Play `workout_id` from `catalog` until it completes or the user quits.
///
/// # Errors
/// Returns an error if the workout does not exist or JSON output fails.
pub async fn play(
    catalog: &WorkoutCatalog,
    workout_id: &str,
    options: PlayerOptions,
) -> Result<Outcome, CoreError> {
    let input = spawn_input_reader();
    let recorder = EventRecorder::new();
    let confirmation = StdinConfirmation::new(input.clone(), options.assume_yes);

    let mut ports = if options.json {
        let mut ports = recorder.ports(FixedConfirmation(false));
        ports.confirmation = Box::new(confirmation);
        ports
    } else {
        Ports {
            presentation: Box::new(TerminalPresenter::default()),
            cues: Box::new(BellCues::new(&options.audio)),
            wake_lock: Box::new(TerminalWakeLock::default()),
            confirmation: Box::new(confirmation),
            notices: Box::new(TerminalNotice),
        }
    };
    if !options.wake_lock {
        ports.wake_lock = Box::new(NoWakeLock);
    }

    let mut engine = TimerEngine::new(ports);
    engine.start(catalog, workout_id)?;

    let mut input_open = true;
    let mut quit = false;
    let mut schedule = TickSchedule::default();

    loop {
        print_events(&recorder)?;
        if engine.status() == TimerStatus::Stopped {
            break;
        }

        let deadline = schedule.sync(engine.tick_handle(), Instant::now());
        if !input_open && deadline.is_none() {
            warn!("no input left to advance a manual or paused event");
            engine.confirm_quit(true);
            print_events(&recorder)?;
            return Ok(Outcome::Abandoned);
        }

        tokio::select! {
            _ = wait_until(deadline) => {
                if let Some(handle) = schedule.fired() {
                    engine.fire(handle);
                }
            }
            line = next_line(&input), if input_open => match line {
                None => input_open = false,
                Some(line) => match Command::parse(&line) {
                    Command::PauseResume => engine.pause_resume(),
                    Command::Skip => engine.skip(),
                    Command::Prev => engine.prev(),
                    Command::Done => {
                        if engine.current_display().is_some_and(|d| d.is_manual()) {
                            engine.run_next_step();
                        }
                    }
                    Command::Quit => {
                        quit = engine.quit().await;
                        // Ticks were held while the prompt was open.
                        schedule.restart();
                    }
                    Command::Status => eprintln!("{}", serde_json::to_string(&engine.snapshot())?),
                    Command::Unknown => {
                        eprintln!("commands: p pause/resume · n skip · b previous · Enter done · q quit · s status");
                    }
                },
            },
        }
    }

    Ok(if quit { Outcome::Quit } else { Outcome::Completed })
}
