//! Terminal implementations of the timer's ports.

use std::io::Write;
use std::rc::Rc;

use async_trait::async_trait;
use tabata_core::error::{CueError, WakeLockError};
use tabata_core::storage::AudioConfig;
use tabata_core::timer::{
    format_time, CompletionNoticeSink, ConfirmationSink, CueSink, DisplayData, PresentationSink,
    Screen, WakeLockHandle, WakeLockSink,
};
use tokio::sync::{mpsc, Mutex};
use tracing::info;

use crate::commands::is_yes;

/// Lines typed on stdin, shared by the command loop and the quit prompt.
pub type Input = Rc<Mutex<mpsc::UnboundedReceiver<String>>>;

pub async fn next_line(input: &Input) -> Option<String> {
    input.lock().await.recv().await
}

/// Countdown screen on stdout.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    progress: (usize, usize),
    paused: bool,
}

impl TerminalPresenter {
    fn print(&self, text: &str) {
        let mut out = std::io::stdout();
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl PresentationSink for TerminalPresenter {
    fn on_event_changed(&mut self, display: &DisplayData) {
        let (done, total) = self.progress;
        let mut text = format!(
            "\n[{}/{}] {}: {}\n",
            done + 1,
            total,
            display.category,
            display.name
        );
        if !display.description.is_empty() {
            text.push_str(&format!("  {}\n", display.description));
        }
        if let Some(reps) = display.reps_label() {
            text.push_str(&format!("  {reps}\n"));
        }
        if let Some(media) = &display.media {
            text.push_str(&format!("  media: {media}\n"));
        }
        text.push_str(&format!("  {}\n", display.progress_text()));
        if display.is_manual() {
            text.push_str("  Press Enter when done.\n");
        } else {
            text.push_str(&format!("  {}", format_time(display.duration)));
        }
        self.print(&text);
    }

    fn on_tick(&mut self, seconds_left: u32) {
        self.print(&format!("\r  {}  ", format_time(seconds_left)));
    }

    fn on_progress(&mut self, completed: usize, total: usize) {
        self.progress = (completed, total);
    }

    fn on_navigation_state(&mut self, _can_go_prev: bool, _done_visible: bool) {}

    fn on_screen_transition(&mut self, target: Screen) {
        match target {
            Screen::Timer => {
                self.print("p pause/resume · n skip · b previous · Enter done · q quit\n")
            }
            Screen::Home => self.print("\n"),
        }
    }

    fn on_pause_state(&mut self, paused: bool) {
        if paused != self.paused {
            self.paused = paused;
            self.print(if paused { "  [paused]" } else { "  [resumed]" });
        }
    }
}

pub struct TerminalNotice;

impl CompletionNoticeSink for TerminalNotice {
    fn announce_completion(&mut self, title: &str, message: &str) {
        println!("\n{title}\n{message}");
    }
}

/// Rings the terminal bell: once for the countdown, twice for a new task.
pub struct BellCues {
    audible: bool,
}

impl BellCues {
    pub fn new(audio: &AudioConfig) -> Self {
        Self {
            audible: audio.enabled && audio.bell,
        }
    }

    fn ring(&self, times: usize) -> Result<(), CueError> {
        if !self.audible {
            return Ok(());
        }
        let mut err = std::io::stderr();
        err.write_all(&b"\x07".repeat(times))
            .and_then(|_| err.flush())
            .map_err(|e| CueError(e.to_string()))
    }
}

impl CueSink for BellCues {
    fn play_countdown_cue(&mut self) -> Result<(), CueError> {
        self.ring(1)
    }

    fn play_task_start_cue(&mut self) -> Result<(), CueError> {
        self.ring(2)
    }
}

/// A terminal cannot stop the display from sleeping; this records the
/// request so the lock lifecycle shows up in logs.
#[derive(Debug, Default)]
pub struct TerminalWakeLock {
    issued: u64,
}

impl WakeLockSink for TerminalWakeLock {
    fn acquire(&mut self) -> Result<WakeLockHandle, WakeLockError> {
        self.issued += 1;
        info!(handle = self.issued, "wake lock acquired");
        Ok(WakeLockHandle::new(self.issued))
    }

    fn release(&mut self, handle: WakeLockHandle) {
        info!(handle = handle.id(), "wake lock released");
    }
}

/// Asks on stderr and reads the answer from the shared input.
pub struct StdinConfirmation {
    input: Input,
    assume_yes: bool,
}

impl StdinConfirmation {
    pub fn new(input: Input, assume_yes: bool) -> Self {
        Self { input, assume_yes }
    }
}

#[async_trait(?Send)]
impl ConfirmationSink for StdinConfirmation {
    async fn confirm(&self, message: &str, title: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("\n{title}: {message} [y/N] ");
        let _ = std::io::stderr().flush();
        next_line(&self.input)
            .await
            .is_some_and(|answer| is_yes(&answer))
    }
}
