//! Timer engine implementation.
//!
//! The engine walks a single index through the execution queue of one
//! workout. It owns no thread: the host fires the live [`TickHandle`] once
//! per [`super::TICK_INTERVAL`] and forwards user actions.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running <-> Paused -> Stopped
//! ```
//!
//! Every transition that changes the active event or the status cancels the
//! live tick before doing anything else.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(ports);
//! engine.start(&catalog, "w-123")?;
//! // Once per second:
//! if let Some(handle) = engine.tick_handle() {
//!     engine.fire(handle);
//! }
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::display::DisplayData;
use super::ports::{Ports, Screen, WakeLockHandle, WorkoutLookup};
use super::ticker::{TickHandle, Ticker};
use crate::error::TimerError;
use crate::events::Event;
use crate::workout::{build_execution_queue, ExecutionEvent, WorkoutDefinition};

pub const QUIT_TITLE: &str = "Quit Workout";
pub const QUIT_MESSAGE: &str = "Are you sure you want to quit this workout?";
pub const COMPLETE_TITLE: &str = "Workout Complete!";
pub const COMPLETE_MESSAGE: &str = "Great job! You've successfully completed your workout.";

/// Countdown cues fire while this many seconds or fewer remain, down to 1.
const COUNTDOWN_CUE_SECS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Stopped,
    Running,
    Paused,
}

/// Core timer engine.
///
/// One instance per player. Starting a new workout discards the previous
/// run; nothing about a run is persisted.
pub struct TimerEngine {
    ports: Ports,
    status: TimerStatus,
    workout: Option<Arc<WorkoutDefinition>>,
    queue: Vec<ExecutionEvent>,
    /// -1 before the first event; at or past `queue.len()` once finished.
    current_index: i64,
    /// Seconds left in the current event. 0 for manual events.
    time_left: u32,
    current: Option<DisplayData>,
    wake_lock: Option<WakeLockHandle>,
    ticker: Ticker,
}

impl TimerEngine {
    pub fn new(ports: Ports) -> Self {
        Self {
            ports,
            status: TimerStatus::Stopped,
            workout: None,
            queue: Vec::new(),
            current_index: -1,
            time_left: 0,
            current: None,
            wake_lock: None,
            ticker: Ticker::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn current_index(&self) -> i64 {
        self.current_index
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn queue(&self) -> &[ExecutionEvent] {
        &self.queue
    }

    pub fn workout(&self) -> Option<&Arc<WorkoutDefinition>> {
        self.workout.as_ref()
    }

    pub fn current_display(&self) -> Option<&DisplayData> {
        self.current.as_ref()
    }

    pub fn is_wake_locked(&self) -> bool {
        self.wake_lock.is_some()
    }

    /// The live tick, if the current event is counting down.
    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.ticker.live()
    }

    /// Events completed and total events in this run.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.queue.len();
        let completed = self.current_index.clamp(0, total as i64) as usize;
        (completed, total)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            current_index: self.current_index,
            time_left: self.time_left,
            total_events: self.queue.len(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Resolve `workout_id` and start playing it from the first event.
    ///
    /// # Errors
    /// Returns [`TimerError::WorkoutNotFound`] and leaves the engine
    /// untouched if the lookup has no such workout.
    pub fn start(&mut self, lookup: &dyn WorkoutLookup, workout_id: &str) -> Result<(), TimerError> {
        let workout = lookup.find(workout_id).ok_or_else(|| TimerError::WorkoutNotFound {
            id: workout_id.to_string(),
        })?;
        self.start_workout(workout);
        Ok(())
    }

    /// Start playing `workout`, discarding any run in progress.
    pub fn start_workout(&mut self, workout: Arc<WorkoutDefinition>) {
        self.ticker.cancel();
        self.release_wake_lock();

        self.queue = build_execution_queue(&workout);
        debug!(
            workout_id = %workout.id,
            events = self.queue.len(),
            "starting workout"
        );
        self.workout = Some(workout);
        self.current_index = -1;
        self.time_left = 0;
        self.current = None;
        self.status = TimerStatus::Running;

        self.acquire_wake_lock();
        self.ports.presentation.on_pause_state(false);
        self.ports.presentation.on_screen_transition(Screen::Timer);
        self.advance();
    }

    /// Move to the next event. This is also the "Done" action for manual
    /// events. A paused run is resumed first.
    pub fn run_next_step(&mut self) {
        match self.status {
            TimerStatus::Stopped => {}
            TimerStatus::Paused => {
                self.resume(false);
                self.advance();
            }
            TimerStatus::Running => self.advance(),
        }
    }

    /// Fire the live tick, if any.
    pub fn tick(&mut self) {
        if let Some(handle) = self.ticker.live() {
            self.fire(handle);
        }
    }

    /// Count down one second on behalf of `handle`. Stale handles are ignored.
    pub fn fire(&mut self, handle: TickHandle) {
        if self.status != TimerStatus::Running || !self.ticker.is_live(handle) {
            return;
        }

        self.time_left = self.time_left.saturating_sub(1);
        self.ports.presentation.on_tick(self.time_left);

        if self.time_left > 0 && self.time_left <= COUNTDOWN_CUE_SECS {
            if let Err(e) = self.ports.cues.play_countdown_cue() {
                warn!(error = %e, "countdown cue failed");
            }
        }

        if self.time_left == 0 {
            self.advance();
        }
    }

    pub fn pause_resume(&mut self) {
        match self.status {
            TimerStatus::Running => {
                self.ticker.cancel();
                self.status = TimerStatus::Paused;
                self.release_wake_lock();
                self.ports.presentation.on_pause_state(true);
                debug!(time_left = self.time_left, "paused");
            }
            TimerStatus::Paused => self.resume(true),
            TimerStatus::Stopped => {}
        }
    }

    /// Abandon the current event and move to the next one.
    pub fn skip(&mut self) {
        self.run_next_step();
    }

    /// Replay the previous event from its full duration.
    pub fn prev(&mut self) {
        if self.status == TimerStatus::Stopped || self.current_index <= 0 {
            return;
        }
        if self.status == TimerStatus::Paused {
            self.resume(false);
        }
        // advance() re-increments onto the previous event.
        self.current_index -= 2;
        self.advance();
    }

    /// Ask the user to confirm, then stop the run if they agree.
    /// Returns whether the run was stopped.
    pub async fn quit(&mut self) -> bool {
        if self.status == TimerStatus::Stopped {
            return false;
        }
        let confirmed = self
            .ports
            .confirmation
            .confirm(QUIT_MESSAGE, QUIT_TITLE)
            .await;
        self.confirm_quit(confirmed)
    }

    /// Apply an already-obtained quit decision.
    pub fn confirm_quit(&mut self, confirmed: bool) -> bool {
        if !confirmed || self.status == TimerStatus::Stopped {
            return false;
        }
        self.ticker.cancel();
        self.release_wake_lock();
        self.status = TimerStatus::Stopped;
        self.teardown();
        self.ports.presentation.on_screen_transition(Screen::Home);
        debug!("workout quit");
        true
    }

    /// End the run as completed. No confirmation is asked.
    pub fn finish(&mut self) {
        if self.status == TimerStatus::Stopped {
            return;
        }
        self.ticker.cancel();
        self.release_wake_lock();
        self.ports
            .notices
            .announce_completion(COMPLETE_TITLE, COMPLETE_MESSAGE);
        self.status = TimerStatus::Stopped;
        self.teardown();
        self.ports.presentation.on_screen_transition(Screen::Home);
        debug!("workout finished");
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) {
        self.ticker.cancel();
        self.current_index += 1;

        let (completed, total) = self.progress();
        self.ports.presentation.on_progress(completed, total);

        let index = self.current_index as usize;
        let (Some(workout), Some(event)) = (self.workout.as_ref(), self.queue.get(index)) else {
            self.finish();
            return;
        };

        let data = DisplayData::resolve(workout, event, self.queue.get(index + 1));
        self.time_left = data.duration;
        self.ports.presentation.on_event_changed(&data);
        self.ports
            .presentation
            .on_navigation_state(self.current_index > 0, data.is_manual());
        debug!(
            index = self.current_index,
            category = %data.category,
            duration = data.duration,
            "event changed"
        );

        if self.current_index > 0 {
            if let Err(e) = self.ports.cues.play_task_start_cue() {
                warn!(error = %e, "task start cue failed");
            }
        }

        if data.duration > 0 {
            self.ticker.arm();
        }
        self.current = Some(data);
    }

    fn resume(&mut self, restart_tick: bool) {
        self.status = TimerStatus::Running;
        if restart_tick && self.time_left > 0 {
            self.ticker.arm();
        }
        self.acquire_wake_lock();
        self.ports.presentation.on_pause_state(false);
        debug!(time_left = self.time_left, "resumed");
    }

    fn teardown(&mut self) {
        self.queue.clear();
        self.workout = None;
        self.current = None;
        self.time_left = 0;
    }

    fn acquire_wake_lock(&mut self) {
        if self.wake_lock.is_some() {
            return;
        }
        match self.ports.wake_lock.acquire() {
            Ok(handle) => self.wake_lock = Some(handle),
            Err(e) => warn!(error = %e, "continuing without wake lock"),
        }
    }

    fn release_wake_lock(&mut self) {
        if let Some(handle) = self.wake_lock.take() {
            self.ports.wake_lock.release(handle);
        }
    }
}
