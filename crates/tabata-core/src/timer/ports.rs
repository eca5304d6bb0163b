//! Boundaries between the timer engine and the world around it.
//!
//! The engine drives these synchronously from its own transitions. Only the
//! quit confirmation is asynchronous, since it waits on the user.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::display::DisplayData;
use crate::error::{CueError, WakeLockError};
use crate::workout::WorkoutDefinition;

/// Resolves workout ids, supplied by workout storage.
pub trait WorkoutLookup {
    fn find(&self, id: &str) -> Option<Arc<WorkoutDefinition>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Timer,
    Home,
}

/// Receives everything the timer screen displays.
pub trait PresentationSink {
    fn on_event_changed(&mut self, display: &DisplayData);

    fn on_tick(&mut self, seconds_left: u32);

    fn on_progress(&mut self, completed: usize, total: usize);

    fn on_navigation_state(&mut self, can_go_prev: bool, done_visible: bool);

    fn on_screen_transition(&mut self, target: Screen);

    /// Label of the pause/resume control changed.
    fn on_pause_state(&mut self, _paused: bool) {}
}

/// Audible or haptic cues.
pub trait CueSink {
    /// Played at 3, 2 and 1 seconds left.
    fn play_countdown_cue(&mut self) -> Result<(), CueError>;

    /// Played when an event other than the first begins.
    fn play_task_start_cue(&mut self) -> Result<(), CueError>;
}

/// Opaque token for a held wake-lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WakeLockHandle(u64);

impl WakeLockHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Keeps the display awake while a workout runs.
pub trait WakeLockSink {
    fn acquire(&mut self) -> Result<WakeLockHandle, WakeLockError>;

    fn release(&mut self, handle: WakeLockHandle);
}

/// Asks the user a yes/no question.
#[async_trait(?Send)]
pub trait ConfirmationSink {
    async fn confirm(&self, message: &str, title: &str) -> bool;
}

/// Shows the end-of-workout notice.
pub trait CompletionNoticeSink {
    fn announce_completion(&mut self, title: &str, message: &str);
}

/// Confirmation that always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmation(pub bool);

#[async_trait(?Send)]
impl ConfirmationSink for FixedConfirmation {
    async fn confirm(&self, _message: &str, _title: &str) -> bool {
        self.0
    }
}

/// Wake-lock for hosts that have none. Every request fails, which the
/// engine tolerates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWakeLock;

impl WakeLockSink for NoWakeLock {
    fn acquire(&mut self) -> Result<WakeLockHandle, WakeLockError> {
        Err(WakeLockError("not supported on this host".into()))
    }

    fn release(&mut self, _handle: WakeLockHandle) {}
}

/// The set of ports a [`super::TimerEngine`] owns.
pub struct Ports {
    pub presentation: Box<dyn PresentationSink>,
    pub cues: Box<dyn CueSink>,
    pub wake_lock: Box<dyn WakeLockSink>,
    pub confirmation: Box<dyn ConfirmationSink>,
    pub notices: Box<dyn CompletionNoticeSink>,
}
