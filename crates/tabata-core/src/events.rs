use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CueError, WakeLockError};
use crate::timer::{
    format_time, CompletionNoticeSink, ConfirmationSink, CueSink, DisplayData, Ports,
    PresentationSink, Screen, TimerStatus, WakeLockHandle, WakeLockSink,
};

/// Everything the timer tells the outside world, as data.
/// The JSON player prints these; tests assert on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    EventChanged {
        display: DisplayData,
        at: DateTime<Utc>,
    },
    Tick {
        seconds_left: u32,
        formatted: String,
        at: DateTime<Utc>,
    },
    Progress {
        completed: usize,
        total: usize,
        at: DateTime<Utc>,
    },
    Navigation {
        can_go_prev: bool,
        done_visible: bool,
        at: DateTime<Utc>,
    },
    Screen {
        target: Screen,
        at: DateTime<Utc>,
    },
    PauseState {
        paused: bool,
        at: DateTime<Utc>,
    },
    CountdownCue {
        at: DateTime<Utc>,
    },
    TaskStartCue {
        at: DateTime<Utc>,
    },
    WakeLockAcquired {
        handle: u64,
        at: DateTime<Utc>,
    },
    WakeLockReleased {
        handle: u64,
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        title: String,
        message: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        current_index: i64,
        time_left: u32,
        total_events: usize,
        at: DateTime<Utc>,
    },
}

/// Port implementation that appends every notification to a shared log.
///
/// Clones share the same log, so one recorder can back every port of an
/// engine and still be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    log: Rc<RefCell<Vec<Event>>>,
    next_lock: Rc<Cell<u64>>,
    fail_cues: bool,
    fail_wake_lock: bool,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cue requests fail (and are still not recorded).
    pub fn with_failing_cues(mut self) -> Self {
        self.fail_cues = true;
        self
    }

    /// Wake-lock requests fail.
    pub fn with_failing_wake_lock(mut self) -> Self {
        self.fail_wake_lock = true;
        self
    }

    /// Engine ports backed by this recorder.
    pub fn ports(&self, confirmation: impl ConfirmationSink + 'static) -> Ports {
        Ports {
            presentation: Box::new(self.clone()),
            cues: Box::new(self.clone()),
            wake_lock: Box::new(self.clone()),
            confirmation: Box::new(confirmation),
            notices: Box::new(self.clone()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    /// Take everything recorded so far.
    pub fn drain(&self) -> Vec<Event> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.log.borrow().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }
}

impl PresentationSink for EventRecorder {
    fn on_event_changed(&mut self, display: &DisplayData) {
        self.push(Event::EventChanged {
            display: display.clone(),
            at: Utc::now(),
        });
    }

    fn on_tick(&mut self, seconds_left: u32) {
        self.push(Event::Tick {
            seconds_left,
            formatted: format_time(seconds_left),
            at: Utc::now(),
        });
    }

    fn on_progress(&mut self, completed: usize, total: usize) {
        self.push(Event::Progress {
            completed,
            total,
            at: Utc::now(),
        });
    }

    fn on_navigation_state(&mut self, can_go_prev: bool, done_visible: bool) {
        self.push(Event::Navigation {
            can_go_prev,
            done_visible,
            at: Utc::now(),
        });
    }

    fn on_screen_transition(&mut self, target: Screen) {
        self.push(Event::Screen {
            target,
            at: Utc::now(),
        });
    }

    fn on_pause_state(&mut self, paused: bool) {
        self.push(Event::PauseState {
            paused,
            at: Utc::now(),
        });
    }
}

impl CueSink for EventRecorder {
    fn play_countdown_cue(&mut self) -> Result<(), CueError> {
        if self.fail_cues {
            return Err(CueError("audio device unavailable".into()));
        }
        self.push(Event::CountdownCue { at: Utc::now() });
        Ok(())
    }

    fn play_task_start_cue(&mut self) -> Result<(), CueError> {
        if self.fail_cues {
            return Err(CueError("audio device unavailable".into()));
        }
        self.push(Event::TaskStartCue { at: Utc::now() });
        Ok(())
    }
}

impl WakeLockSink for EventRecorder {
    fn acquire(&mut self) -> Result<WakeLockHandle, WakeLockError> {
        if self.fail_wake_lock {
            return Err(WakeLockError("request denied".into()));
        }
        let id = self.next_lock.get() + 1;
        self.next_lock.set(id);
        self.push(Event::WakeLockAcquired {
            handle: id,
            at: Utc::now(),
        });
        Ok(WakeLockHandle::new(id))
    }

    fn release(&mut self, handle: WakeLockHandle) {
        self.push(Event::WakeLockReleased {
            handle: handle.id(),
            at: Utc::now(),
        });
    }
}

impl CompletionNoticeSink for EventRecorder {
    fn announce_completion(&mut self, title: &str, message: &str) {
        self.push(Event::WorkoutCompleted {
            title: title.to_string(),
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}
