//! The engine's single repeating tick.
//!
//! A handle is armed whenever a timed event starts or resumes and cancelled
//! before any transition. Hosts fire the live handle once per
//! [`TICK_INTERVAL`]; firing a handle that has since been cancelled does
//! nothing, so a late callback can never double-decrement.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickHandle(u64);

#[derive(Debug, Default)]
pub struct Ticker {
    next_id: u64,
    live: Option<TickHandle>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a fresh handle, replacing any live one.
    pub fn arm(&mut self) -> TickHandle {
        self.cancel();
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.live = Some(handle);
        handle
    }

    /// Cancel the live handle. Returns whether one was live.
    pub fn cancel(&mut self) -> bool {
        self.live.take().is_some()
    }

    pub fn live(&self) -> Option<TickHandle> {
        self.live
    }

    pub fn is_live(&self, handle: TickHandle) -> bool {
        self.live == Some(handle)
    }
}
