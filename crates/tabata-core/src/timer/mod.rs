mod display;
mod engine;
mod ports;
mod ticker;

pub use display::{format_time, DisplayData, EventCategory, UpNext};
pub use engine::{
    TimerEngine, TimerStatus, COMPLETE_MESSAGE, COMPLETE_TITLE, QUIT_MESSAGE, QUIT_TITLE,
};
pub use ports::{
    CompletionNoticeSink, ConfirmationSink, CueSink, FixedConfirmation, NoWakeLock, Ports,
    PresentationSink, Screen, WakeLockHandle, WakeLockSink, WorkoutLookup,
};
pub use ticker::{TickHandle, Ticker, TICK_INTERVAL};
