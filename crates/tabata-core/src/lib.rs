//! # Tabata Core Library
//!
//! Business logic for the Tabata interval-workout timer. Front-ends (the
//! `tabata` CLI, or any other shell) stay thin and drive this crate.
//!
//! ## Architecture
//!
//! - **Workouts**: definitions of sets, prepare/cooldown phases and steps,
//!   and the expansion of a workout into a flat execution queue
//! - **Timer Engine**: a single-timeline state machine that steps through
//!   the queue; the caller fires its tick once per second
//! - **Ports**: presentation, cue, wake-lock, confirmation and completion
//!   boundaries the engine calls into
//! - **Storage**: SQLite workout library and TOML configuration
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`build_execution_queue`]: Workout expansion
//! - [`WorkoutStore`]: Workout library persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;
pub mod workout;

pub use error::{CoreError, StorageError, TimerError, ValidationError};
pub use events::{Event, EventRecorder};
pub use storage::{Backup, Config, WorkoutStore};
pub use timer::{DisplayData, Ports, TimerEngine, TimerStatus, WorkoutLookup};
pub use workout::{
    build_execution_queue, ExecutionEvent, SortKey, StepDefinition, StepType, WorkoutCatalog,
    WorkoutDefinition,
};
