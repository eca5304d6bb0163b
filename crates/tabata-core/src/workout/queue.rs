//! Expansion of a workout into the flat sequence the timer walks through.

use serde::{Deserialize, Serialize};

use super::definition::WorkoutDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventKind {
    Prepare,
    Step { step_index: usize },
    Cooldown,
}

/// One scheduled phase of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    #[serde(flatten)]
    pub kind: EventKind,
    /// 1-based set number. `None` for the prepare phase.
    pub set: Option<u32>,
}

impl ExecutionEvent {
    pub fn prepare() -> Self {
        Self {
            kind: EventKind::Prepare,
            set: None,
        }
    }

    pub fn step(set: u32, step_index: usize) -> Self {
        Self {
            kind: EventKind::Step { step_index },
            set: Some(set),
        }
    }

    pub fn cooldown(set: u32) -> Self {
        Self {
            kind: EventKind::Cooldown,
            set: Some(set),
        }
    }
}

/// Build the execution queue for one run of `workout`.
///
/// Zero-length prepare and cooldown phases produce no event, and no cooldown
/// follows the last set. The caller validates the workout first; an invalid
/// one yields a short or empty queue, which the timer treats as finished.
pub fn build_execution_queue(workout: &WorkoutDefinition) -> Vec<ExecutionEvent> {
    let mut queue = Vec::with_capacity(expected_len(workout));
    if workout.prepare > 0 {
        queue.push(ExecutionEvent::prepare());
    }
    for s in 0..workout.sets {
        let set = s + 1;
        queue.extend((0..workout.steps.len()).map(|i| ExecutionEvent::step(set, i)));
        if set < workout.sets && workout.cooldown > 0 {
            queue.push(ExecutionEvent::cooldown(set));
        }
    }
    queue
}

fn expected_len(workout: &WorkoutDefinition) -> usize {
    let sets = workout.sets as usize;
    usize::from(workout.prepare > 0)
        + sets * workout.steps.len()
        + sets.saturating_sub(1) * usize::from(workout.cooldown > 0)
}
