//! What the presentation layer shows for the active event.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workout::{EventKind, ExecutionEvent, StepType, WorkoutDefinition};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Prepare,
    Cooldown,
    Step(StepType),
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCategory::Prepare => f.write_str("Prepare"),
            EventCategory::Cooldown => f.write_str("Cooldown"),
            EventCategory::Step(step_type) => write!(f, "{step_type}"),
        }
    }
}

/// Lookahead shown under the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpNext {
    Next { name: String },
    FinalStep,
}

impl fmt::Display for UpNext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpNext::Next { name } => write!(f, "Up Next: {name}"),
            UpNext::FinalStep => f.write_str("Final step!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayData {
    pub category: EventCategory,
    pub name: String,
    pub description: String,
    pub reps: u32,
    /// Seconds; 0 for a manual event.
    pub duration: u32,
    pub media: Option<String>,
    pub set: Option<u32>,
    pub total_sets: u32,
    pub step_index: Option<usize>,
    pub up_next: UpNext,
}

impl DisplayData {
    /// Resolve what to show for `event`, given the event after it.
    pub(crate) fn resolve(
        workout: &WorkoutDefinition,
        event: &ExecutionEvent,
        next: Option<&ExecutionEvent>,
    ) -> Self {
        let up_next = match next {
            Some(next) => UpNext::Next {
                name: event_name(workout, next),
            },
            None => UpNext::FinalStep,
        };

        let mut data = match event.kind {
            EventKind::Prepare => Self::phase(
                EventCategory::Prepare,
                workout,
                workout.prepare,
                workout.prepare_media.clone(),
            ),
            EventKind::Cooldown => Self::phase(
                EventCategory::Cooldown,
                workout,
                workout.cooldown,
                workout.cooldown_media.clone(),
            ),
            EventKind::Step { step_index } => match workout.steps.get(step_index) {
                Some(step) => Self {
                    category: EventCategory::Step(step.step_type.clone()),
                    name: step.name.clone(),
                    description: step.description.clone(),
                    reps: step.reps,
                    duration: step.duration,
                    media: step.media.clone(),
                    set: None,
                    total_sets: 0,
                    step_index: Some(step_index),
                    up_next: UpNext::FinalStep,
                },
                // The queue is built from this same workout, so this only
                // happens if the caller mutated it mid-run.
                None => Self::phase(
                    EventCategory::Step(StepType::Work),
                    workout,
                    0,
                    None,
                ),
            },
        };
        data.set = event.set;
        data.total_sets = workout.sets;
        data.up_next = up_next;
        data
    }

    fn phase(
        category: EventCategory,
        workout: &WorkoutDefinition,
        duration: u32,
        media: Option<String>,
    ) -> Self {
        Self {
            category,
            name: workout.title.clone(),
            description: String::new(),
            reps: 0,
            duration,
            media,
            set: None,
            total_sets: 0,
            step_index: None,
            up_next: UpNext::FinalStep,
        }
    }

    pub fn is_manual(&self) -> bool {
        self.duration == 0
    }

    /// `"12 Reps"`, or nothing when reps are zero.
    pub fn reps_label(&self) -> Option<String> {
        (self.reps > 0).then(|| format!("{} Reps", self.reps))
    }

    /// `"Set 2 of 4 • Up Next: Rest"`, or just the lookahead outside a set.
    pub fn progress_text(&self) -> String {
        match self.set {
            Some(set) => format!("Set {set} of {} • {}", self.total_sets, self.up_next),
            None => self.up_next.to_string(),
        }
    }
}

fn event_name(workout: &WorkoutDefinition, event: &ExecutionEvent) -> String {
    match event.kind {
        EventKind::Prepare => EventCategory::Prepare.to_string(),
        EventKind::Cooldown => EventCategory::Cooldown.to_string(),
        EventKind::Step { step_index } => workout
            .steps
            .get(step_index)
            .map(|s| s.name.clone())
            .unwrap_or_default(),
    }
}

/// `MM:SS`, zero padded. Minutes are not wrapped into hours.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
