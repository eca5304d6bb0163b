mod catalog;
mod definition;
mod queue;

pub use catalog::{SortKey, WorkoutCatalog};
pub use definition::{Color, StepDefinition, StepType, WorkoutDefinition};
pub use queue::{build_execution_queue, EventKind, ExecutionEvent};
