//! Integration tests for the timer engine, driven through recording ports.

use std::sync::Arc;

use tabata_core::timer::{FixedConfirmation, Screen, UpNext};
use tabata_core::workout::Color;
use tabata_core::{
    Event, EventRecorder, StepDefinition, StepType, TimerEngine, TimerError, TimerStatus,
    WorkoutCatalog, WorkoutDefinition,
};

fn step(name: &str, step_type: StepType, duration: u32) -> StepDefinition {
    StepDefinition {
        id: format!("s-{name}"),
        step_type,
        name: name.into(),
        description: String::new(),
        duration,
        reps: 0,
        media: None,
    }
}

fn workout(prepare: u32, sets: u32, cooldown: u32, steps: Vec<StepDefinition>) -> WorkoutDefinition {
    WorkoutDefinition {
        id: "w-test".into(),
        title: "Test Workout".into(),
        description: String::new(),
        color: Color::Blue,
        prepare,
        prepare_media: None,
        sets,
        cooldown,
        cooldown_media: None,
        steps,
        is_favorite: false,
        created_at: 0,
    }
}

fn tabata() -> Arc<WorkoutDefinition> {
    Arc::new(workout(
        5,
        2,
        10,
        vec![
            step("Sprint", StepType::Work, 4),
            step("Walk", StepType::Rest, 3),
        ],
    ))
}

fn engine_with(recorder: &EventRecorder, confirm: bool) -> TimerEngine {
    TimerEngine::new(recorder.ports(FixedConfirmation(confirm)))
}

fn is_completed(e: &Event) -> bool {
    matches!(e, Event::WorkoutCompleted { .. })
}

fn is_event_changed(e: &Event) -> bool {
    matches!(e, Event::EventChanged { .. })
}

fn displays(recorder: &EventRecorder) -> Vec<tabata_core::DisplayData> {
    recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::EventChanged { display, .. } => Some(display),
            _ => None,
        })
        .collect()
}

/// Tick until the current event changes or the run stops.
fn run_out_current_event(engine: &mut TimerEngine) {
    let index = engine.current_index();
    while engine.status() == TimerStatus::Running && engine.current_index() == index {
        assert!(engine.tick_handle().is_some(), "timed event should be ticking");
        engine.tick();
    }
}

#[test]
fn start_resolves_workout_through_lookup() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    let catalog = WorkoutCatalog::new(vec![(*tabata()).clone()]);

    engine.start(&catalog, "w-test").unwrap();
    assert_eq!(engine.status(), TimerStatus::Running);
    assert_eq!(engine.queue().len(), 1 + 4 + 1);
    assert!(recorder
        .events()
        .iter()
        .any(|e| matches!(e, Event::Screen { target: Screen::Timer, .. })));
}

#[test]
fn start_with_unknown_id_is_a_reported_noop() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    let catalog = WorkoutCatalog::default();

    let err = engine.start(&catalog, "missing").unwrap_err();
    assert_eq!(err, TimerError::WorkoutNotFound { id: "missing".into() });
    assert_eq!(engine.status(), TimerStatus::Stopped);
    assert!(recorder.events().is_empty());
}

#[test]
fn run_next_step_reaches_finish_exactly_once() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    let len = engine.queue().len();

    // start() already advanced once; len more calls run off the end.
    for _ in 0..len {
        engine.run_next_step();
    }
    assert_eq!(engine.status(), TimerStatus::Stopped);
    assert_eq!(recorder.count(is_completed), 1);

    for _ in 0..3 {
        engine.run_next_step();
        engine.skip();
        engine.tick();
        assert_eq!(engine.status(), TimerStatus::Stopped);
    }
    assert_eq!(recorder.count(is_completed), 1);
    assert!(recorder
        .events()
        .last()
        .is_some_and(|e| matches!(e, Event::Screen { target: Screen::Home, .. })));
}

#[test]
fn tick_reaching_zero_advances_exactly_once() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    let changes = recorder.count(is_event_changed);

    for _ in 0..4 {
        engine.tick();
    }
    assert_eq!(engine.current_index(), 0);
    engine.tick();
    assert_eq!(engine.current_index(), 1);
    assert_eq!(recorder.count(is_event_changed), changes + 1);
    assert_eq!(engine.time_left(), 4);
}

#[test]
fn countdown_cue_fires_at_three_two_one() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(Arc::new(workout(
        0,
        1,
        0,
        vec![step("Hold", StepType::Work, 6)],
    )));

    run_out_current_event(&mut engine);

    let mut cue_at = Vec::new();
    let mut last_tick = None;
    for event in recorder.events() {
        match event {
            Event::Tick { seconds_left, .. } => last_tick = Some(seconds_left),
            Event::CountdownCue { .. } => cue_at.push(last_tick.unwrap()),
            _ => {}
        }
    }
    assert_eq!(cue_at, vec![3, 2, 1]);
}

#[test]
fn manual_events_never_count_down() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(Arc::new(workout(
        0,
        1,
        0,
        vec![step("Max pushups", StepType::Work, 0)],
    )));

    assert!(engine.tick_handle().is_none());
    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.current_index(), 0);
    assert_eq!(recorder.count(|e| matches!(e, Event::CountdownCue { .. })), 0);
    assert_eq!(recorder.count(|e| matches!(e, Event::Tick { .. })), 0);
}

#[test]
fn single_manual_step_shows_done_then_finishes() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(Arc::new(workout(
        0,
        1,
        0,
        vec![step("Stretch", StepType::Rest, 0)],
    )));

    assert!(recorder.events().iter().any(|e| matches!(
        e,
        Event::Navigation {
            can_go_prev: false,
            done_visible: true,
            ..
        }
    )));
    assert!(engine.tick_handle().is_none());

    engine.run_next_step();
    assert_eq!(engine.status(), TimerStatus::Stopped);
    assert_eq!(recorder.count(is_completed), 1);
}

#[test]
fn task_start_cue_skips_only_the_first_event() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    let len = engine.queue().len();

    assert_eq!(recorder.count(|e| matches!(e, Event::TaskStartCue { .. })), 0);
    while engine.status() == TimerStatus::Running {
        run_out_current_event(&mut engine);
    }
    assert_eq!(
        recorder.count(|e| matches!(e, Event::TaskStartCue { .. })),
        len - 1
    );
    // Countdown cues: 3 per event of at least 4s, 2 for the 3s rest.
    // prepare(5) + sprint(4) + walk(3) + cooldown(10) + sprint(4) + walk(3)
    assert_eq!(
        recorder.count(|e| matches!(e, Event::CountdownCue { .. })),
        3 + 3 + 2 + 3 + 3 + 2
    );
}

#[test]
fn prev_from_second_event_replays_first() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    let first = displays(&recorder)[0].clone();

    engine.skip();
    assert_eq!(engine.current_index(), 1);
    engine.prev();
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.time_left(), 5);

    let shown = displays(&recorder);
    assert_eq!(shown.last(), Some(&first));
    assert_eq!(first.up_next, UpNext::Next { name: "Sprint".into() });
}

#[test]
fn prev_at_first_event_does_nothing() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    recorder.clear();

    engine.prev();
    assert_eq!(engine.current_index(), 0);
    assert!(recorder.events().is_empty());
}

#[test]
fn pause_resume_twice_keeps_time_left() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    engine.tick();
    let left = engine.time_left();

    engine.pause_resume();
    assert_eq!(engine.status(), TimerStatus::Paused);
    assert!(!engine.is_wake_locked());
    for _ in 0..5 {
        engine.tick();
    }
    engine.pause_resume();

    assert_eq!(engine.status(), TimerStatus::Running);
    assert_eq!(engine.time_left(), left);
    assert!(engine.tick_handle().is_some());
    assert!(engine.is_wake_locked());
}

#[test]
fn resuming_a_manual_event_does_not_tick() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(Arc::new(workout(
        0,
        1,
        0,
        vec![step("Plank", StepType::Work, 0), step("Rest", StepType::Rest, 5)],
    )));
    engine.pause_resume();
    engine.pause_resume();
    assert_eq!(engine.status(), TimerStatus::Running);
    assert!(engine.tick_handle().is_none());
}

#[test]
fn skip_while_paused_resumes_and_advances() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    engine.pause_resume();

    engine.skip();
    assert_eq!(engine.status(), TimerStatus::Running);
    assert_eq!(engine.current_index(), 1);
    assert_eq!(engine.time_left(), 4);
    assert!(engine.tick_handle().is_some());
    assert!(engine.is_wake_locked());
}

#[tokio::test]
async fn declined_quit_changes_nothing() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, false);
    engine.start_workout(tabata());
    engine.skip();
    let handle = engine.tick_handle();

    assert!(!engine.quit().await);
    assert_eq!(engine.status(), TimerStatus::Running);
    assert_eq!(engine.current_index(), 1);
    assert_eq!(engine.tick_handle(), handle);
}

#[tokio::test]
async fn confirmed_quit_stops_without_completion_notice() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    let stale = engine.tick_handle().unwrap();

    assert!(engine.quit().await);
    assert_eq!(engine.status(), TimerStatus::Stopped);
    assert!(!engine.is_wake_locked());
    assert!(engine.queue().is_empty());
    assert_eq!(recorder.count(is_completed), 0);

    recorder.clear();
    engine.fire(stale);
    assert!(recorder.events().is_empty());
}

#[test]
fn empty_queue_finishes_immediately() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(Arc::new(workout(0, 1, 0, vec![])));
    assert_eq!(engine.status(), TimerStatus::Stopped);
    assert_eq!(recorder.count(is_completed), 1);
}

#[test]
fn wake_lock_failure_is_not_fatal() {
    let recorder = EventRecorder::new().with_failing_wake_lock();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    assert_eq!(engine.status(), TimerStatus::Running);
    assert!(!engine.is_wake_locked());
    engine.tick();
    assert_eq!(engine.time_left(), 4);
}

#[test]
fn cue_failure_is_not_fatal() {
    let recorder = EventRecorder::new().with_failing_cues();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    while engine.status() == TimerStatus::Running {
        run_out_current_event(&mut engine);
    }
    assert_eq!(recorder.count(is_completed), 1);
}

#[test]
fn wake_lock_is_held_only_while_running() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    engine.pause_resume();
    engine.pause_resume();
    while engine.status() == TimerStatus::Running {
        engine.run_next_step();
    }

    let acquired = recorder.count(|e| matches!(e, Event::WakeLockAcquired { .. }));
    let released = recorder.count(|e| matches!(e, Event::WakeLockReleased { .. }));
    assert_eq!(acquired, 2);
    assert_eq!(released, 2);
}

#[test]
fn restarting_discards_previous_run() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    engine.skip();
    engine.skip();
    let old = engine.tick_handle().unwrap();

    engine.start_workout(tabata());
    assert_eq!(engine.current_index(), 0);
    assert_eq!(engine.time_left(), 5);
    assert_ne!(engine.tick_handle(), Some(old));
    assert_eq!(
        recorder.count(|e| matches!(e, Event::WakeLockAcquired { .. })),
        recorder.count(|e| matches!(e, Event::WakeLockReleased { .. })) + 1
    );
}

#[test]
fn progress_counts_completed_events() {
    let recorder = EventRecorder::new();
    let mut engine = engine_with(&recorder, true);
    engine.start_workout(tabata());
    engine.skip();
    engine.skip();
    assert_eq!(engine.progress(), (2, 6));

    let last = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::Progress { completed, total, .. } => Some((completed, total)),
            _ => None,
        })
        .last();
    assert_eq!(last, Some((2, 6)));
}
