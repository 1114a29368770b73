//! Edit-mode lifecycle: teardown policies, persistence and transitions.

use crate::helpers::{TestElementBuilder, assert_anchor_near, drag, scenario_element};
use spinebox::config::{EditorConfig, TeardownPolicy};
use spinebox::controller::{EditPhase, ElementController, GestureOutcome};
use spinebox::persistence::{JsonFileStore, PositionRecord, PositionStore};
use spinebox::render::{HeadlessTarget, QueuedScheduler};
use spinebox::types::{
    AnchorOrigin, AnchorState, GestureKind, Modifiers, PointerInput, Size, TransformOffset,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn start_drag(ctl: &mut ElementController) {
    ctl.begin(PointerInput::mouse(500.0, 400.0), GestureKind::Move, Modifiers::NONE)
        .unwrap();
    ctl.update(PointerInput::mouse(520.0, 410.0)).unwrap();
}

// ============================================================================
// Teardown policies
// ============================================================================

#[test]
fn test_exit_edit_mode_commits_by_default() {
    let mut el = scenario_element(AnchorOrigin::Center);
    start_drag(&mut el.controller);
    assert_eq!(el.controller.phase(), EditPhase::Editing);

    el.controller.exit_edit_mode();

    assert_eq!(el.controller.phase(), EditPhase::Resting);
    assert!(el.controller.session().is_idle());
    assert!(el.controller.store().is_at_rest());
    assert_anchor_near(el.controller.store().anchor(), AnchorState::new(52.0, 51.25, 120.0, 80.0));
    assert!(el.memory.load("bb-test").unwrap().is_some());
}

#[test]
fn test_teardown_commit_persists_then_resets() {
    let mut el = scenario_element(AnchorOrigin::Center);
    start_drag(&mut el.controller);

    el.controller.teardown();

    let record = el.memory.load("bb-test").unwrap().unwrap();
    assert_anchor_near(record.anchor, AnchorState::new(52.0, 51.25, 120.0, 80.0));
    assert_eq!(record.origin, AnchorOrigin::Center);
    // Store is back at its defaults
    assert_eq!(el.controller.store().anchor(), AnchorState::new(50.0, 50.0, 120.0, 80.0));
    assert!(el.controller.store().is_at_rest());
}

#[test]
fn test_teardown_discard_drops_gesture() {
    let mut el = TestElementBuilder::new()
        .config(EditorConfig {
            teardown: TeardownPolicy::Discard,
            ..EditorConfig::default()
        })
        .build();
    start_drag(&mut el.controller);

    el.controller.teardown();

    assert!(el.memory.is_empty());
    assert!(el.controller.store().is_at_rest());
    assert_eq!(el.controller.store().anchor(), AnchorState::new(50.0, 50.0, 120.0, 80.0));
}

#[test]
fn test_teardown_on_detached_element_discards() {
    let mut el = scenario_element(AnchorOrigin::Center);
    start_drag(&mut el.controller);
    el.target.detach();

    el.controller.teardown();

    assert!(el.memory.is_empty());
    assert!(el.controller.store().is_at_rest());
}

#[test]
fn test_persist_on_commit_can_be_disabled() {
    let mut el = TestElementBuilder::new()
        .config(EditorConfig {
            persist_on_commit: false,
            ..EditorConfig::default()
        })
        .build();

    let outcome = drag(&mut el.controller, (0.0, 0.0), (30.0, 0.0));

    assert!(matches!(outcome, GestureOutcome::Committed { persisted: false, .. }));
    assert!(el.memory.is_empty());
}

// ============================================================================
// Edit phase
// ============================================================================

#[test]
fn test_click_returns_to_resting() {
    let mut el = scenario_element(AnchorOrigin::Center);
    el.controller
        .begin(PointerInput::mouse(500.0, 400.0), GestureKind::Move, Modifiers::NONE)
        .unwrap();
    assert_eq!(el.controller.phase(), EditPhase::Editing);
    el.controller.update(PointerInput::mouse(501.0, 401.0)).unwrap();

    assert_eq!(el.controller.end().unwrap(), GestureOutcome::Click);
    assert_eq!(el.controller.phase(), EditPhase::Resting);
    assert!(el.controller.session().is_idle());
    assert_eq!(el.controller.store().transform(), TransformOffset::IDENTITY);
}

#[test]
fn test_cancel_returns_to_resting() {
    let mut el = scenario_element(AnchorOrigin::Center);
    el.controller
        .begin(PointerInput::mouse(500.0, 400.0), GestureKind::Move, Modifiers::NONE)
        .unwrap();
    el.controller.update(PointerInput::mouse(540.0, 400.0)).unwrap();

    el.controller.cancel();

    assert_eq!(el.controller.phase(), EditPhase::Resting);
    assert!(el.controller.session().is_idle());
    assert_eq!(el.controller.store().transform(), TransformOffset::IDENTITY);
    assert_eq!(el.controller.store().anchor(), AnchorState::new(50.0, 50.0, 120.0, 80.0));
    assert!(el.memory.is_empty());
}

#[test]
fn test_tiny_animated_offset_settles_to_exact_identity() {
    let mut el = scenario_element(AnchorOrigin::Center);

    el.controller.animate_to(TransformOffset::translate(5e-10, 0.0)).unwrap();
    let outcome = el.controller.commit().unwrap();
    assert!(!outcome.changed);
    assert_eq!(el.controller.store().transform(), TransformOffset::IDENTITY);

    el.controller.animate_to(TransformOffset::translate(0.0, 5e-10)).unwrap();
    el.controller.discard().unwrap();
    assert_eq!(el.controller.store().transform(), TransformOffset::IDENTITY);
    assert_eq!(el.controller.store().anchor(), AnchorState::new(50.0, 50.0, 120.0, 80.0));
}

// ============================================================================
// Persistence round trips
// ============================================================================

#[test]
fn test_restore_from_json_files_across_sessions() {
    let dir = tempdir().unwrap();
    let files = Arc::new(JsonFileStore::new(dir.path()));
    let config = EditorConfig {
        origin: AnchorOrigin::TopLeft,
        ..EditorConfig::default()
    };

    let committed = {
        let target = HeadlessTarget::new(Size::new(1000.0, 800.0));
        let mut first = ElementController::builder(Box::new(target))
            .node_id("bb-hero")
            .config(config.clone())
            .persistence(files.clone())
            .build();
        let outcome = drag(&mut first, (0.0, 0.0), (123.0, 45.0));
        assert!(matches!(outcome, GestureOutcome::Committed { persisted: true, .. }));
        first.store().anchor()
    };
    assert!(dir.path().join("bb-position-bb-hero.json").exists());

    let target = HeadlessTarget::new(Size::new(1000.0, 800.0));
    let mut second = ElementController::builder(Box::new(target))
        .node_id("bb-hero")
        .config(config)
        .persistence(files)
        .build();
    assert_eq!(second.store().anchor(), AnchorState::default());

    assert!(second.restore().unwrap());
    assert_anchor_near(second.store().anchor(), committed);
}

#[test]
fn test_restore_without_record_keeps_defaults() {
    let mut el = scenario_element(AnchorOrigin::Center);
    assert!(!el.controller.restore().unwrap());
    assert_eq!(el.controller.store().anchor(), AnchorState::new(50.0, 50.0, 120.0, 80.0));
}

#[test]
fn test_restore_never_brings_back_a_transform() {
    let mut el = scenario_element(AnchorOrigin::Center);
    el.memory
        .save(&PositionRecord::new("bb-test", AnchorState::new(10.0, 20.0, 30.0, 40.0), AnchorOrigin::Center))
        .unwrap();
    el.controller.animate_to(TransformOffset::translate(50.0, 50.0)).unwrap();

    el.controller.restore().unwrap();

    assert_eq!(el.controller.store().anchor(), AnchorState::new(10.0, 20.0, 30.0, 40.0));
    assert!(el.controller.store().is_at_rest());
}

// ============================================================================
// Animated transforms
// ============================================================================

#[test]
fn test_animated_transform_reset_through_scheduler() {
    let target = HeadlessTarget::new(Size::new(1000.0, 800.0));
    let scheduler = QueuedScheduler::new();
    let mut ctl = ElementController::builder(Box::new(target.clone()))
        .node_id("bb-anim")
        .config(EditorConfig {
            default_anchor: AnchorState::new(50.0, 50.0, 120.0, 80.0),
            ..EditorConfig::default()
        })
        .scheduler(Box::new(scheduler.clone()))
        .build();

    ctl.animate_to(TransformOffset::translate(100.0, 0.0)).unwrap();
    assert_eq!(target.state().transition, Some(Duration::from_millis(300)));
    ctl.animate_to(TransformOffset::translate(200.0, 0.0)).unwrap();

    let pending = scheduler.take_pending();
    assert_eq!(pending.len(), 2);
    assert!(pending.iter().all(|(delay, _)| *delay == Duration::from_millis(350)));

    // The superseded reset must not cut the newer transition short
    assert!(!ctl.finish_transition(pending[0].1));
    assert!(target.state().transition.is_some());
    assert!(ctl.finish_transition(pending[1].1));
    assert_eq!(target.state().transition, None);

    let outcome = ctl.commit().unwrap();
    assert_anchor_near(outcome.anchor, AnchorState::new(70.0, 50.0, 120.0, 80.0));
}

#[test]
fn test_configured_transition_timing() {
    let target = HeadlessTarget::new(Size::new(1000.0, 800.0));
    let scheduler = QueuedScheduler::new();
    let mut ctl = ElementController::builder(Box::new(target.clone()))
        .config(EditorConfig {
            transition_ms: 120,
            transition_reset_ms: 150,
            ..EditorConfig::default()
        })
        .scheduler(Box::new(scheduler.clone()))
        .build();

    ctl.animate_to(TransformOffset::translate(1.0, 0.0)).unwrap();

    assert_eq!(target.state().transition, Some(Duration::from_millis(120)));
    assert_eq!(scheduler.take_pending()[0].0, Duration::from_millis(150));
}

#[test]
fn test_gesture_writes_are_instant() {
    let target = HeadlessTarget::new(Size::new(1000.0, 800.0));
    let mut ctl = ElementController::builder(Box::new(target.clone())).build();
    ctl.animate_to(TransformOffset::translate(10.0, 0.0)).unwrap();

    // begin folds the animated offset, then pointer moves write without transition
    drag(&mut ctl, (0.0, 0.0), (25.0, 0.0));

    assert_eq!(target.state().transition, None);
}
