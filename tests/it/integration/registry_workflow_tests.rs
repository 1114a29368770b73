//! Multi-element editing through the registry.

use spinebox::config::EditorConfig;
use spinebox::controller::{ElementController, GestureOutcome};
use spinebox::persistence::{MemoryStore, PositionStore};
use spinebox::registry::ElementRegistry;
use spinebox::render::HeadlessTarget;
use spinebox::types::{
    AnchorOrigin, AnchorState, GestureKind, Modifiers, Point, PointerInput, ResizeHandle, Size,
};
use std::sync::Arc;

fn board(memory: &MemoryStore) -> (ElementRegistry, Vec<u64>) {
    let mut registry = ElementRegistry::new();
    let anchors = [
        AnchorState::new(10.0, 10.0, 100.0, 100.0),
        AnchorState::new(50.0, 50.0, 100.0, 100.0),
        AnchorState::new(12.0, 12.0, 100.0, 100.0),
    ];
    let ids = anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            let controller = ElementController::builder(Box::new(HeadlessTarget::new(Size::new(1000.0, 800.0))))
                .node_id(format!("bb-{i}"))
                .config(EditorConfig {
                    origin: AnchorOrigin::TopLeft,
                    default_anchor: *anchor,
                    ..EditorConfig::default()
                })
                .persistence(Arc::new(memory.clone()))
                .build();
            registry.insert(controller)
        })
        .collect();
    (registry, ids)
}

#[test]
fn test_overlapping_elements_route_to_topmost() {
    let memory = MemoryStore::new();
    let (mut registry, ids) = board(&memory);

    // Elements 0 (100..200, 80..180) and 2 (120..220, 96..196) overlap here
    let pointer = PointerInput::mouse(150.0, 150.0);
    assert_eq!(registry.pointer_down(pointer, GestureKind::Move, Modifiers::NONE), Some(ids[2]));
    registry.pointer_move(PointerInput::mouse(250.0, 150.0));
    let (id, outcome) = registry.pointer_up(None).unwrap();

    assert_eq!(id, ids[2]);
    assert!(matches!(outcome, GestureOutcome::Committed { persisted: true, .. }));
    assert!(memory.load("bb-2").unwrap().is_some());
    assert!(memory.load("bb-0").unwrap().is_none());

    // The moved element left the overlap, so the one below is now on top there
    assert_eq!(registry.hit_test(Point::new(150.0, 150.0)), Some(ids[0]));
}

#[test]
fn test_resize_updates_hit_box() {
    let memory = MemoryStore::new();
    let (mut registry, ids) = board(&memory);

    registry.pointer_down(
        PointerInput::mouse(550.0, 450.0),
        GestureKind::Resize(ResizeHandle::SE),
        Modifiers::NONE,
    );
    registry.pointer_move(PointerInput::mouse(650.0, 550.0));
    registry.pointer_up(None);

    assert_eq!(registry.hit_test(Point::new(690.0, 590.0)), Some(ids[1]));
}

#[test]
fn test_pointer_cancel_restores_element() {
    let memory = MemoryStore::new();
    let (mut registry, ids) = board(&memory);

    registry.pointer_down(PointerInput::touch(7, 550.0, 450.0), GestureKind::Move, Modifiers::NONE);
    registry.pointer_move(PointerInput::touch(7, 700.0, 450.0));
    registry.pointer_cancel(Some(7));

    let element = registry.get(ids[1]).unwrap();
    assert!(element.store().is_at_rest());
    assert_eq!(element.store().anchor(), AnchorState::new(50.0, 50.0, 100.0, 100.0));
    assert_eq!(registry.active_element(Some(7)), None);
    assert!(memory.is_empty());
}

#[test]
fn test_modifier_change_reaches_active_gesture() {
    let memory = MemoryStore::new();
    let (mut registry, ids) = board(&memory);

    registry.pointer_down(
        PointerInput::mouse(550.0, 450.0),
        GestureKind::Resize(ResizeHandle::E),
        Modifiers::NONE,
    );
    registry.pointer_move(PointerInput::mouse(600.0, 450.0));
    registry.modifiers_changed(Modifiers::shift());

    let rect = registry.get(ids[1]).unwrap().unified_position().unwrap().rect();
    assert_eq!((rect.width, rect.height), (150.0, 150.0));
}

#[test]
fn test_exit_edit_mode_settles_all_elements() {
    let memory = MemoryStore::new();
    let (mut registry, ids) = board(&memory);

    registry.pointer_down(PointerInput::touch(1, 150.0, 150.0), GestureKind::Move, Modifiers::NONE);
    registry.pointer_move(PointerInput::touch(1, 160.0, 150.0));

    registry.exit_edit_mode();

    assert!(ids.iter().all(|id| registry.get(*id).unwrap().store().is_at_rest()));
    assert!(memory.load("bb-2").unwrap().is_some());
    assert_eq!(registry.active_element(Some(1)), None);
}

#[test]
fn test_remove_applies_teardown() {
    let memory = MemoryStore::new();
    let (mut registry, ids) = board(&memory);

    registry.pointer_down(PointerInput::mouse(550.0, 450.0), GestureKind::Move, Modifiers::NONE);
    registry.pointer_move(PointerInput::mouse(580.0, 450.0));

    let removed = registry.remove(ids[1]).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(removed.session().is_idle());
    assert!(memory.load("bb-1").unwrap().is_some());
    assert_eq!(registry.active_element(None), None);
}
