//! Pointer input integration tests: mouse latching, dispatch and buttons.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use breakoutengine::assets::FileFetcher;
use breakoutengine::components::Button;
use breakoutengine::engine::{Engine, EngineContext};
use breakoutengine::events::mouse::{ListenerContext, MouseCallback, MouseEvent};
use breakoutengine::math::Vector2;
use breakoutengine::scene::{EntityId, Scene, SceneId, SceneManager};

fn engine() -> Engine {
    let context = EngineContext::new(640, 480, Arc::new(FileFetcher::new(".")));
    Engine::new(context, 30)
}

/// Add a scene with one 100x50 button at (200, 200) counting its clicks.
fn button_scene(engine: &mut Engine) -> (SceneId, EntityId, Rc<Cell<u32>>) {
    let clicks = Rc::new(Cell::new(0));
    let mut scene = Scene::new(engine.context());
    let id = scene.spawn(200.0, 200.0);
    let counter = Rc::clone(&clicks);
    let button = Button::new(engine.context(), 100.0, 50.0)
        .with_on_click(move |_scenes: &mut SceneManager| counter.set(counter.get() + 1));
    assert!(scene.attach(id, button));
    let scene_id = scene.id();
    engine.add_scene(scene);
    (scene_id, id, clicks)
}

// =============================================================================
// Mouse
// =============================================================================

#[test]
fn mouse_latches_state_before_dispatch() {
    let mut engine = engine();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let callback: MouseCallback = Rc::new(
        move |_ctx: &ListenerContext, position: &Vector2, _scenes: &mut SceneManager| {
            sink.borrow_mut().push(*position);
        },
    );
    let events = engine.input().mouse_events();
    events.add_event_listener(MouseEvent::MOUSE_DOWN, Rc::clone(&callback), ListenerContext::Global);
    events.add_event_listener(MouseEvent::MOUSE_UP, Rc::clone(&callback), ListenerContext::Global);

    engine.pointer_down(10.0, 20.0);
    assert!(engine.input().mouse.is_down);
    assert_eq!(engine.input().mouse.position, Vector2::new(10.0, 20.0));

    engine.pointer_move(30.0, 40.0);
    assert_eq!(engine.input().mouse.position, Vector2::new(30.0, 40.0));

    engine.pointer_up(50.0, 60.0);
    assert!(!engine.input().mouse.is_down);

    assert_eq!(
        *seen.borrow(),
        vec![Vector2::new(10.0, 20.0), Vector2::new(50.0, 60.0)]
    );
}

#[test]
fn removed_listener_stops_receiving_events() {
    let mut engine = engine();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    let callback: MouseCallback = Rc::new(
        move |_ctx: &ListenerContext, _position: &Vector2, _scenes: &mut SceneManager| {
            counter.set(counter.get() + 1);
        },
    );
    let events = engine.input().mouse_events();
    events.add_event_listener(MouseEvent::MOUSE_MOVE, Rc::clone(&callback), ListenerContext::Global);

    engine.pointer_move(1.0, 1.0);
    assert_eq!(
        events.remove_event_listener(MouseEvent::MOUSE_DOWN, &callback, &ListenerContext::Global),
        0,
        "event name must match"
    );
    assert_eq!(
        events.remove_event_listener(MouseEvent::MOUSE_MOVE, &callback, &ListenerContext::Global),
        1
    );
    engine.pointer_move(2.0, 2.0);
    assert_eq!(hits.get(), 1);
}

// =============================================================================
// Button
// =============================================================================

#[test]
fn button_fires_inside_box_only() {
    let mut engine = engine();
    let (_, _, clicks) = button_scene(&mut engine);

    engine.pointer_down(200.0, 200.0);
    assert_eq!(clicks.get(), 1);

    engine.pointer_down(260.0, 200.0);
    assert_eq!(clicks.get(), 1);

    // Edges are inside.
    engine.pointer_down(150.0, 175.0);
    assert_eq!(clicks.get(), 2);

    // Move and up never click.
    engine.pointer_move(200.0, 200.0);
    engine.pointer_up(200.0, 200.0);
    assert_eq!(clicks.get(), 2);
}

#[test]
fn button_follows_parent_transform_but_not_rotation() {
    let mut engine = engine();
    let (scene_id, button, clicks) = button_scene(&mut engine);

    {
        let scene = engine.scenes_mut().scene_mut(scene_id).unwrap();
        let parent = scene.spawn(100.0, 0.0);
        scene.set_local_scale(parent, Vector2::new(2.0, 1.0));
        scene.add_child(parent, button);
        scene.set_local_rotation(button, 90.0);
    }
    // World position (100 + 200*2, 200) = (500, 200); box 200x50 around it.
    engine.pointer_down(200.0, 200.0);
    assert_eq!(clicks.get(), 0);
    engine.pointer_down(595.0, 200.0);
    assert_eq!(clicks.get(), 1);
    // A 90 degree turn would make the box 50 wide; rotation is ignored.
    engine.pointer_down(500.0, 224.0);
    assert_eq!(clicks.get(), 2);
}

#[test]
fn destroyed_button_unsubscribes() {
    let mut engine = engine();
    let (scene_id, button, clicks) = button_scene(&mut engine);
    let events = engine.input().mouse_events();
    assert_eq!(events.listeners_for(MouseEvent::MOUSE_DOWN), 1);

    engine
        .scenes_mut()
        .scene_mut(scene_id)
        .unwrap()
        .destroy_entity(button);
    assert_eq!(events.listeners_for(MouseEvent::MOUSE_DOWN), 0);

    engine.pointer_down(200.0, 200.0);
    assert_eq!(clicks.get(), 0);
}

#[test]
fn dropped_scene_unsubscribes_its_buttons() {
    let engine = engine();
    let events = engine.input().mouse_events();
    {
        let mut scene = Scene::new(engine.context());
        let id = scene.spawn(10.0, 10.0);
        assert!(scene.attach(id, Button::new(engine.context(), 20.0, 20.0)));
        assert_eq!(events.listeners_for(MouseEvent::MOUSE_DOWN), 1);
    }
    assert_eq!(events.listener_count(), 0);
}

#[test]
fn click_handler_can_remove_its_own_scene() {
    let mut engine = engine();
    let mut scene = Scene::new(engine.context());
    let scene_id = scene.id();
    let id = scene.spawn(50.0, 50.0);
    let button = Button::new(engine.context(), 20.0, 20.0)
        .with_on_click(move |scenes: &mut SceneManager| {
            scenes.remove(scene_id);
        });
    scene.attach(id, button);
    engine.add_scene(scene);

    engine.pointer_down(50.0, 50.0);
    assert!(engine.scenes().scene(scene_id).unwrap().is_destroyed());
    assert_eq!(engine.input().mouse_events().listener_count(), 0);

    engine.update(0.016);
    assert!(!engine.scenes().contains(scene_id));
}
