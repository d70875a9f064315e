//! Engine tick integration tests: update/render passes, destruction and
//! pruning across components, entities and scenes.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use breakoutengine::assets::FileFetcher;
use breakoutengine::components::{Component, ComponentCore, RenderContext, UpdateContext};
use breakoutengine::engine::{Engine, EngineContext};
use breakoutengine::render::{DrawCommand, DrawContext, RecordingCanvas};
use breakoutengine::scene::{EntityId, GameScene, Scene, SceneCommands, SceneManager};

fn context() -> EngineContext {
    EngineContext::new(320, 240, Arc::new(FileFetcher::new(".")))
}

/// Per-component call counters.
#[derive(Default)]
struct Calls {
    updates: Cell<u32>,
    renders: Cell<u32>,
    destroys: Cell<u32>,
}

/// What a [`Probe`] does when updated.
#[derive(Clone, Copy)]
enum Action {
    Nothing,
    DestroyOwner,
    DestroyEntity(EntityId),
    DestroySelf,
}

/// Test component that counts calls and optionally destroys something.
struct Probe {
    core: ComponentCore,
    calls: Rc<Calls>,
    action: Action,
}

impl Probe {
    fn new(calls: &Rc<Calls>, action: Action) -> Self {
        Self {
            core: ComponentCore::new(),
            calls: Rc::clone(calls),
            action,
        }
    }
}

impl Component for Probe {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn update(&mut self, _delta: f32, ctx: &mut UpdateContext<'_>) {
        self.calls.updates.set(self.calls.updates.get() + 1);
        match self.action {
            Action::Nothing => {}
            Action::DestroyOwner => ctx.scene.destroy_entity(ctx.entity),
            Action::DestroyEntity(id) => ctx.scene.destroy_entity(id),
            Action::DestroySelf => self.destroy(),
        }
    }

    fn render(&self, _ctx: &RenderContext<'_>, _surface: &mut dyn DrawContext) {
        self.calls.renders.set(self.calls.renders.get() + 1);
    }

    fn destroy(&mut self) {
        self.calls.destroys.set(self.calls.destroys.get() + 1);
        self.core_mut().destroy();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// =============================================================================
// Entity lifecycle within a scene
// =============================================================================

#[test]
fn entity_destroyed_mid_update_is_gone_by_end_of_pass() {
    let ctx = context();
    let mut scene = Scene::new(&ctx);

    let doomed_calls = Rc::new(Calls::default());
    let child_calls = Rc::new(Calls::default());
    let later_calls = Rc::new(Calls::default());

    let doomed = scene.spawn(0.0, 0.0);
    let child = scene.spawn(0.0, 0.0);
    let later = scene.spawn(0.0, 0.0);
    scene.add_child(doomed, child);
    scene.attach(doomed, Probe::new(&doomed_calls, Action::DestroyOwner));
    scene.attach(doomed, Probe::new(&doomed_calls, Action::Nothing));
    scene.attach(child, Probe::new(&child_calls, Action::Nothing));
    scene.attach(later, Probe::new(&later_calls, Action::Nothing));

    scene.update(0.016);

    assert_eq!(scene.entity_ids(), &[later]);
    assert!(!scene.contains(doomed));
    assert!(!scene.contains(child));
    // Only the first component ran before the entity went away.
    assert_eq!(doomed_calls.updates.get(), 1);
    // Both components of the doomed entity and the child's one, once each.
    assert_eq!(doomed_calls.destroys.get(), 2);
    assert_eq!(child_calls.destroys.get(), 1);
    assert_eq!(child_calls.updates.get(), 0);
    // The rest of the list is still visited.
    assert_eq!(later_calls.updates.get(), 1);
    assert_eq!(later_calls.destroys.get(), 0);
}

#[test]
fn entity_destroyed_behind_cursor_is_swept_in_same_pass() {
    let ctx = context();
    let mut scene = Scene::new(&ctx);
    let calls = Rc::new(Calls::default());

    let first = scene.spawn(0.0, 0.0);
    let second = scene.spawn(0.0, 0.0);
    scene.attach(first, Probe::new(&calls, Action::Nothing));
    scene.attach(second, Probe::new(&calls, Action::DestroyEntity(first)));

    scene.update(0.016);

    assert_eq!(scene.entity_ids(), &[second]);
    assert!(!scene.contains(first));
    assert_eq!(calls.destroys.get(), 1);
}

#[test]
fn render_skips_entities_destroyed_this_frame() {
    let ctx = context();
    let mut scene = Scene::new(&ctx);
    let victim_calls = Rc::new(Calls::default());
    let killer_calls = Rc::new(Calls::default());

    let victim = scene.spawn(0.0, 0.0);
    scene.attach(victim, Probe::new(&victim_calls, Action::Nothing));
    let killer = scene.spawn(0.0, 0.0);
    scene.attach(killer, Probe::new(&killer_calls, Action::Nothing));

    let mut canvas = RecordingCanvas::new();
    scene.render(&mut canvas);
    assert_eq!(victim_calls.renders.get(), 1);

    // Destroyed between update and render: still in the list, never drawn.
    scene.destroy_entity(victim);
    assert_eq!(scene.entity_count(), 2);
    scene.render(&mut canvas);
    assert_eq!(victim_calls.renders.get(), 1);
    assert_eq!(killer_calls.renders.get(), 2);
    assert_eq!(scene.entity_count(), 2, "render must not prune");
}

#[test]
fn destroyed_component_is_dropped_but_entity_survives() {
    let ctx = context();
    let mut scene = Scene::new(&ctx);
    let once = Rc::new(Calls::default());
    let steady = Rc::new(Calls::default());

    let id = scene.spawn(0.0, 0.0);
    scene.attach(id, Probe::new(&once, Action::DestroySelf));
    scene.attach(id, Probe::new(&steady, Action::Nothing));

    scene.update(0.016);
    scene.update(0.016);

    assert_eq!(once.updates.get(), 1);
    assert_eq!(once.destroys.get(), 1);
    assert_eq!(steady.updates.get(), 2);
    assert_eq!(scene.entity(id).unwrap().component_count(), 1);
    assert!(scene.component::<Probe>(id).is_some());
}

#[test]
fn attach_to_destroyed_entity_is_refused() {
    let ctx = context();
    let mut scene = Scene::new(&ctx);
    let calls = Rc::new(Calls::default());
    let id = scene.spawn(0.0, 0.0);
    scene.destroy_entity(id);
    assert!(!scene.attach(id, Probe::new(&calls, Action::Nothing)));
}

#[test]
fn scene_destroy_cascades_once() {
    let ctx = context();
    let mut scene = Scene::new(&ctx);
    let calls = Rc::new(Calls::default());
    let parent = scene.spawn(0.0, 0.0);
    let child = scene.spawn(0.0, 0.0);
    scene.add_child(parent, child);
    scene.attach(parent, Probe::new(&calls, Action::Nothing));
    scene.attach(child, Probe::new(&calls, Action::Nothing));

    scene.destroy();
    scene.destroy();

    assert!(scene.is_destroyed());
    assert_eq!(calls.destroys.get(), 2);
    assert_eq!(scene.entity_count(), 0);
}

// =============================================================================
// Scene manager
// =============================================================================

/// Scene that records its updates and can spawn or remove scenes.
struct Scripted {
    scene: Scene,
    log: Rc<RefCell<Vec<String>>>,
    label: &'static str,
    spawn_on_first_update: bool,
    remove_self: bool,
}

impl Scripted {
    fn new(ctx: &EngineContext, log: &Rc<RefCell<Vec<String>>>, label: &'static str) -> Self {
        Self {
            scene: Scene::new(ctx),
            log: Rc::clone(log),
            label,
            spawn_on_first_update: false,
            remove_self: false,
        }
    }
}

impl GameScene for Scripted {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn name(&self) -> &str {
        self.label
    }

    fn update(&mut self, delta: f32, commands: &mut SceneCommands<'_>) {
        self.scene.update(delta);
        self.log.borrow_mut().push(self.label.to_string());
        if self.spawn_on_first_update {
            self.spawn_on_first_update = false;
            let spawned = Scripted::new(commands.context(), &self.log, "spawned");
            commands.add(spawned);
        }
        if self.remove_self {
            commands.remove(self.scene.id());
        }
    }
}

#[test]
fn scene_added_during_pass_is_visited_in_same_pass() {
    let ctx = context();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut manager = SceneManager::new(ctx.clone());

    let mut first = Scripted::new(&ctx, &log, "first");
    first.spawn_on_first_update = true;
    manager.add(first);
    manager.add(Scripted::new(&ctx, &log, "second"));

    manager.update(0.016);

    assert_eq!(*log.borrow(), vec!["first", "second", "spawned"]);
    assert_eq!(manager.len(), 3);
}

#[test]
fn scene_removing_itself_is_pruned_and_successor_runs() {
    let ctx = context();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut manager = SceneManager::new(ctx.clone());

    let mut boot = Scripted::new(&ctx, &log, "boot");
    boot.spawn_on_first_update = true;
    boot.remove_self = true;
    let boot_id = boot.id();
    manager.add(boot);

    manager.update(0.016);

    assert!(!manager.contains(boot_id));
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.get(0).map(|s| s.name()), Some("spawned"));
    assert_eq!(*log.borrow(), vec!["boot", "spawned"]);
}

#[test]
fn removed_scene_is_not_rendered_and_pruned_on_next_update() {
    let ctx = context();
    let mut manager = SceneManager::new(ctx.clone());
    let calls = Rc::new(Calls::default());

    let mut scene = Scene::new(&ctx);
    let id = scene.spawn(0.0, 0.0);
    scene.attach(id, Probe::new(&calls, Action::Nothing));
    let scene_id = scene.id();
    manager.add(scene);

    assert!(manager.remove(scene_id));
    assert_eq!(calls.destroys.get(), 1);

    let mut canvas = RecordingCanvas::new();
    manager.render(&mut canvas);
    assert_eq!(calls.renders.get(), 0);
    assert_eq!(manager.len(), 1);

    manager.update(0.016);
    assert!(manager.is_empty());
}

#[test]
fn duplicate_scene_ids_are_rejected() {
    let ctx = context();
    let mut manager = SceneManager::new(ctx.clone());
    let scene = Scene::new(&ctx);
    let id = scene.id();
    assert!(manager.add(scene));
    assert!(manager.contains(id));
    assert_ne!(Scene::new(&ctx).id(), id);
}

// =============================================================================
// Engine frame
// =============================================================================

#[test]
fn frame_is_paced_and_clears_before_drawing() {
    let ctx = context();
    let mut engine = Engine::new(ctx.clone(), 30);
    let calls = Rc::new(Calls::default());
    let mut scene = Scene::new(&ctx);
    let id = scene.spawn(0.0, 0.0);
    scene.attach(id, Probe::new(&calls, Action::Nothing));
    engine.add_scene(scene);

    let mut canvas = RecordingCanvas::new();
    assert!(!engine.frame(0.0, &mut canvas), "first call only records");
    assert!(!engine.frame(0.01, &mut canvas), "too early");
    assert!(canvas.commands().is_empty());

    assert!(engine.frame(0.05, &mut canvas));
    assert_eq!(calls.updates.get(), 1);
    assert_eq!(calls.renders.get(), 1);
    assert_eq!(
        canvas.commands().first(),
        Some(&DrawCommand::ClearRect {
            x: 0.0,
            y: 0.0,
            width: 320.0,
            height: 240.0
        })
    );
}
