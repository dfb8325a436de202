use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    assets::store::MemoryAssets,
    compositor::layer::LayerName,
    entity::model::{Entity, EntityKind, TextEntity, Visual},
    render::surface::TextStyle,
    stage::audio::SilentAudio,
};

type Log = Rc<RefCell<Vec<String>>>;

struct Probe {
    name: String,
    log: Log,
}

impl Probe {
    fn boxed(name: &str, log: &Log) -> Box<dyn Scene> {
        Box::new(Self {
            name: name.to_owned(),
            log: Rc::clone(log),
        })
    }

    fn note(&self, what: String) {
        self.log.borrow_mut().push(format!("{}:{what}", self.name));
    }
}

impl Scene for Probe {
    fn name(&self) -> &str {
        &self.name
    }

    fn bind(&mut self, canvas: Canvas) {
        self.note(format!("bind {}x{}", canvas.width, canvas.height));
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>) {
        self.note(format!("enter layers={}", ctx.compositor.len()));
    }

    fn populate_layers(&mut self, ctx: &mut SceneContext<'_>) {
        self.note(format!("populate layers={}", ctx.compositor.len()));
        let handle = ctx.compositor.spawn(Entity {
            id: None,
            visual: Visual::default(),
            kind: EntityKind::Text(TextEntity {
                content: self.name.clone(),
                style: TextStyle::default(),
            }),
        });
        ctx.compositor.add_to_layer(handle, LayerName::Text);
    }

    fn exit(&mut self, _ctx: &mut SceneContext<'_>) {
        self.note("exit".to_owned());
    }
}

/// Scene with no hooks beyond its name.
struct Bare;

impl Scene for Bare {
    fn name(&self) -> &str {
        "bare"
    }
}

#[derive(Default)]
struct Host {
    compositor: LayerCompositor,
    assets: MemoryAssets,
    audio: SilentAudio,
    requests: Vec<SceneRequest>,
    events: Vec<StageEvent>,
}

impl Host {
    fn ctx(&mut self) -> SceneContext<'_> {
        SceneContext::new(
            Canvas::new(320.0, 240.0),
            &mut self.compositor,
            &mut self.assets,
            &mut self.audio,
            PointerState::default(),
            &mut self.requests,
            &mut self.events,
        )
    }
}

#[test]
fn change_scene_runs_hooks_in_order_on_an_empty_compositor() {
    let log = Log::default();
    let mut host = Host::default();
    let mut controller = SceneController::new();

    controller.change_scene(Probe::boxed("one", &log), &mut host.ctx());
    assert_eq!(host.compositor.len(), 1);
    log.borrow_mut().clear();

    controller.change_scene(Probe::boxed("two", &log), &mut host.ctx());
    assert_eq!(
        *log.borrow(),
        [
            "one:exit",
            "two:bind 320x240",
            "two:enter layers=0",
            "two:populate layers=0",
        ]
    );
    assert_eq!(controller.current_name(), Some("two"));
    assert_eq!(host.compositor.len(), 1);
    assert_eq!(
        host.events.last(),
        Some(&StageEvent::SceneChanged {
            scene: "two".to_owned()
        })
    );
}

#[test]
fn exited_scene_returns_to_the_registry() {
    let log = Log::default();
    let mut host = Host::default();
    let mut controller = SceneController::new();

    controller.change_scene(Probe::boxed("one", &log), &mut host.ctx());
    controller.register("two", Probe::boxed("two", &log));
    assert!(controller.switch_to("two", &mut host.ctx()));
    assert_eq!(controller.names(), ["one", "two"]);
    assert!(controller.contains("one"));

    assert!(controller.switch_to("one", &mut host.ctx()));
    assert_eq!(controller.current_name(), Some("one"));
}

#[test]
fn switching_to_unknown_scene_is_a_no_op() {
    let log = Log::default();
    let mut host = Host::default();
    let mut controller = SceneController::new();
    controller.change_scene(Probe::boxed("one", &log), &mut host.ctx());
    log.borrow_mut().clear();

    assert!(!controller.switch_to("missing", &mut host.ctx()));
    assert_eq!(controller.current_name(), Some("one"));
    assert!(log.borrow().is_empty());
    assert_eq!(host.compositor.len(), 1);
}

#[test]
fn switching_to_current_scene_restarts_it() {
    let log = Log::default();
    let mut host = Host::default();
    let mut controller = SceneController::new();
    controller.register("one", Probe::boxed("one", &log));
    assert!(controller.switch_to("one", &mut host.ctx()));
    log.borrow_mut().clear();

    assert!(controller.switch_to("one", &mut host.ctx()));
    assert_eq!(
        *log.borrow(),
        [
            "one:exit",
            "one:bind 320x240",
            "one:enter layers=0",
            "one:populate layers=0",
        ]
    );
}

#[test]
fn scenes_without_hooks_are_fine() {
    let mut host = Host::default();
    let mut controller = SceneController::new();
    controller.register("bare", Box::new(Bare));
    assert!(controller.switch_to("bare", &mut host.ctx()));
    controller.update(0.016, &mut host.ctx());
    assert!(host.compositor.is_empty());
    assert_eq!(controller.current().map(|s| s.name()), Some("bare"));
}

#[test]
fn register_overwrites() {
    let log = Log::default();
    let mut host = Host::default();
    let mut controller = SceneController::new();
    controller.register("x", Probe::boxed("first", &log));
    controller.register("x", Probe::boxed("second", &log));
    assert!(controller.switch_to("x", &mut host.ctx()));
    assert_eq!(controller.current_name(), Some("second"));
}
