use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    compositor::layer::LayerName,
    render::recording::RecordingSurface,
    scene::interpreter::DeclarativeScene,
};

fn scene(json: &str) -> DeclarativeScene {
    DeclarativeScene::from_json(json).unwrap()
}

const MENU: &str = r#"{"sceneName": "menu", "states": [{"name": "idle", "clearLayers": true,
    "layers": {
        "TEXT": [{"type": "text", "content": "Menu"}],
        "UI_BUTTONS": [{"type": "button", "x": 0, "y": 0, "text": "Play",
                        "onClick": {"action": "switchScene", "target": "game"}}]
    }}]}"#;

const GAME: &str = r#"{"sceneName": "game", "states": [{"name": "play", "clearLayers": true,
    "layers": {"TEXT": [{"type": "text", "content": "Game"}]},
    "transition": {"type": "timer", "duration": 1, "nextScene": "menu"}}]}"#;

fn stage() -> Stage {
    let mut stage = Stage::new(Canvas::default());
    stage.register(scene(MENU));
    stage.register(scene(GAME));
    stage
}

fn drawn_texts(stage: &Stage) -> Vec<String> {
    let mut surface = RecordingSurface::new();
    stage.render(&mut surface);
    surface.texts().into_iter().map(str::to_owned).collect()
}

#[test]
fn click_switches_scene_after_update() {
    let mut stage = stage();
    assert!(stage.switch_to("menu"));
    assert_eq!(drawn_texts(&stage), ["Menu", "Play"]);

    stage.set_pointer(10.0, 10.0, true);
    stage.update(0.016);
    assert_eq!(stage.current_scene_name(), Some("game"));
    assert_eq!(drawn_texts(&stage), ["Game"]);
    assert_eq!(stage.compositor().layer(LayerName::UiButtons).len(), 0);
}

#[test]
fn timer_next_scene_goes_back() {
    let mut stage = stage();
    stage.switch_to("game");
    stage.update(0.5);
    assert_eq!(stage.current_scene_name(), Some("game"));
    stage.update(0.5);
    assert_eq!(stage.current_scene_name(), Some("menu"));
    assert_eq!(
        stage.scene::<DeclarativeScene>().and_then(|s| s.current_state_name()),
        Some("idle")
    );
}

#[test]
fn press_is_seen_by_one_update_only() {
    let mut stage = stage();
    stage.switch_to("game");
    stage.set_pointer(10.0, 10.0, true);
    stage.update(0.1);
    stage.switch_to("menu");
    // Still held, but the edge was consumed.
    stage.update(0.1);
    assert_eq!(stage.current_scene_name(), Some("menu"));
}

#[test]
fn unknown_scene_is_ignored() {
    let mut stage = stage();
    stage.switch_to("menu");
    assert!(!stage.switch_to("credits"));
    assert_eq!(stage.current_scene_name(), Some("menu"));
    assert!(!stage.compositor().is_empty());
}

#[test]
fn events_are_drained() {
    let mut stage = stage();
    stage.switch_to("menu");
    let events = stage.drain_events();
    assert_eq!(
        events,
        vec![
            StageEvent::StateEntered {
                scene: "menu".to_owned(),
                state: "idle".to_owned()
            },
            StageEvent::SceneChanged {
                scene: "menu".to_owned()
            },
        ]
    );
    assert!(stage.drain_events().is_empty());
}

#[test]
fn tick_updates_then_renders() {
    let mut stage = stage();
    stage.switch_to("game");
    let mut surface = RecordingSurface::new();
    stage.tick(1.0, &mut surface);
    assert_eq!(surface.texts(), ["Menu", "Play"]);
    assert_eq!(stage.elapsed(), 1.0);
}

#[test]
fn change_scene_accepts_unregistered_scenes() {
    let mut stage = Stage::new(Canvas::default());
    stage.change_scene(Box::new(scene(MENU)));
    assert_eq!(stage.current_scene_name(), Some("menu"));
    assert!(stage.scene_mut::<DeclarativeScene>().is_some());
    stage.change_scene(Box::new(scene(GAME)));
    assert!(stage.controller().contains("menu"));
}

struct Restless;

impl Scene for Restless {
    fn name(&self) -> &str {
        "restless"
    }

    fn enter(&mut self, ctx: &mut SceneContext<'_>) {
        ctx.request_scene("restless");
    }
}

#[test]
fn runaway_switch_chains_are_cut() {
    let mut stage = Stage::new(Canvas::default());
    stage.register(Restless);
    assert!(stage.switch_to("restless"));
    assert_eq!(stage.current_scene_name(), Some("restless"));
    stage.update(0.1);
    assert_eq!(stage.current_scene_name(), Some("restless"));
}

#[derive(Clone, Default)]
struct SharedAudio(Rc<RefCell<Vec<String>>>);

impl AudioSink for SharedAudio {
    fn play_sfx(&mut self, id: &str) {
        self.0.borrow_mut().push(id.to_owned());
    }
}

#[test]
fn audio_collaborator_receives_play_sound() {
    let audio = SharedAudio::default();
    let mut stage = Stage::new(Canvas::default()).with_audio(audio.clone());
    stage.register(scene(
        r#"{"sceneName": "s", "states": [{"name": "a", "layers": {"UI_BUTTONS": [
            {"type": "button", "onClick": {"action": "playSound", "sound": "ding"}}]}}]}"#,
    ));
    stage.switch_to("s");
    stage.set_pointer(1.0, 1.0, true);
    stage.update(0.0);
    assert_eq!(*audio.0.borrow(), ["ding"]);
}
