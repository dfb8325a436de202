//! Scene registry and the scene switch protocol.

use std::{any::Any, collections::HashMap};

use crate::{
    assets::store::AssetResolver,
    compositor::compositor::LayerCompositor,
    foundation::core::Canvas,
    stage::{audio::AudioSink, input::PointerState},
};

/// Deferred request raised by a scene while it is running.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SceneRequest {
    /// Switch to the registered scene with this name.
    Switch(String),
}

/// Notification for the host.
#[derive(Clone, Debug, PartialEq)]
pub enum StageEvent {
    /// A scene became current.
    SceneChanged {
        /// Scene name.
        scene: String,
    },
    /// A state of the current scene was activated.
    StateEntered {
        /// Scene name.
        scene: String,
        /// State name.
        state: String,
    },
    /// `custom` click action.
    Custom {
        /// Host-defined name.
        name: String,
        /// Payload from the document.
        params: serde_json::Value,
    },
}

/// Everything a scene may touch during a hook.
pub struct SceneContext<'a> {
    /// Canvas the engine renders to.
    pub canvas: Canvas,
    /// The shared compositor.
    pub compositor: &'a mut LayerCompositor,
    /// Asset collaborator.
    pub assets: &'a mut dyn AssetResolver,
    /// Audio collaborator.
    pub audio: &'a mut dyn AudioSink,
    /// Pointer state for this tick.
    pub pointer: PointerState,
    requests: &'a mut Vec<SceneRequest>,
    events: &'a mut Vec<StageEvent>,
}

impl<'a> SceneContext<'a> {
    /// Context over the given collaborators and queues.
    pub fn new(
        canvas: Canvas,
        compositor: &'a mut LayerCompositor,
        assets: &'a mut dyn AssetResolver,
        audio: &'a mut dyn AudioSink,
        pointer: PointerState,
        requests: &'a mut Vec<SceneRequest>,
        events: &'a mut Vec<StageEvent>,
    ) -> Self {
        Self {
            canvas,
            compositor,
            assets,
            audio,
            pointer,
            requests,
            events,
        }
    }

    /// Ask the host to switch scenes once the current hook returns.
    pub fn request_scene(&mut self, name: impl Into<String>) {
        self.requests.push(SceneRequest::Switch(name.into()));
    }

    /// Queue an event for the host.
    pub fn emit(&mut self, event: StageEvent) {
        self.events.push(event);
    }
}

/// A unit of content driven by the [`SceneController`].
///
/// Every hook except [`Scene::name`] is optional.
pub trait Scene: Any {
    /// Registry name.
    fn name(&self) -> &str;

    /// Receive the engine's canvas before the compositor is cleared.
    fn bind(&mut self, _canvas: Canvas) {}

    /// One-time setup; runs before any of the scene's entities exist.
    fn enter(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Initial layer population.
    fn populate_layers(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Leaving the scene.
    fn exit(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Per-frame logic.
    fn update(&mut self, _dt: f64, _ctx: &mut SceneContext<'_>) {}
}

/// Owns registered scenes and the current one.
///
/// The current scene is moved out of the registry while active and put back
/// when it exits.
#[derive(Default)]
pub struct SceneController {
    scenes: HashMap<String, Box<dyn Scene>>,
    current: Option<Box<dyn Scene>>,
}

impl SceneController {
    /// Empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the scene registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, scene: Box<dyn Scene>) {
        let name = name.into();
        if self.scenes.insert(name.clone(), scene).is_some() {
            tracing::debug!(%name, "scene replaced");
        }
    }

    /// Whether `name` can be switched to.
    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name) || self.current_name() == Some(name)
    }

    /// Registered names, sorted. Includes the current scene.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scenes.keys().cloned().collect();
        if let Some(current) = self.current_name()
            && !self.scenes.contains_key(current)
        {
            names.push(current.to_owned());
        }
        names.sort();
        names
    }

    /// Name of the current scene.
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref().map(|s| s.name())
    }

    /// The current scene.
    pub fn current(&self) -> Option<&(dyn Scene + 'static)> {
        self.current.as_deref()
    }

    /// The current scene, mutably.
    pub fn current_mut(&mut self) -> Option<&mut (dyn Scene + 'static)> {
        self.current.as_deref_mut()
    }

    /// Switch to a registered scene. Switching to the current scene restarts
    /// it. Unknown names are reported and ignored.
    pub fn switch_to(&mut self, name: &str, ctx: &mut SceneContext<'_>) -> bool {
        let restart = self.current_name() == Some(name);
        if !restart && !self.scenes.contains_key(name) {
            tracing::warn!(scene = name, "switch to unknown scene ignored");
            return false;
        }
        if restart {
            self.exit_current(ctx);
        }
        match self.scenes.remove(name) {
            Some(scene) => {
                self.change_scene(scene, ctx);
                true
            }
            None => false,
        }
    }

    /// Make `scene` current: exit the old scene, bind, clear the
    /// compositor, then enter and populate the new one.
    #[tracing::instrument(skip_all, fields(scene = scene.name()))]
    pub fn change_scene(&mut self, mut scene: Box<dyn Scene>, ctx: &mut SceneContext<'_>) {
        self.exit_current(ctx);
        scene.bind(ctx.canvas);
        ctx.compositor.clear_all();

        let name = scene.name().to_owned();
        let scene = self.current.insert(scene);
        scene.enter(ctx);
        scene.populate_layers(ctx);

        tracing::debug!(scene = %name, "scene changed");
        ctx.emit(StageEvent::SceneChanged { scene: name });
    }

    /// Run the current scene's update hook.
    pub fn update(&mut self, dt: f64, ctx: &mut SceneContext<'_>) {
        if let Some(scene) = self.current.as_deref_mut() {
            scene.update(dt, ctx);
        }
    }

    fn exit_current(&mut self, ctx: &mut SceneContext<'_>) {
        if let Some(mut old) = self.current.take() {
            old.exit(ctx);
            let name = old.name().to_owned();
            self.scenes.entry(name).or_insert(old);
        }
    }
}

impl std::fmt::Debug for SceneController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneController")
            .field("scenes", &self.names())
            .field("current", &self.current_name())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/controller.rs"]
mod tests;
