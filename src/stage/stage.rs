use std::any::Any;

use crate::{
    assets::store::{AssetResolver, MemoryAssets},
    compositor::compositor::LayerCompositor,
    foundation::core::Canvas,
    render::surface::Surface,
    stage::{
        audio::{AudioSink, SilentAudio},
        controller::{Scene, SceneContext, SceneController, SceneRequest, StageEvent},
        input::PointerTracker,
    },
};

/// Scene switches a single update may chain before the rest are dropped.
const MAX_CHAINED_SWITCHES: usize = 8;

/// The host engine: owns the compositor, the scene controller and the
/// collaborators, and drives one update-then-render tick per frame.
pub struct Stage {
    canvas: Canvas,
    compositor: LayerCompositor,
    controller: SceneController,
    assets: Box<dyn AssetResolver>,
    audio: Box<dyn AudioSink>,
    pointer: PointerTracker,
    requests: Vec<SceneRequest>,
    events: Vec<StageEvent>,
    elapsed: f64,
}

impl Stage {
    /// Stage with in-memory assets and silent audio.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            compositor: LayerCompositor::new(),
            controller: SceneController::new(),
            assets: Box::new(MemoryAssets::new()),
            audio: Box::new(SilentAudio),
            pointer: PointerTracker::new(),
            requests: Vec::new(),
            events: Vec::new(),
            elapsed: 0.0,
        }
    }

    /// Replace the asset collaborator.
    pub fn with_assets(mut self, assets: impl AssetResolver + 'static) -> Self {
        self.assets = Box::new(assets);
        self
    }

    /// Replace the audio collaborator.
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Canvas size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Seconds simulated so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The compositor.
    pub fn compositor(&self) -> &LayerCompositor {
        &self.compositor
    }

    /// The scene controller.
    pub fn controller(&self) -> &SceneController {
        &self.controller
    }

    /// Register a scene under its own name.
    pub fn register(&mut self, scene: impl Scene) {
        let name = scene.name().to_owned();
        self.controller.register(name, Box::new(scene));
    }

    /// Register a scene under an explicit name.
    pub fn register_as(&mut self, name: impl Into<String>, scene: Box<dyn Scene>) {
        self.controller.register(name, scene);
    }

    /// Switch to a registered scene. Unknown names warn and return `false`.
    pub fn switch_to(&mut self, name: &str) -> bool {
        let switched = self.with_context(|controller, ctx| controller.switch_to(name, ctx));
        self.apply_requests();
        switched
    }

    /// Make `scene` current even if it was never registered.
    pub fn change_scene(&mut self, scene: Box<dyn Scene>) {
        self.with_context(|controller, ctx| controller.change_scene(scene, ctx));
        self.apply_requests();
    }

    /// Name of the current scene.
    pub fn current_scene_name(&self) -> Option<&str> {
        self.controller.current_name()
    }

    /// The current scene as `T`.
    pub fn scene<T: Scene>(&self) -> Option<&T> {
        let scene: &dyn Any = self.controller.current()?;
        scene.downcast_ref::<T>()
    }

    /// The current scene as `T`, mutably.
    pub fn scene_mut<T: Scene>(&mut self) -> Option<&mut T> {
        let scene: &mut dyn Any = self.controller.current_mut()?;
        scene.downcast_mut::<T>()
    }

    /// Feed a pointer sample for the next update.
    pub fn set_pointer(&mut self, x: f64, y: f64, pressed: bool) {
        self.pointer.sample(x, y, pressed);
    }

    /// Advance the current scene by `dt` seconds, then run the scene
    /// switches it asked for.
    pub fn update(&mut self, dt: f64) {
        self.elapsed += dt;
        self.with_context(|controller, ctx| controller.update(dt, ctx));
        self.pointer.end_tick();
        self.apply_requests();
    }

    /// Paint every layer onto `surface`.
    pub fn render(&self, surface: &mut dyn Surface) {
        self.compositor.render(surface);
    }

    /// One frame: [`Self::update`] then [`Self::render`].
    pub fn tick(&mut self, dt: f64, surface: &mut dyn Surface) {
        self.update(dt);
        self.render(surface);
    }

    /// Take queued events.
    pub fn drain_events(&mut self) -> Vec<StageEvent> {
        std::mem::take(&mut self.events)
    }

    fn with_context<R>(
        &mut self,
        f: impl FnOnce(&mut SceneController, &mut SceneContext<'_>) -> R,
    ) -> R {
        let mut ctx = SceneContext::new(
            self.canvas,
            &mut self.compositor,
            self.assets.as_mut(),
            self.audio.as_mut(),
            self.pointer.state(),
            &mut self.requests,
            &mut self.events,
        );
        f(&mut self.controller, &mut ctx)
    }

    fn apply_requests(&mut self) {
        for _ in 0..MAX_CHAINED_SWITCHES {
            if self.requests.is_empty() {
                return;
            }
            for request in std::mem::take(&mut self.requests) {
                match request {
                    SceneRequest::Switch(name) => {
                        self.with_context(|controller, ctx| controller.switch_to(&name, ctx));
                    }
                }
            }
        }
        if !self.requests.is_empty() {
            tracing::warn!(
                dropped = self.requests.len(),
                "scene switches keep requesting more switches, dropping the rest"
            );
            self.requests.clear();
        }
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("canvas", &self.canvas)
            .field("controller", &self.controller)
            .field("layers", &self.compositor.len())
            .field("elapsed", &self.elapsed)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/stage.rs"]
mod tests;
