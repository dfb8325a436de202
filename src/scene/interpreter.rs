//! Data-driven scene: walks the states of a [`SceneConfig`].

use std::collections::HashMap;

use crate::{
    animation::engine::{Animation, AnimationTable},
    compositor::arena::EntityHandle,
    entity::factory::checked_animation,
    foundation::{core::Canvas, error::StageResult},
    scene::{
        action::Action,
        config::{LayerSlot, SceneConfig, TransitionSpec},
    },
    stage::controller::{Scene, SceneContext, StageEvent},
};

/// What a dispatched action did to the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing structural changed.
    Handled,
    /// Another state was activated.
    StateChanged,
    /// A scene switch was requested; this scene is about to exit.
    SceneRequested,
}

impl Dispatch {
    /// Whether the set of live entities is about to change.
    pub fn changes_scene_or_state(self) -> bool {
        self != Self::Handled
    }
}

/// Scene whose content and behaviour come from a [`SceneConfig`].
#[derive(Debug)]
pub struct DeclarativeScene {
    config: SceneConfig,
    bound_canvas: Option<Canvas>,
    current: Option<usize>,
    state_timer: f64,
    transition_spent: bool,
    entities: HashMap<String, EntityHandle>,
    clickables: Vec<EntityHandle>,
    animations: AnimationTable,
}

impl DeclarativeScene {
    /// Scene over an already parsed document.
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            bound_canvas: None,
            current: None,
            state_timer: 0.0,
            transition_spent: false,
            entities: HashMap::new(),
            clickables: Vec::new(),
            animations: AnimationTable::new(),
        }
    }

    /// Parse `json` and build the scene.
    pub fn from_json(json: &str) -> StageResult<Self> {
        Ok(Self::new(SceneConfig::from_json(json)?))
    }

    /// Replace the document. Takes effect on the next enter.
    pub fn load_from_config(&mut self, config: SceneConfig) {
        self.config = config;
        self.reset();
    }

    /// The document.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Canvas used for off-canvas placement: the engine's once bound,
    /// otherwise the document's.
    pub fn canvas(&self) -> Canvas {
        self.bound_canvas
            .or(self.config.canvas_size)
            .unwrap_or_default()
    }

    /// Name of the active state.
    pub fn current_state_name(&self) -> Option<&str> {
        self.current
            .and_then(|i| self.config.states.get(i))
            .map(|s| s.name.as_str())
    }

    /// Seconds since the active state was activated.
    pub fn state_timer(&self) -> f64 {
        self.state_timer
    }

    /// Handle of the entity created with `id`.
    pub fn entity(&self, id: &str) -> Option<EntityHandle> {
        self.entities.get(id).copied()
    }

    /// Clickable entities in creation order.
    pub fn clickables(&self) -> &[EntityHandle] {
        &self.clickables
    }

    /// Animation bound to `handle`.
    pub fn animation(&self, handle: EntityHandle) -> Option<&Animation> {
        self.animations.get(handle)
    }

    /// Activate the state called `name`. Unknown names are reported and
    /// leave the current state alone.
    pub fn request_state(&mut self, name: &str, ctx: &mut SceneContext<'_>) -> bool {
        match self.config.state_index(name) {
            Some(index) => {
                self.activate(index, ctx);
                true
            }
            None => {
                tracing::warn!(
                    scene = %self.config.scene_name,
                    state = name,
                    "unknown state, staying in {:?}",
                    self.current_state_name()
                );
                false
            }
        }
    }

    /// Run a click action.
    pub fn dispatch(&mut self, action: &Action, ctx: &mut SceneContext<'_>) -> Dispatch {
        tracing::debug!(action = action.tag(), "dispatch");
        match action {
            Action::SwitchScene { target } => {
                ctx.request_scene(target.clone());
                Dispatch::SceneRequested
            }
            Action::SwitchState { target } => {
                if self.request_state(target, ctx) {
                    Dispatch::StateChanged
                } else {
                    Dispatch::Handled
                }
            }
            Action::PlaySound { sound } => {
                ctx.audio.play_sfx(sound);
                Dispatch::Handled
            }
            Action::Custom { name, params } => {
                ctx.emit(StageEvent::Custom {
                    name: name.clone(),
                    params: params.clone(),
                });
                Dispatch::Handled
            }
            Action::Unrecognized => {
                tracing::warn!("unknown click action ignored");
                Dispatch::Handled
            }
        }
    }

    fn reset(&mut self) {
        self.current = None;
        self.state_timer = 0.0;
        self.transition_spent = false;
        self.drop_tracking();
    }

    fn drop_tracking(&mut self) {
        self.entities.clear();
        self.clickables.clear();
        self.animations.clear();
    }

    fn activate(&mut self, index: usize, ctx: &mut SceneContext<'_>) {
        self.current = Some(index);
        self.state_timer = 0.0;
        self.transition_spent = false;
        self.setup_state(index, ctx);

        let state = self.config.states[index].name.clone();
        tracing::debug!(scene = %self.config.scene_name, %state, "state entered");
        ctx.emit(StageEvent::StateEntered {
            scene: self.config.scene_name.clone(),
            state,
        });
    }

    #[tracing::instrument(skip_all, fields(scene = %self.config.scene_name, state = index))]
    fn setup_state(&mut self, index: usize, ctx: &mut SceneContext<'_>) {
        let canvas = self.canvas();
        let Some(state) = self.config.states.get(index) else {
            return;
        };

        if state.clear_layers {
            ctx.compositor.clear_all();
            self.entities.clear();
            self.clickables.clear();
            self.animations.clear();
        }
        if matches!(state.transition, Some(TransitionSpec::Unrecognized)) {
            tracing::warn!(state = %state.name, "unknown transition type, state will not advance on its own");
        }

        for (slot, list) in state.layers.iter() {
            let LayerSlot::Known(layer) = slot else {
                tracing::warn!(state = %state.name, layer = %slot, "unknown layer, entities skipped");
                continue;
            };
            for entry in list {
                let spec = match entry.spec() {
                    Ok(spec) => spec,
                    Err(issue) => {
                        tracing::warn!(state = %state.name, %layer, %issue, "entity skipped");
                        continue;
                    }
                };

                let entity = spec.build(&*ctx.assets);
                let clickable = entity.is_clickable();
                let handle = ctx.compositor.spawn(entity);
                ctx.compositor.add_to_layer(handle, *layer);

                if let Some(id) = spec.id() {
                    self.entities.insert(id.to_owned(), handle);
                }
                if clickable {
                    self.clickables.push(handle);
                }
                if let Some(anim) = spec.animation().and_then(checked_animation) {
                    self.animations.attach(handle, anim, ctx.compositor, canvas);
                }
            }
        }
    }

    fn handle_click(&mut self, ctx: &mut SceneContext<'_>) -> Dispatch {
        let point = ctx.pointer.position;
        let candidates = self.clickables.clone();
        for handle in candidates {
            let action = ctx
                .compositor
                .entity(handle)
                .filter(|e| e.hit_test(point))
                .and_then(|e| e.action().cloned());
            let Some(action) = action else {
                continue;
            };
            let outcome = self.dispatch(&action, ctx);
            if outcome.changes_scene_or_state() {
                return outcome;
            }
        }
        Dispatch::Handled
    }

    fn check_transition(&mut self, ctx: &mut SceneContext<'_>) {
        if self.transition_spent {
            return;
        }
        let Some(state) = self.current.and_then(|i| self.config.states.get(i)) else {
            return;
        };
        let Some(TransitionSpec::Timer {
            duration,
            next_state,
            next_scene,
        }) = &state.transition
        else {
            return;
        };
        if self.state_timer < *duration {
            return;
        }

        self.transition_spent = true;
        let from = state.name.clone();
        match (next_scene.clone(), next_state.clone()) {
            (Some(scene), _) => {
                tracing::debug!(%from, %scene, "timer transition to scene");
                ctx.request_scene(scene);
            }
            (None, Some(target)) => {
                tracing::debug!(%from, %target, "timer transition");
                self.request_state(&target, ctx);
            }
            (None, None) => {
                tracing::warn!(state = %from, "timer transition has no target");
            }
        }
    }
}

impl Scene for DeclarativeScene {
    fn name(&self) -> &str {
        &self.config.scene_name
    }

    fn bind(&mut self, canvas: Canvas) {
        self.bound_canvas = Some(canvas);
    }

    #[tracing::instrument(skip_all, fields(scene = %self.config.scene_name))]
    fn enter(&mut self, ctx: &mut SceneContext<'_>) {
        self.reset();
        if let Err(err) = ctx.assets.preload(&self.config.assets) {
            tracing::warn!(%err, "asset preload failed, continuing without assets");
        }
    }

    fn populate_layers(&mut self, ctx: &mut SceneContext<'_>) {
        if self.config.states.is_empty() {
            tracing::warn!(scene = %self.config.scene_name, "scene has no states");
            return;
        }
        self.activate(0, ctx);
    }

    fn exit(&mut self, _ctx: &mut SceneContext<'_>) {
        tracing::debug!(scene = %self.config.scene_name, "scene exit");
        self.reset();
    }

    fn update(&mut self, dt: f64, ctx: &mut SceneContext<'_>) {
        if self.current.is_none() {
            return;
        }
        self.state_timer += dt;
        self.animations.advance_all(dt, ctx.compositor);

        if ctx.pointer.just_pressed
            && self.handle_click(ctx) == Dispatch::SceneRequested
        {
            return;
        }
        self.check_transition(ctx);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/interpreter.rs"]
mod tests;
