use std::collections::HashMap;

use crate::{
    animation::ease::Ease,
    compositor::{arena::EntityHandle, compositor::LayerCompositor},
    entity::model::Visual,
    foundation::core::{Canvas, Point, Vec2},
};

/// Distance past the canvas edge where a slide starts.
const SLIDE_MARGIN: f64 = 100.0;
/// Relative scale swing of a pulse.
const PULSE_AMPLITUDE: f64 = 0.1;
/// Angular speed of a pulse in radians per second.
const PULSE_RATE: f64 = 4.0;

/// Effect applied by an [`Animation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationKind {
    /// Opacity 0 to the initial opacity.
    FadeIn,
    /// Initial opacity to 0.
    FadeOut,
    /// Off-canvas to the initial position.
    SlideIn,
    /// Scale 0 to the initial scale.
    Scale,
    /// Endless scale oscillation around the initial scale.
    Pulse,
    /// Any other type. Not attached by the entity factory.
    #[serde(other)]
    Unrecognized,
}

/// Edge a slideIn starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideDirection {
    /// Above the canvas.
    Top,
    /// Below the canvas.
    Bottom,
    /// Left of the canvas.
    #[default]
    Left,
    /// Right of the canvas.
    Right,
    /// Any other value; slides from the left.
    #[serde(other)]
    Unrecognized,
}

fn default_duration() -> f64 {
    1.0
}

/// Per-entity animation config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSpec {
    /// Effect.
    #[serde(rename = "type")]
    pub kind: AnimationKind,
    /// Seconds from start to finish, excluding `delay`.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Seconds before the effect starts moving.
    #[serde(default)]
    pub delay: f64,
    /// Progress curve.
    #[serde(default)]
    pub easing: Ease,
    /// slideIn only.
    #[serde(default)]
    pub direction: SlideDirection,
}

impl AnimationSpec {
    /// Spec with default duration, delay, easing and direction.
    pub fn new(kind: AnimationKind) -> Self {
        Self {
            kind,
            duration: default_duration(),
            delay: 0.0,
            easing: Ease::default(),
            direction: SlideDirection::default(),
        }
    }
}

/// Running animation state for one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Animation {
    spec: AnimationSpec,
    initial_opacity: f64,
    initial_position: Point,
    initial_scale: Vec2,
    elapsed: f64,
    completed: bool,
}

impl Animation {
    /// Snapshot `visual` and move it to the effect's start appearance.
    pub fn start(spec: AnimationSpec, visual: &mut Visual, canvas: Canvas) -> Self {
        let anim = Self {
            initial_opacity: visual.opacity,
            initial_position: visual.position,
            initial_scale: visual.scale,
            elapsed: 0.0,
            completed: false,
            spec,
        };

        match anim.spec.kind {
            AnimationKind::FadeIn => visual.opacity = 0.0,
            AnimationKind::SlideIn => match anim.spec.direction {
                SlideDirection::Top => visual.position.y = -visual.size.height - SLIDE_MARGIN,
                SlideDirection::Bottom => visual.position.y = canvas.height + SLIDE_MARGIN,
                SlideDirection::Right => visual.position.x = canvas.width + SLIDE_MARGIN,
                SlideDirection::Left | SlideDirection::Unrecognized => {
                    visual.position.x = -visual.size.width - SLIDE_MARGIN
                }
            },
            AnimationKind::Scale => visual.scale = Vec2::ZERO,
            AnimationKind::FadeOut | AnimationKind::Pulse | AnimationKind::Unrecognized => {}
        }
        anim
    }

    /// The config this animation was started from.
    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// Seconds accumulated since start, including the delay.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Whether the effect reached its end. Pulses never complete.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Linear progress in `[0, 1]` after the delay.
    pub fn progress(&self) -> f64 {
        let active = self.elapsed - self.spec.delay;
        if active < 0.0 {
            return 0.0;
        }
        if self.spec.duration <= 0.0 {
            return 1.0;
        }
        (active / self.spec.duration).clamp(0.0, 1.0)
    }

    /// Accumulate `dt` and write the effect into `visual`.
    pub fn advance(&mut self, dt: f64, visual: &mut Visual) {
        if self.completed {
            return;
        }
        self.elapsed += dt;
        if self.elapsed < self.spec.delay {
            return;
        }

        let progress = self.progress();
        let eased = self.spec.easing.apply(progress);

        match self.spec.kind {
            AnimationKind::FadeIn => visual.opacity = eased * self.initial_opacity,
            AnimationKind::FadeOut => visual.opacity = self.initial_opacity * (1.0 - eased),
            AnimationKind::SlideIn => match self.spec.direction {
                SlideDirection::Top | SlideDirection::Bottom => {
                    visual.position.y = approach(visual.position.y, self.initial_position.y, eased)
                }
                SlideDirection::Left | SlideDirection::Right | SlideDirection::Unrecognized => {
                    visual.position.x = approach(visual.position.x, self.initial_position.x, eased)
                }
            },
            AnimationKind::Scale => {
                visual.scale = Vec2::new(
                    eased * self.initial_scale.x,
                    eased * self.initial_scale.y,
                )
            }
            AnimationKind::Pulse => {
                let swing = PULSE_AMPLITUDE * (PULSE_RATE * (self.elapsed - self.spec.delay)).sin();
                visual.scale = self.initial_scale * (1.0 + swing);
                return;
            }
            AnimationKind::Unrecognized => {}
        }

        if progress >= 1.0 {
            self.completed = true;
        }
    }
}

/// Step `current` toward `target`, landing exactly on it at `t >= 1`.
fn approach(current: f64, target: f64, t: f64) -> f64 {
    if t >= 1.0 {
        target
    } else {
        current + (target - current) * t
    }
}

/// Side table of running animations keyed by entity handle.
#[derive(Clone, Debug, Default)]
pub struct AnimationTable {
    running: HashMap<EntityHandle, Animation>,
}

impl AnimationTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `spec` on the entity behind `handle`, replacing any animation it
    /// already had. Returns `false` when the handle is stale.
    pub fn attach(
        &mut self,
        handle: EntityHandle,
        spec: AnimationSpec,
        compositor: &mut LayerCompositor,
        canvas: Canvas,
    ) -> bool {
        let Some(entity) = compositor.entity_mut(handle) else {
            return false;
        };
        let anim = Animation::start(spec, &mut entity.visual, canvas);
        self.running.insert(handle, anim);
        true
    }

    /// Advance every unfinished animation. Animations whose entity no longer
    /// exists are dropped.
    pub fn advance_all(&mut self, dt: f64, compositor: &mut LayerCompositor) {
        self.running.retain(|handle, anim| {
            let Some(entity) = compositor.entity_mut(*handle) else {
                return false;
            };
            anim.advance(dt, &mut entity.visual);
            true
        });
    }

    /// Animation bound to `handle`.
    pub fn get(&self, handle: EntityHandle) -> Option<&Animation> {
        self.running.get(&handle)
    }

    /// Drop every animation.
    pub fn clear(&mut self) {
        self.running.clear();
    }

    /// Number of tracked animations, finished ones included.
    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Whether no animation is tracked.
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/engine.rs"]
mod tests;
