//! Stagecraft runs interactive 2D presentations described as data.
//!
//! A scene document (JSON) lists named *states*. Each state fills a fixed
//! set of z-ordered layers with entities (sprites, buttons, text, shapes),
//! can attach a small animation to each entity, and moves on after a timer
//! or when a button is clicked.
//!
//! # Frame loop
//!
//! 1. **Input**: the host feeds pointer samples with [`Stage::set_pointer`].
//! 2. **Update**: [`Stage::update`] advances the current [`Scene`]; for a
//!    [`DeclarativeScene`] that means the state timer, animations, click
//!    dispatch and the timer transition, in that order.
//! 3. **Render**: [`Stage::render`] paints the seven layers of the
//!    [`LayerCompositor`] in fixed order onto any [`Surface`].
//!
//! Mistakes in a document (unknown layers, kinds, states, actions) never
//! fail: they are logged through `tracing` and skipped. Use
//! [`SceneConfig::lint`] to list them up front.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded**: one update-then-render tick per frame; nothing in
//!   the crate locks.
//! - **Premultiplied RGBA8** out of [`PixmapSurface`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod compositor;
mod entity;
mod foundation;
mod render;
mod scene;
mod stage;

pub use animation::ease::Ease;
pub use animation::engine::{
    Animation, AnimationKind, AnimationSpec, AnimationTable, SlideDirection,
};
pub use assets::decode::{MAX_IMAGE_SIDE, decode_image, unpremultiply_rgba8_in_place};
pub use assets::store::{
    AssetEntry, AssetManifest, AssetResolver, FileAssets, ImageData, MemoryAssets,
};
pub use compositor::arena::{EntityArena, EntityHandle};
pub use compositor::compositor::LayerCompositor;
pub use compositor::layer::{LayerName, UnknownLayer};
pub use entity::factory::{
    ButtonSpec, DEFAULT_BUTTON_COLOR, DEFAULT_SPRITE_SIZE, EntityEntry, EntityIssue, EntitySpec,
    KNOWN_KINDS, ShapeKind, ShapeSpec, SpriteSpec, TextSpec, checked_animation,
};
pub use entity::model::{
    Button, Entity, EntityKind, Primitive, Shape, Sprite, TextEntity, Visual,
};
pub use foundation::color::ColorSpec;
pub use foundation::core::{Affine, Canvas, Point, Rect, Rgba8, Size, Vec2};
pub use foundation::error::{StageError, StageResult};
pub use render::cpu::{FrameRGBA, PixmapSurface};
pub use render::recording::{DrawCommand, RecordingSurface};
pub use render::surface::{Paint, Surface, TextAlign, TextStyle};
pub use scene::action::Action;
pub use scene::config::{
    ConfigIssue, LayerSlot, LayerTable, SceneConfig, StateConfig, TransitionSpec,
};
pub use scene::interpreter::{DeclarativeScene, Dispatch};
pub use stage::audio::{AudioSink, SilentAudio};
pub use stage::controller::{Scene, SceneContext, SceneController, SceneRequest, StageEvent};
pub use stage::input::{PointerState, PointerTracker};
pub use stage::stage::Stage;
