//! Entity configs and the factory that turns them into [`Entity`] values.
//!
//! Each kind has its own spec struct so every omitted field gets its default
//! from serde. Configs that are not a valid spec of a known kind land in
//! [`EntityEntry::Invalid`], the one place unknown and malformed entities
//! are handled.

use std::fmt;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};

use crate::{
    animation::{
        ease::Ease,
        engine::{AnimationKind, AnimationSpec, SlideDirection},
    },
    assets::store::AssetResolver,
    entity::model::{Button, Entity, EntityKind, Primitive, Shape, Sprite, TextEntity, Visual},
    foundation::{
        color::ColorSpec,
        core::{Point, Rgba8, Size, Vec2},
    },
    render::surface::{TextAlign, TextStyle},
    scene::action::Action,
};

/// Default sprite size when neither the config nor the image provides one.
pub const DEFAULT_SPRITE_SIZE: f64 = 100.0;
/// Default button fill.
pub const DEFAULT_BUTTON_COLOR: Rgba8 = Rgba8::rgb(0x4a, 0x90, 0xd9);

/// Entity kinds the factory knows how to build.
pub const KNOWN_KINDS: [&str; 4] = ["sprite", "button", "text", "shape"];

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

fn button_width() -> f64 {
    200.0
}

fn button_height() -> f64 {
    50.0
}

fn shape_extent() -> f64 {
    100.0
}

fn shape_radius() -> f64 {
    50.0
}

fn default_font() -> String {
    TextStyle::DEFAULT_FONT.to_owned()
}

/// Parse a nested config value, substituting `unusable` when it is
/// malformed so the owning entity is still built.
fn parse_or<T: DeserializeOwned>(
    value: serde_json::Value,
    field: &'static str,
    unusable: T,
) -> T {
    match serde_json::from_value(value) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(field, %err, "malformed field, entity kept without it");
            unusable
        }
    }
}

fn lenient_action<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Action>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| parse_or(v, "onClick", Action::Unrecognized)))
}

fn lenient_animation<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<AnimationSpec>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| {
        parse_or(v, "animation", AnimationSpec::new(AnimationKind::Unrecognized))
    }))
}

/// `sprite` config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteSpec {
    /// Left edge.
    #[serde(default)]
    pub x: f64,
    /// Top edge.
    #[serde(default)]
    pub y: f64,
    /// Width; defaults to the image width.
    #[serde(default)]
    pub width: Option<f64>,
    /// Height; defaults to the image height.
    #[serde(default)]
    pub height: Option<f64>,
    /// Image id resolved through the asset collaborator.
    #[serde(default)]
    pub asset_id: Option<String>,
    /// Radians.
    #[serde(default)]
    pub rotation: f64,
    /// Opacity.
    #[serde(default = "one")]
    pub alpha: f64,
    /// Horizontal scale.
    #[serde(default = "one")]
    pub scale_x: f64,
    /// Vertical scale.
    #[serde(default = "one")]
    pub scale_y: f64,
    /// Visibility.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Lookup id.
    #[serde(default)]
    pub id: Option<String>,
    /// Animation started when the entity is created.
    #[serde(default, deserialize_with = "lenient_animation")]
    pub animation: Option<AnimationSpec>,
}

/// `button` config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSpec {
    /// Left edge.
    #[serde(default)]
    pub x: f64,
    /// Top edge.
    #[serde(default)]
    pub y: f64,
    /// Width.
    #[serde(default = "button_width")]
    pub width: f64,
    /// Height.
    #[serde(default = "button_height")]
    pub height: f64,
    /// Label.
    #[serde(default)]
    pub text: String,
    /// Fill color.
    #[serde(default)]
    pub color: Option<ColorSpec>,
    /// Label color.
    #[serde(default)]
    pub text_color: Option<ColorSpec>,
    /// Label font shorthand.
    #[serde(default)]
    pub font: Option<String>,
    /// Opacity.
    #[serde(default = "one")]
    pub alpha: f64,
    /// Visibility.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Click action. A malformed one is kept as [`Action::Unrecognized`].
    #[serde(default, deserialize_with = "lenient_action")]
    pub on_click: Option<Action>,
    /// Lookup id.
    #[serde(default)]
    pub id: Option<String>,
    /// Animation started when the entity is created.
    #[serde(default, deserialize_with = "lenient_animation")]
    pub animation: Option<AnimationSpec>,
}

/// `text` config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpec {
    /// String to draw.
    #[serde(default)]
    pub content: String,
    /// Anchor x.
    #[serde(default)]
    pub x: f64,
    /// Baseline y.
    #[serde(default)]
    pub y: f64,
    /// Font shorthand.
    #[serde(default = "default_font")]
    pub font: String,
    /// Fill color.
    #[serde(default)]
    pub color: Option<ColorSpec>,
    /// Horizontal anchoring.
    #[serde(default)]
    pub text_align: TextAlign,
    /// Opacity.
    #[serde(default = "one")]
    pub alpha: f64,
    /// Visibility.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Lookup id.
    #[serde(default)]
    pub id: Option<String>,
    /// Animation started when the entity is created.
    #[serde(default, deserialize_with = "lenient_animation")]
    pub animation: Option<AnimationSpec>,
}

/// Primitive named by a `shape` config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Rectangle.
    #[default]
    Rect,
    /// Circle.
    Circle,
    /// Line segment.
    Line,
    /// Any other value; built as a rectangle.
    #[serde(other)]
    Unrecognized,
}

/// `shape` config.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSpec {
    /// Primitive.
    #[serde(default)]
    pub shape: ShapeKind,
    /// Left edge, or centre x for circles.
    #[serde(default)]
    pub x: f64,
    /// Top edge, or centre y for circles.
    #[serde(default)]
    pub y: f64,
    /// Width (rect, line dx).
    #[serde(default = "shape_extent")]
    pub width: f64,
    /// Height (rect, line dy).
    #[serde(default = "shape_extent")]
    pub height: f64,
    /// Circle radius.
    #[serde(default = "shape_radius")]
    pub radius: f64,
    /// Fill or stroke color.
    #[serde(default)]
    pub color: Option<ColorSpec>,
    /// Fill (true) or outline.
    #[serde(default = "yes")]
    pub fill: bool,
    /// Outline width.
    #[serde(default = "one")]
    pub stroke_width: f64,
    /// Opacity.
    #[serde(default = "one")]
    pub alpha: f64,
    /// Visibility.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Radians.
    #[serde(default)]
    pub rotation: f64,
    /// Lookup id.
    #[serde(default)]
    pub id: Option<String>,
    /// Animation started when the entity is created.
    #[serde(default, deserialize_with = "lenient_animation")]
    pub animation: Option<AnimationSpec>,
}

/// A valid entity config of a known kind.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EntitySpec {
    /// Image-backed entity.
    Sprite(SpriteSpec),
    /// Clickable labelled box.
    Button(ButtonSpec),
    /// Line of text.
    Text(TextSpec),
    /// Vector primitive.
    Shape(ShapeSpec),
}

/// One entry of a layer list as written in the document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum EntityEntry {
    /// Parsed spec.
    Spec(EntitySpec),
    /// Anything else, kept verbatim for reporting.
    Invalid(serde_json::Value),
}

/// Why an entry produced no entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntityIssue {
    /// `type` missing or not one of [`KNOWN_KINDS`].
    UnknownKind(Option<String>),
    /// Known kind whose fields did not parse.
    Invalid {
        /// Declared kind.
        kind: String,
        /// Parser message.
        message: String,
    },
}

impl fmt::Display for EntityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind(Some(kind)) => write!(f, "unknown entity type \"{kind}\""),
            Self::UnknownKind(None) => f.write_str("entity config has no type"),
            Self::Invalid { kind, message } => write!(f, "invalid {kind} config: {message}"),
        }
    }
}

impl EntityEntry {
    /// The parsed spec, or the reason there is none.
    pub fn spec(&self) -> Result<&EntitySpec, EntityIssue> {
        match self {
            Self::Spec(spec) => Ok(spec),
            Self::Invalid(raw) => Err(diagnose(raw)),
        }
    }
}

fn diagnose(raw: &serde_json::Value) -> EntityIssue {
    let kind = raw.get("type").and_then(serde_json::Value::as_str);
    match kind {
        Some(kind) if KNOWN_KINDS.contains(&kind) => {
            let message = match serde_json::from_value::<EntitySpec>(raw.clone()) {
                Err(err) => err.to_string(),
                Ok(_) => "not an object".to_owned(),
            };
            EntityIssue::Invalid {
                kind: kind.to_owned(),
                message,
            }
        }
        other => EntityIssue::UnknownKind(other.map(str::to_owned)),
    }
}

impl EntitySpec {
    /// Document spelling of the kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Sprite(_) => "sprite",
            Self::Button(_) => "button",
            Self::Text(_) => "text",
            Self::Shape(_) => "shape",
        }
    }

    /// Lookup id, if assigned.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Sprite(s) => s.id.as_deref(),
            Self::Button(s) => s.id.as_deref(),
            Self::Text(s) => s.id.as_deref(),
            Self::Shape(s) => s.id.as_deref(),
        }
    }

    /// Declared animation, if any.
    pub fn animation(&self) -> Option<&AnimationSpec> {
        match self {
            Self::Sprite(s) => s.animation.as_ref(),
            Self::Button(s) => s.animation.as_ref(),
            Self::Text(s) => s.animation.as_ref(),
            Self::Shape(s) => s.animation.as_ref(),
        }
    }

    /// Declared click action, if any.
    pub fn action(&self) -> Option<&Action> {
        match self {
            Self::Button(s) => s.on_click.as_ref(),
            _ => None,
        }
    }

    /// Construct the runtime entity. Never fails: unresolvable assets and
    /// colors are logged and replaced by defaults.
    pub fn build(&self, assets: &dyn AssetResolver) -> Entity {
        let id = self.id().map(str::to_owned);
        match self {
            Self::Sprite(s) => build_sprite(s, id, assets),
            Self::Button(s) => build_button(s, id),
            Self::Text(s) => build_text(s, id),
            Self::Shape(s) => build_shape(s, id),
        }
    }
}

fn build_sprite(s: &SpriteSpec, id: Option<String>, assets: &dyn AssetResolver) -> Entity {
    let image = s.asset_id.as_deref().and_then(|asset_id| {
        let image = assets.image(asset_id);
        if image.is_none() {
            tracing::warn!(asset_id, "sprite image not found, drawing nothing");
        }
        image
    });
    let natural = image
        .as_ref()
        .map(|img| (f64::from(img.width), f64::from(img.height)));
    let width = s
        .width
        .or(natural.map(|n| n.0))
        .unwrap_or(DEFAULT_SPRITE_SIZE);
    let height = s
        .height
        .or(natural.map(|n| n.1))
        .unwrap_or(DEFAULT_SPRITE_SIZE);

    Entity {
        id,
        visual: Visual {
            position: Point::new(s.x, s.y),
            size: Size::new(width, height),
            rotation: s.rotation,
            opacity: s.alpha,
            scale: Vec2::new(s.scale_x, s.scale_y),
            visible: s.visible,
            color: Rgba8::WHITE,
        },
        kind: EntityKind::Sprite(Sprite {
            asset_id: s.asset_id.clone(),
            image,
        }),
    }
}

fn build_button(s: &ButtonSpec, id: Option<String>) -> Entity {
    Entity {
        id,
        visual: Visual {
            position: Point::new(s.x, s.y),
            size: Size::new(s.width, s.height),
            opacity: s.alpha,
            visible: s.visible,
            color: ColorSpec::resolve_or(s.color.as_ref(), DEFAULT_BUTTON_COLOR),
            ..Visual::default()
        },
        kind: EntityKind::Button(Button {
            label: s.text.clone(),
            style: TextStyle::new(
                s.font.clone().unwrap_or_else(default_font),
                TextAlign::Center,
            ),
            text_color: ColorSpec::resolve_or(s.text_color.as_ref(), Rgba8::WHITE),
            action: s.on_click.clone(),
        }),
    }
}

fn build_text(s: &TextSpec, id: Option<String>) -> Entity {
    Entity {
        id,
        visual: Visual {
            position: Point::new(s.x, s.y),
            opacity: s.alpha,
            visible: s.visible,
            color: ColorSpec::resolve_or(s.color.as_ref(), Rgba8::WHITE),
            ..Visual::default()
        },
        kind: EntityKind::Text(TextEntity {
            content: s.content.clone(),
            style: TextStyle::new(s.font.clone(), s.text_align),
        }),
    }
}

fn build_shape(s: &ShapeSpec, id: Option<String>) -> Entity {
    let (primitive, size) = match s.shape {
        ShapeKind::Circle => (
            Primitive::Circle { radius: s.radius },
            Size::new(s.radius * 2.0, s.radius * 2.0),
        ),
        ShapeKind::Line => (Primitive::Line, Size::new(s.width, s.height)),
        ShapeKind::Rect => (Primitive::Rect, Size::new(s.width, s.height)),
        ShapeKind::Unrecognized => {
            tracing::warn!("unknown shape primitive, drawing a rect");
            (Primitive::Rect, Size::new(s.width, s.height))
        }
    };

    Entity {
        id,
        visual: Visual {
            position: Point::new(s.x, s.y),
            size,
            rotation: s.rotation,
            opacity: s.alpha,
            visible: s.visible,
            color: ColorSpec::resolve_or(s.color.as_ref(), Rgba8::WHITE),
            ..Visual::default()
        },
        kind: EntityKind::Shape(Shape {
            primitive,
            fill: s.fill,
            stroke_width: s.stroke_width,
        }),
    }
}

/// Report and drop animations the engine cannot run. Unknown easing and
/// direction values are kept and run with their fallbacks.
pub fn checked_animation(spec: &AnimationSpec) -> Option<AnimationSpec> {
    if spec.kind == AnimationKind::Unrecognized {
        tracing::warn!("unknown or malformed animation, not attached");
        return None;
    }
    if spec.easing == Ease::Unrecognized {
        tracing::warn!(kind = ?spec.kind, "unknown easing, using linear");
    }
    if spec.kind == AnimationKind::SlideIn && spec.direction == SlideDirection::Unrecognized {
        tracing::warn!("unknown slide direction, sliding from the left");
    }
    Some(spec.clone())
}

#[cfg(test)]
#[path = "../../tests/unit/entity/factory.rs"]
mod tests;
