//! Runtime entities.
//!
//! Every entity kind shares one [`Visual`] block and one render/click
//! surface, so the compositor and click dispatch never branch on kind.

use std::sync::Arc;

use crate::{
    assets::store::ImageData,
    foundation::core::{Affine, Point, Rect, Rgba8, Size, Vec2},
    render::surface::{Paint, Surface, TextAlign, TextStyle},
    scene::action::Action,
};

/// Mutable visual attributes common to every entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    /// Top-left corner (circle/text: anchor point).
    pub position: Point,
    /// Width and height.
    pub size: Size,
    /// Rotation in radians around the entity's pivot.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Per-axis scale around the entity's pivot.
    pub scale: Vec2,
    /// Hidden entities draw nothing and are not clickable.
    pub visible: bool,
    /// Primary color.
    pub color: Rgba8,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            size: Size::ZERO,
            rotation: 0.0,
            opacity: 1.0,
            scale: Vec2::new(1.0, 1.0),
            visible: true,
            color: Rgba8::WHITE,
        }
    }
}

/// Image-backed entity.
#[derive(Clone, Debug)]
pub struct Sprite {
    /// Asset id the image was resolved from.
    pub asset_id: Option<String>,
    /// Resolved image; `None` when resolution failed.
    pub image: Option<Arc<ImageData>>,
}

/// Clickable labelled rectangle.
#[derive(Clone, Debug)]
pub struct Button {
    /// Label text.
    pub label: String,
    /// Label font.
    pub style: TextStyle,
    /// Label color.
    pub text_color: Rgba8,
    /// Action dispatched on click.
    pub action: Option<Action>,
}

/// Single line of text.
#[derive(Clone, Debug)]
pub struct TextEntity {
    /// Content.
    pub content: String,
    /// Font and alignment.
    pub style: TextStyle,
}

/// Geometric primitive drawn by a [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// `size`-sized rectangle at `position`.
    Rect,
    /// Circle centred at `position`.
    Circle {
        /// Radius in pixels.
        radius: f64,
    },
    /// Segment from `position` to `position + size`.
    Line,
}

/// Vector shape.
#[derive(Clone, Debug)]
pub struct Shape {
    /// Which primitive.
    pub primitive: Primitive,
    /// Fill (true) or outline (false). Lines are always stroked.
    pub fill: bool,
    /// Outline width.
    pub stroke_width: f64,
}

/// Kind-specific payload.
#[derive(Clone, Debug)]
pub enum EntityKind {
    /// Sprite.
    Sprite(Sprite),
    /// Button.
    Button(Button),
    /// Text.
    Text(TextEntity),
    /// Shape.
    Shape(Shape),
}

/// A renderable, optionally clickable scene object.
#[derive(Clone, Debug)]
pub struct Entity {
    /// Document id, if one was assigned.
    pub id: Option<String>,
    /// Shared visual attributes.
    pub visual: Visual,
    /// Kind-specific data.
    pub kind: EntityKind,
}

impl Entity {
    /// Short kind name for logs.
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            EntityKind::Sprite(_) => "sprite",
            EntityKind::Button(_) => "button",
            EntityKind::Text(_) => "text",
            EntityKind::Shape(_) => "shape",
        }
    }

    /// Action attached to this entity, if it is clickable.
    pub fn action(&self) -> Option<&Action> {
        match &self.kind {
            EntityKind::Button(b) => b.action.as_ref(),
            _ => None,
        }
    }

    /// Whether the entity takes part in click dispatch.
    pub fn is_clickable(&self) -> bool {
        matches!(self.kind, EntityKind::Button(_))
    }

    /// Canvas-space bounds before rotation and scale.
    pub fn bounds(&self) -> Rect {
        let v = &self.visual;
        match &self.kind {
            EntityKind::Shape(Shape {
                primitive: Primitive::Circle { radius },
                ..
            }) => Rect::new(
                v.position.x - radius,
                v.position.y - radius,
                v.position.x + radius,
                v.position.y + radius,
            ),
            _ => Rect::from_origin_size(v.position, v.size),
        }
    }

    /// Point-in-entity test used for clicks, against the entity as drawn:
    /// rotation and scale apply. Hidden or fully collapsed entities never hit.
    pub fn hit_test(&self, point: Point) -> bool {
        if !self.visual.visible || !self.is_clickable() {
            return false;
        }
        let transform = self.transform();
        if transform.determinant().abs() < f64::EPSILON {
            return false;
        }
        let local = transform.inverse() * point;
        (self.bounds() - self.visual.position.to_vec2()).contains(local)
    }

    fn pivot(&self) -> Vec2 {
        match &self.kind {
            EntityKind::Text(_)
            | EntityKind::Shape(Shape {
                primitive: Primitive::Circle { .. },
                ..
            }) => Vec2::ZERO,
            _ => self.visual.size.to_vec2() * 0.5,
        }
    }

    /// Local-to-canvas transform: translate to position, then rotate and
    /// scale around the pivot.
    pub fn transform(&self) -> Affine {
        let v = &self.visual;
        let pivot = self.pivot();
        Affine::translate(v.position.to_vec2())
            * Affine::translate(pivot)
            * Affine::rotate(v.rotation)
            * Affine::scale_non_uniform(v.scale.x, v.scale.y)
            * Affine::translate(-pivot)
    }

    /// Draw the entity in local coordinates through `surface`.
    pub fn render(&self, surface: &mut dyn Surface) {
        let v = &self.visual;
        if !v.visible || v.opacity <= 0.0 {
            return;
        }
        let paint = Paint {
            color: v.color,
            opacity: v.opacity.min(1.0),
            transform: self.transform(),
        };
        let local = Rect::from_origin_size(Point::ZERO, v.size);

        match &self.kind {
            EntityKind::Sprite(sprite) => {
                if let Some(image) = &sprite.image {
                    surface.draw_image(image, local, &paint);
                }
            }
            EntityKind::Button(button) => {
                surface.fill_rect(local, &paint);
                let label_style = TextStyle {
                    align: TextAlign::Center,
                    ..button.style.clone()
                };
                let baseline = Point::new(
                    v.size.width / 2.0,
                    v.size.height / 2.0 + label_style.size_px * 0.35,
                );
                let label_paint = Paint {
                    color: button.text_color,
                    ..paint
                };
                surface.fill_text(&button.label, baseline, &label_style, &label_paint);
            }
            EntityKind::Text(text) => {
                surface.fill_text(&text.content, Point::ZERO, &text.style, &paint);
            }
            EntityKind::Shape(shape) => match shape.primitive {
                Primitive::Rect if shape.fill => surface.fill_rect(local, &paint),
                Primitive::Rect => surface.stroke_rect(local, shape.stroke_width, &paint),
                Primitive::Circle { radius } if shape.fill => {
                    surface.fill_circle(Point::ZERO, radius, &paint)
                }
                Primitive::Circle { radius } => {
                    surface.stroke_circle(Point::ZERO, radius, shape.stroke_width, &paint)
                }
                Primitive::Line => surface.line(
                    Point::ZERO,
                    Point::new(v.size.width, v.size.height),
                    shape.stroke_width,
                    &paint,
                ),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/model.rs"]
mod tests;
