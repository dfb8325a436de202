use crate::{
    assets::store::ImageData,
    foundation::core::{Affine, Point, Rect, Rgba8},
};

/// Fill/stroke parameters shared by every drawing call.
///
/// Geometry passed to a [`Surface`] is in entity-local coordinates; the
/// `transform` maps it onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Paint {
    /// Straight-alpha color.
    pub color: Rgba8,
    /// Extra opacity in `[0, 1]` applied on top of `color`.
    pub opacity: f64,
    /// Local-to-canvas transform.
    pub transform: Affine,
}

impl Paint {
    /// Opaque paint with the identity transform.
    pub fn solid(color: Rgba8) -> Self {
        Self {
            color,
            opacity: 1.0,
            transform: Affine::IDENTITY,
        }
    }

    /// Color with `opacity` folded into its alpha channel.
    pub fn effective_color(&self) -> Rgba8 {
        self.color.with_opacity(self.opacity)
    }
}

/// Horizontal text anchoring, canvas style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    /// Anchor at the left edge.
    #[default]
    #[serde(alias = "start")]
    Left,
    /// Anchor at the centre.
    Center,
    /// Anchor at the right edge.
    #[serde(alias = "end")]
    Right,
    /// Any other value; treated as [`TextAlign::Left`].
    #[serde(other)]
    Unrecognized,
}

/// Font and alignment for a text draw.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextStyle {
    /// CSS-like font shorthand, e.g. `"bold 24px sans-serif"`.
    pub font: String,
    /// Pixel size parsed from `font`.
    pub size_px: f64,
    /// Horizontal anchoring.
    pub align: TextAlign,
}

impl TextStyle {
    /// Default font shorthand.
    pub const DEFAULT_FONT: &'static str = "24px sans-serif";

    /// Build from a font shorthand, extracting the `NNpx` size token.
    pub fn new(font: impl Into<String>, align: TextAlign) -> Self {
        let font = font.into();
        let size_px = font
            .split_whitespace()
            .find_map(|tok| tok.strip_suffix("px")?.parse::<f64>().ok())
            .unwrap_or(24.0);
        Self {
            font,
            size_px,
            align,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FONT, TextAlign::Left)
    }
}

/// Drawing collaborator used by [`crate::LayerCompositor::render`].
pub trait Surface {
    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    /// Outline an axis-aligned rectangle.
    fn stroke_rect(&mut self, rect: Rect, width: f64, paint: &Paint);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint);

    /// Outline a circle.
    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, paint: &Paint);

    /// Stroke a straight segment.
    fn line(&mut self, from: Point, to: Point, width: f64, paint: &Paint);

    /// Draw `image` stretched into `dest`. Only `paint.opacity` and
    /// `paint.transform` apply.
    fn draw_image(&mut self, image: &ImageData, dest: Rect, paint: &Paint);

    /// Draw a single line of text anchored at `at` (alphabetic baseline).
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle, paint: &Paint);
}
