use std::{path::Path, sync::Arc};

use vello_cpu::kurbo::Shape as _;

use crate::{
    assets::{decode::unpremultiply_rgba8_in_place, store::ImageData},
    foundation::{
        core::{Affine, Point, Rect, Rgba8},
        error::{StageError, StageResult},
    },
    render::surface::{Paint, Surface, TextStyle},
};

const CIRCLE_TOLERANCE: f64 = 0.1;

/// Rendered frame in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// RGBA at `(x, y)`, still premultiplied.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Encode as PNG (straight alpha).
    #[tracing::instrument(skip(self), fields(width = self.width, height = self.height))]
    pub fn write_png(&self, path: &Path) -> StageResult<()> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::save_buffer_with_format(
            path,
            &straight,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| StageError::render(format!("write png '{}': {e}", path.display())))
    }
}

/// Software rasterizer surface backed by `vello_cpu`.
///
/// Text is not shaped here; text draws are counted and skipped. Use a
/// [`crate::render::recording::RecordingSurface`] to inspect labels.
pub struct PixmapSurface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    skipped_text: usize,
}

impl PixmapSurface {
    /// Surface of `width` x `height` pixels, pre-filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba8) -> StageResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| StageError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| StageError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(StageError::render("surface dimensions must be non-zero"));
        }

        let mut surface = Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
            skipped_text: 0,
        };
        if background.a > 0 {
            let full = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
            surface.fill_rect(full, &Paint::solid(background));
        }
        Ok(surface)
    }

    /// Number of text draws that were skipped.
    pub fn skipped_text(&self) -> usize {
        self.skipped_text
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        }
    }

    fn begin_solid(&mut self, paint: &Paint) {
        let c = paint.effective_color();
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(paint.transform));
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }

    fn begin_stroke(&mut self, width: f64, paint: &Paint) {
        self.begin_solid(paint);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
    }
}

impl Surface for PixmapSurface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.begin_solid(paint);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, paint: &Paint) {
        self.begin_stroke(width, paint);
        self.ctx.stroke_rect(&rect_to_cpu(rect));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        self.begin_solid(paint);
        let circle = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius);
        self.ctx.fill_path(&circle.to_path(CIRCLE_TOLERANCE));
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, paint: &Paint) {
        self.begin_stroke(width, paint);
        let circle = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius);
        self.ctx.stroke_path(&circle.to_path(CIRCLE_TOLERANCE));
    }

    fn line(&mut self, from: Point, to: Point, width: f64, paint: &Paint) {
        self.begin_stroke(width, paint);
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(point_to_cpu(from));
        path.line_to(point_to_cpu(to));
        self.ctx.stroke_path(&path);
    }

    fn draw_image(&mut self, image: &ImageData, dest: Rect, paint: &Paint) {
        if image.width == 0 || image.height == 0 || dest.is_zero_area() {
            return;
        }
        let pixmap = match image_to_pixmap(image) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(%err, "image skipped");
                return;
            }
        };
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        let fit = Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(dest.width() / w, dest.height() / h);

        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(paint.transform * fit));
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        let opacity = paint.opacity.clamp(0.0, 1.0) as f32;
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
    }

    fn fill_text(&mut self, text: &str, _at: Point, _style: &TextStyle, _paint: &Paint) {
        tracing::trace!(text, "text draw skipped by pixmap surface");
        self.skipped_text += 1;
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_to_pixmap(image: &ImageData) -> StageResult<vello_cpu::Pixmap> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| StageError::render("image width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| StageError::render("image height exceeds u16"))?;
    let expected = image.width as usize * image.height as usize * 4;
    if image.rgba8_premul.len() != expected {
        return Err(StageError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = image
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
