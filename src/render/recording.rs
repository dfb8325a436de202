use crate::{
    assets::store::ImageData,
    foundation::core::{Point, Rect},
    render::surface::{Paint, Surface, TextStyle},
};

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// [`Surface::fill_rect`].
    FillRect {
        /// Local rectangle.
        rect: Rect,
        /// Paint.
        paint: Paint,
    },
    /// [`Surface::stroke_rect`].
    StrokeRect {
        /// Local rectangle.
        rect: Rect,
        /// Outline width.
        width: f64,
        /// Paint.
        paint: Paint,
    },
    /// [`Surface::fill_circle`].
    FillCircle {
        /// Local centre.
        center: Point,
        /// Radius.
        radius: f64,
        /// Paint.
        paint: Paint,
    },
    /// [`Surface::stroke_circle`].
    StrokeCircle {
        /// Local centre.
        center: Point,
        /// Radius.
        radius: f64,
        /// Outline width.
        width: f64,
        /// Paint.
        paint: Paint,
    },
    /// [`Surface::line`].
    Line {
        /// Start.
        from: Point,
        /// End.
        to: Point,
        /// Stroke width.
        width: f64,
        /// Paint.
        paint: Paint,
    },
    /// [`Surface::draw_image`].
    Image {
        /// Source pixel width.
        width: u32,
        /// Source pixel height.
        height: u32,
        /// Destination rectangle.
        dest: Rect,
        /// Paint.
        paint: Paint,
    },
    /// [`Surface::fill_text`].
    Text {
        /// Content.
        text: String,
        /// Anchor.
        at: Point,
        /// Font and alignment.
        style: TextStyle,
        /// Paint.
        paint: Paint,
    },
}

/// Surface that keeps a display list instead of pixels.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands in the order they were issued.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text strings drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Take the recorded commands, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            paint: *paint,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, paint: &Paint) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            width,
            paint: *paint,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            paint: *paint,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, paint: &Paint) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            paint: *paint,
        });
    }

    fn line(&mut self, from: Point, to: Point, width: f64, paint: &Paint) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            paint: *paint,
        });
    }

    fn draw_image(&mut self, image: &ImageData, dest: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::Image {
            width: image.width,
            height: image.height,
            dest,
            paint: *paint,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle, paint: &Paint) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            at,
            style: style.clone(),
            paint: *paint,
        });
    }
}
