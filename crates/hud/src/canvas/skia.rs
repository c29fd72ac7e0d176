//! Raster canvas on tiny-skia
//!
//! Paths are flattened to device coordinates as they are built, arcs become
//! polylines. Text is drawn with the bitmap font.

use std::f64::consts::TAU;
use std::path::Path;

use contracts::{Canvas, Color, ContractError, Source, TextExtents};
use tiny_skia::{
    FillRule, GradientStop, Mask, Paint, PathBuilder, Pixmap, Point, SpreadMode, Stroke, Transform,
};
use tracing::debug;

use super::font;

/// Maximum angle covered by one arc segment
const ARC_STEP: f64 = TAU / 128.0;

/// User to device mapping in tiny-skia's single precision
fn map(transform: &Transform, x: f64, y: f64) -> (f32, f32) {
    let mut point = [Point::from_xy(x as f32, y as f32)];
    transform.map_points(&mut point);
    (point[0].x, point[0].y)
}

/// Mean linear scale, used for line widths
fn line_scale(transform: &Transform) -> f64 {
    f64::from(transform.sx * transform.sy - transform.kx * transform.ky)
        .abs()
        .sqrt()
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    Move(f32, f32),
    Line(f32, f32),
    Close,
}

/// Paint source fixed to device space when it was set
#[derive(Debug, Clone)]
enum DeviceSource {
    Solid(tiny_skia::Color),
    Linear {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
}

#[derive(Debug, Clone)]
struct GraphicsState {
    transform: Transform,
    source: DeviceSource,
    line_width: f64,
    clip: Option<Mask>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            source: DeviceSource::Solid(tiny_skia::Color::BLACK),
            line_width: 2.0,
            clip: None,
        }
    }
}

pub struct SkiaCanvas {
    pixmap: Pixmap,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: Vec<Segment>,
    /// Current point in user space
    current: Option<(f64, f64)>,
}

impl SkiaCanvas {
    /// # Errors
    /// - Zero or oversized dimensions
    pub fn new(width: u32, height: u32) -> Result<Self, ContractError> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            ContractError::canvas(format!("cannot allocate {width}x{height} surface"))
        })?;
        Ok(Self {
            pixmap,
            state: GraphicsState::default(),
            stack: Vec::new(),
            path: Vec::new(),
            current: None,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight (non-premultiplied) RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Straight RGBA rows, top to bottom
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ContractError> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.pixmap.width(),
            self.pixmap.height(),
            image::ColorType::Rgba8,
        )
        .map_err(std::io::Error::other)?;
        debug!(path = %path.display(), "frame written");
        Ok(())
    }

    fn push(&mut self, segment: Segment) {
        self.path.push(segment);
    }

    fn user_move_to(&mut self, x: f64, y: f64) {
        let (dx, dy) = map(&self.state.transform, x, y);
        self.push(Segment::Move(dx, dy));
        self.current = Some((x, y));
    }

    fn user_line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            return self.user_move_to(x, y);
        }
        let (dx, dy) = map(&self.state.transform, x, y);
        self.push(Segment::Line(dx, dy));
        self.current = Some((x, y));
    }

    fn close_path(&mut self) {
        self.push(Segment::Close);
    }

    fn build_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        for segment in &self.path {
            match *segment {
                Segment::Move(x, y) => pb.move_to(x, y),
                Segment::Line(x, y) => pb.line_to(x, y),
                Segment::Close => pb.close(),
            }
        }
        pb.finish()
    }

    fn take_path(&mut self) -> Option<tiny_skia::Path> {
        let path = self.build_path();
        self.path.clear();
        self.current = None;
        path
    }

    fn paint(&self) -> Result<Paint<'static>, ContractError> {
        let mut paint = Paint {
            anti_alias: true,
            ..Paint::default()
        };
        match &self.state.source {
            DeviceSource::Solid(color) => paint.set_color(*color),
            DeviceSource::Linear { start, end, stops } => {
                paint.shader = tiny_skia::LinearGradient::new(
                    *start,
                    *end,
                    stops.clone(),
                    SpreadMode::Pad,
                    Transform::identity(),
                )
                .ok_or_else(|| ContractError::canvas("degenerate gradient"))?;
            }
        }
        Ok(paint)
    }

    fn fill_current(&mut self, path: &tiny_skia::Path) -> Result<(), ContractError> {
        let paint = self.paint()?;
        self.pixmap.fill_path(
            path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
        Ok(())
    }
}

fn skia_color(color: &Color) -> tiny_skia::Color {
    let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    tiny_skia::Color::from_rgba8(
        channel(color.r),
        channel(color.g),
        channel(color.b),
        channel(color.a),
    )
}

impl Canvas for SkiaCanvas {
    fn size(&self) -> (f64, f64) {
        (
            f64::from(self.pixmap.width()),
            f64::from(self.pixmap.height()),
        )
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.pre_translate(dx as f32, dy as f32);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.pre_scale(sx as f32, sy as f32);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform = self.state.transform.pre_rotate(radians.to_degrees() as f32);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.user_move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.user_line_to(x, y);
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, angle1: f64, angle2: f64) {
        let mut end = angle2;
        while end < angle1 {
            end += TAU;
        }
        let steps = ((end - angle1) / ARC_STEP).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let a = angle1 + (end - angle1) * i as f64 / steps as f64;
            let (x, y) = (cx + radius * a.cos(), cy + radius * a.sin());
            if i == 0 && self.current.is_none() {
                self.user_move_to(x, y);
            } else {
                self.user_line_to(x, y);
            }
        }
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.user_move_to(x, y);
        self.user_line_to(x + width, y);
        self.user_line_to(x + width, y + height);
        self.user_line_to(x, y + height);
        self.close_path();
    }

    fn set_source(&mut self, source: Source) {
        self.state.source = match source {
            Source::Solid(color) => DeviceSource::Solid(skia_color(&color)),
            Source::Linear(gradient) => {
                let t = &self.state.transform;
                let (sx, sy) = map(t, gradient.start.0, gradient.start.1);
                let (ex, ey) = map(t, gradient.end.0, gradient.end.1);
                DeviceSource::Linear {
                    start: Point::from_xy(sx, sy),
                    end: Point::from_xy(ex, ey),
                    stops: gradient
                        .stops
                        .iter()
                        .map(|s| GradientStop::new(s.offset as f32, skia_color(&s.color)))
                        .collect(),
                }
            }
        };
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn stroke(&mut self) -> Result<(), ContractError> {
        let Some(path) = self.take_path() else {
            return Ok(());
        };
        let paint = self.paint()?;
        let stroke = Stroke {
            width: (self.state.line_width * line_scale(&self.state.transform)) as f32,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            Transform::identity(),
            self.state.clip.as_ref(),
        );
        Ok(())
    }

    fn fill(&mut self) -> Result<(), ContractError> {
        match self.take_path() {
            Some(path) => self.fill_current(&path),
            None => Ok(()),
        }
    }

    fn fill_preserve(&mut self) -> Result<(), ContractError> {
        match self.build_path() {
            Some(path) => self.fill_current(&path),
            None => Ok(()),
        }
    }

    fn clip(&mut self) -> Result<(), ContractError> {
        let path = self.take_path();
        let clip = match (self.state.clip.take(), path) {
            (Some(mut mask), Some(path)) => {
                mask.intersect_path(&path, FillRule::Winding, true, Transform::identity());
                mask
            }
            (None, Some(path)) => {
                let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())
                    .ok_or_else(|| ContractError::canvas("cannot allocate clip mask"))?;
                mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
                mask
            }
            // an empty path clips everything
            (_, None) => Mask::new(self.pixmap.width(), self.pixmap.height())
                .ok_or_else(|| ContractError::canvas("cannot allocate clip mask"))?,
        };
        self.state.clip = Some(clip);
        Ok(())
    }

    fn text_path(&mut self, text: &str, size: f64) {
        let (x0, y0) = self.current.unwrap_or((0.0, 0.0));
        let cell = font::cell(size);
        let top = y0 - size;
        for (cx, cy) in font::cells(text) {
            self.rectangle(x0 + cx as f64 * cell, top + cy as f64 * cell, cell, cell);
        }
        let advance = font::text_extents(text, size).width + cell;
        self.user_move_to(x0 + advance, y0);
    }

    fn text_extents(&self, text: &str, size: f64) -> TextExtents {
        font::text_extents(text, size)
    }
}
