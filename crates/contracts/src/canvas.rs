//! Canvas trait - HUD output interface
//!
//! The vector-drawing capability the HUD strategies render through. Semantics follow the
//! usual path/graphics-state model: path coordinates are mapped by the transform that is
//! current when they are added, `stroke`/`fill`/`clip` consume the current path,
//! `save`/`restore` push and pop transform, source, line width and clip together.

use crate::ContractError;

/// RGBA colour, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgba(1.0, 0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::rgba(1.0, 1.0, 0.0, 1.0);
    pub const GREEN: Self = Self::rgba(0.0, 1.0, 0.0, 1.0);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// From packed `0xRRGGBBAA`
    pub const fn from_rgba_u32(rgba: u32) -> Self {
        Self {
            r: ((rgba >> 24) & 0xff) as f64 / 255.0,
            g: ((rgba >> 16) & 0xff) as f64 / 255.0,
            b: ((rgba >> 8) & 0xff) as f64 / 255.0,
            a: (rgba & 0xff) as f64 / 255.0,
        }
    }
}

/// Gradient colour stop, `offset` in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// Linear gradient between two points in user space
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: (f64, f64),
    pub end: (f64, f64),
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            start,
            end,
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }
}

/// Paint source for stroke and fill
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Solid(Color),
    Linear(LinearGradient),
}

impl From<Color> for Source {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl From<LinearGradient> for Source {
    fn from(gradient: LinearGradient) -> Self {
        Self::Linear(gradient)
    }
}

/// Measured text box in user units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtents {
    pub width: f64,
    pub height: f64,
}

/// 2D vector canvas
pub trait Canvas {
    /// Surface size in device pixels
    fn size(&self) -> (f64, f64);

    /// Clear the whole surface to transparent
    fn clear(&mut self);

    /// Push graphics state
    fn save(&mut self);

    /// Pop graphics state; unbalanced restores are ignored
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    fn scale(&mut self, sx: f64, sy: f64);

    /// Rotate user space, angle in radians
    fn rotate(&mut self, radians: f64);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// Circular arc, angles in radians, drawn in the positive direction
    fn arc(&mut self, cx: f64, cy: f64, radius: f64, angle1: f64, angle2: f64);

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64);

    fn set_source(&mut self, source: Source);

    fn set_line_width(&mut self, width: f64);

    /// Stroke and clear the current path
    fn stroke(&mut self) -> Result<(), ContractError>;

    /// Fill and clear the current path
    fn fill(&mut self) -> Result<(), ContractError>;

    /// Fill and keep the current path
    fn fill_preserve(&mut self) -> Result<(), ContractError>;

    /// Intersect the clip region with the current path and clear it
    fn clip(&mut self) -> Result<(), ContractError>;

    /// Add glyph outlines for `text` to the path, baseline at the current point
    fn text_path(&mut self, text: &str, size: f64);

    fn text_extents(&self, text: &str, size: f64) -> TextExtents;
}

/// Run `draw` between `save` and `restore`
///
/// The state is restored whether or not `draw` fails, so the canvas stack stays balanced.
pub fn with_saved<C, T, E, F>(canvas: &mut C, draw: F) -> Result<T, E>
where
    C: Canvas + ?Sized,
    F: FnOnce(&mut C) -> Result<T, E>,
{
    canvas.save();
    let result = draw(canvas);
    canvas.restore();
    result
}
