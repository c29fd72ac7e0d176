//! Recording canvas
//!
//! Keeps every call as a `DrawOp` instead of drawing. Used to check what a
//! strategy drew and that save/restore stays balanced.

use std::mem::discriminant;

use contracts::{Canvas, ContractError, Source, TextExtents};

use super::font;

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Scale { sx: f64, sy: f64 },
    Rotate { radians: f64 },
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Arc { cx: f64, cy: f64, radius: f64, angle1: f64, angle2: f64 },
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    SetSource(Source),
    SetLineWidth(f64),
    Stroke,
    Fill,
    FillPreserve,
    Clip,
    TextPath { text: String, size: f64 },
}

#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    ops: Vec<DrawOp>,
    depth: usize,
    fail_on: Option<DrawOp>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            depth: 0,
            fail_on: None,
        }
    }

    /// Fail every stroke, fill or clip of the same kind as `op`
    pub fn failing_on(mut self, op: DrawOp) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Current save depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Angles of all recorded rotations, in call order
    pub fn rotations(&self) -> Vec<f64> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rotate { radians } => Some(*radians),
                _ => None,
            })
            .collect()
    }

    fn paint(&mut self, op: DrawOp) -> Result<(), ContractError> {
        let fails = self
            .fail_on
            .as_ref()
            .is_some_and(|f| discriminant(f) == discriminant(&op));
        let name = format!("{op:?}");
        self.ops.push(op);
        if fails {
            return Err(ContractError::canvas(format!("{name} failed on request")));
        }
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(DrawOp::Scale { sx, sy });
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(DrawOp::Rotate { radians });
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo { x, y });
    }

    fn arc(&mut self, cx: f64, cy: f64, radius: f64, angle1: f64, angle2: f64) {
        self.ops.push(DrawOp::Arc {
            cx,
            cy,
            radius,
            angle1,
            angle2,
        });
    }

    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::Rectangle {
            x,
            y,
            width,
            height,
        });
    }

    fn set_source(&mut self, source: Source) {
        self.ops.push(DrawOp::SetSource(source));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::SetLineWidth(width));
    }

    fn stroke(&mut self) -> Result<(), ContractError> {
        self.paint(DrawOp::Stroke)
    }

    fn fill(&mut self) -> Result<(), ContractError> {
        self.paint(DrawOp::Fill)
    }

    fn fill_preserve(&mut self) -> Result<(), ContractError> {
        self.paint(DrawOp::FillPreserve)
    }

    fn clip(&mut self) -> Result<(), ContractError> {
        self.paint(DrawOp::Clip)
    }

    fn text_path(&mut self, text: &str, size: f64) {
        self.ops.push(DrawOp::TextPath {
            text: text.to_string(),
            size,
        });
    }

    fn text_extents(&self, text: &str, size: f64) -> TextExtents {
        font::text_extents(text, size)
    }
}
