//! Canvas backends

mod font;
mod recording;
mod skia;

pub use font::{text_extents, GLYPH_COLUMNS, GLYPH_ROWS};
pub use recording::{DrawOp, RecordingCanvas};
pub use skia::SkiaCanvas;
