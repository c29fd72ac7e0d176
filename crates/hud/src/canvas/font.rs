//! 5x7 bitmap font
//!
//! Covers what the HUD prints: digits, sign, decimal point, units and space.
//! Unknown characters render blank but still advance.

use contracts::TextExtents;

pub const GLYPH_COLUMNS: usize = 5;
pub const GLYPH_ROWS: usize = 7;

/// Cells per character including the spacing column
const ADVANCE: usize = GLYPH_COLUMNS + 1;

/// Rows top to bottom, bit 4 is the leftmost column
pub(crate) fn glyph(ch: char) -> [u8; GLYPH_ROWS] {
    match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10011, 0b10001, 0b10001, 0b01110],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001],
        _ => [0; GLYPH_ROWS],
    }
}

/// Side of one font cell for a given text size (cap height)
pub(crate) fn cell(size: f64) -> f64 {
    size / GLYPH_ROWS as f64
}

/// Filled cells of `text` as `(x, y)` offsets in cells from the top-left
pub(crate) fn cells(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    text.chars().enumerate().flat_map(|(i, ch)| {
        let rows = glyph(ch);
        (0..GLYPH_ROWS).flat_map(move |row| {
            (0..GLYPH_COLUMNS)
                .filter(move |col| (rows[row] >> (GLYPH_COLUMNS - 1 - col)) & 1 == 1)
                .map(move |col| (i * ADVANCE + col, row))
        })
    })
}

/// Box of `text` at `size`, without trailing spacing
pub fn text_extents(text: &str, size: f64) -> TextExtents {
    let n = text.chars().count();
    if n == 0 {
        return TextExtents::default();
    }
    TextExtents {
        width: (n * ADVANCE - 1) as f64 * cell(size),
        height: size,
    }
}
