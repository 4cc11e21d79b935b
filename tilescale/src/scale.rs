//! 2x nearest-neighbour scaling of one 8x8 glyph into four 8x8 quadrants.
//!
//! Each source pixel becomes a 2x2 block. Source columns 0-3 land in the
//! left quadrants and columns 4-7 in the right ones; source rows 0-3 land in
//! the top quadrants and rows 4-7 in the bottom ones.

use crate::error::ScaleError;
use crate::glyph::{Corner, Glyph, ScaledTile};

/// Each 4-bit nibble doubled horizontally into a full byte.
///
/// Source pixel `c` of the nibble (0 = leftmost) occupies output bits
/// `7 - 2c` and `6 - 2c`.
pub const DOUBLED_NIBBLE: [u8; 16] = [
    0x00, 0x03, 0x0C, 0x0F, 0x30, 0x33, 0x3C, 0x3F,
    0xC0, 0xC3, 0xCC, 0xCF, 0xF0, 0xF3, 0xFC, 0xFF,
];

/// Split one source row into its doubled left and right halves.
#[inline]
pub fn double_row(row: u8) -> (u8, u8) {
    (
        DOUBLED_NIBBLE[(row >> 4) as usize],
        DOUBLED_NIBBLE[(row & 0x0F) as usize],
    )
}

/// Scale one glyph to a 16x16 tile.
pub fn scale(glyph: &Glyph) -> ScaledTile {
    let mut tile = ScaledTile::default();

    for (r, &row) in glyph.rows().iter().enumerate() {
        let (left, right) = double_row(row);
        let (left_corner, right_corner) = if r < 4 {
            (Corner::TopLeft, Corner::TopRight)
        } else {
            (Corner::BottomLeft, Corner::BottomRight)
        };
        let dst = 2 * (r % 4);

        let q = &mut tile.quadrants[left_corner.index()];
        q[dst] = left;
        q[dst + 1] = left;
        let q = &mut tile.quadrants[right_corner.index()];
        q[dst] = right;
        q[dst + 1] = right;
    }

    tile
}

/// Scale a raw byte slice, which must hold exactly one glyph.
pub fn scale_bytes(bytes: &[u8]) -> Result<ScaledTile, ScaleError> {
    let glyph = Glyph::try_from(bytes)?;
    Ok(scale(&glyph))
}
