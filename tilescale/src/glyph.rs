use crate::error::ScaleError;

/// Bytes in one 8x8 glyph (one byte per row).
pub const GLYPH_BYTES: usize = 8;

/// Bytes in one 16x16 scaled tile (four quadrants).
pub const TILE_BYTES: usize = 4 * GLYPH_BYTES;

/// One 8x8 quarter of a scaled tile, same bit layout as a [`Glyph`].
pub type Quadrant = [u8; GLYPH_BYTES];

/// An 8x8 1-bit glyph, one byte per row, bit 7 = leftmost pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Glyph(pub [u8; GLYPH_BYTES]);

impl Glyph {
    /// Whether the pixel at column `x`, row `y` is set.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.0[y] & (0x80 >> x) != 0
    }

    pub fn rows(&self) -> &[u8; GLYPH_BYTES] {
        &self.0
    }

    /// Number of foreground pixels.
    pub fn popcount(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }
}

impl TryFrom<&[u8]> for Glyph {
    type Error = ScaleError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let rows: [u8; GLYPH_BYTES] = bytes
            .try_into()
            .map_err(|_| ScaleError::InvalidInput(bytes.len()))?;
        Ok(Glyph(rows))
    }
}

/// One of the four 8x8 characters making up a 16x16 tile.
///
/// The discriminant is both the quadrant's index in a [`ScaledTile`] and its
/// character-code offset from the tile's base destination code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Short label used in generated headers.
    pub fn label(self) -> &'static str {
        match self {
            Corner::TopLeft => "TL",
            Corner::TopRight => "TR",
            Corner::BottomLeft => "BL",
            Corner::BottomRight => "BR",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A 16x16 tile stored as four quadrants in TL, TR, BL, BR order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScaledTile {
    pub quadrants: [Quadrant; 4],
}

impl ScaledTile {
    pub fn quadrant(&self, corner: Corner) -> &Quadrant {
        &self.quadrants[corner.index()]
    }

    /// Whether the pixel at column `x`, row `y` (both 0..16) is set.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let corner = match (y >= GLYPH_BYTES, x >= 8) {
            (false, false) => Corner::TopLeft,
            (false, true) => Corner::TopRight,
            (true, false) => Corner::BottomLeft,
            (true, true) => Corner::BottomRight,
        };
        self.quadrant(corner)[y % GLYPH_BYTES] & (0x80 >> (x % 8)) != 0
    }

    /// The 32 bytes in output order: TL || TR || BL || BR.
    pub fn to_bytes(&self) -> [u8; TILE_BYTES] {
        let mut out = [0u8; TILE_BYTES];
        for (chunk, quadrant) in out.chunks_exact_mut(GLYPH_BYTES).zip(&self.quadrants) {
            chunk.copy_from_slice(quadrant);
        }
        out
    }

    pub fn popcount(&self) -> u32 {
        self.quadrants
            .iter()
            .flat_map(|q| q.iter())
            .map(|b| b.count_ones())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_from_short_slice_is_invalid_input() {
        let err = Glyph::try_from(&[0u8; 7][..]).unwrap_err();
        assert_eq!(err, ScaleError::InvalidInput(7));
    }

    #[test]
    fn glyph_from_long_slice_is_invalid_input() {
        let err = Glyph::try_from(&[0u8; 9][..]).unwrap_err();
        assert_eq!(err, ScaleError::InvalidInput(9));
    }

    #[test]
    fn glyph_pixel_msb_is_leftmost() {
        let g = Glyph([0b1000_0001, 0, 0, 0, 0, 0, 0, 0]);
        assert!(g.pixel(0, 0));
        assert!(g.pixel(7, 0));
        assert!(!g.pixel(1, 0));
        assert!(!g.pixel(0, 1));
        assert_eq!(g.popcount(), 2);
    }

    #[test]
    fn corner_labels_and_offsets() {
        let labels: Vec<_> = Corner::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["TL", "TR", "BL", "BR"]);
        let offsets: Vec<_> = Corner::ALL.iter().map(|c| c.index()).collect();
        assert_eq!(offsets, [0, 1, 2, 3]);
    }

    #[test]
    fn to_bytes_concatenates_in_corner_order() {
        let tile = ScaledTile {
            quadrants: [[1; 8], [2; 8], [3; 8], [4; 8]],
        };
        let bytes = tile.to_bytes();
        assert_eq!(&bytes[0..8], &[1; 8]);
        assert_eq!(&bytes[8..16], &[2; 8]);
        assert_eq!(&bytes[16..24], &[3; 8]);
        assert_eq!(&bytes[24..32], &[4; 8]);
    }

    #[test]
    fn tile_pixel_addresses_quadrants() {
        let mut tile = ScaledTile::default();
        tile.quadrants[Corner::BottomRight.index()][7] = 0x01;
        assert!(tile.pixel(15, 15));
        assert!(!tile.pixel(7, 15));
        assert!(!tile.pixel(15, 7));
    }
}
