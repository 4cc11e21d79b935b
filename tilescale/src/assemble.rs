//! Drive the scaler over a whole catalog.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use log::debug;

use crate::catalog::{Catalog, TileEntry};
use crate::error::ScaleError;
use crate::glyph::{ScaledTile, GLYPH_BYTES, TILE_BYTES};
use crate::scale::scale;
use crate::source::GlyphSource;

/// A scaled tile together with the catalog entry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTile<'a> {
    pub entry: &'a TileEntry,
    pub tile: ScaledTile,
}

/// Scale one catalog entry.
pub fn assemble_entry<'a>(
    source: &GlyphSource,
    entry: &'a TileEntry,
) -> Result<AssembledTile<'a>, ScaleError> {
    let glyph = source
        .glyph_at(entry.source_offset)
        .ok_or_else(|| ScaleError::OutOfRange {
            name: entry.name.clone(),
            offset: entry.source_offset,
            end: entry.source_offset.saturating_add(GLYPH_BYTES),
            len: source.len(),
        })?;
    let tile = scale(&glyph);
    debug!(
        "{} (code {:#04X}) from offset {}",
        entry.name, entry.destination_code, entry.source_offset
    );
    Ok(AssembledTile { entry, tile })
}

/// Scale every catalog entry, in catalog order.
///
/// Fails on the first entry whose glyph lies outside `source`; no partial
/// result is returned.
pub fn assemble<'a>(
    source: &GlyphSource,
    catalog: &'a Catalog,
) -> Result<Vec<AssembledTile<'a>>, ScaleError> {
    // Indexed collect keeps catalog order regardless of completion order.
    #[cfg(feature = "parallel")]
    let tiles = catalog
        .entries
        .par_iter()
        .map(|entry| assemble_entry(source, entry))
        .collect::<Result<Vec<_>, _>>();

    #[cfg(not(feature = "parallel"))]
    let tiles = catalog
        .entries
        .iter()
        .map(|entry| assemble_entry(source, entry))
        .collect::<Result<Vec<_>, _>>();

    let tiles = tiles?;
    debug!("assembled {} tiles for {}", tiles.len(), catalog.name);
    Ok(tiles)
}

/// Concatenate assembled tiles into the output byte sequence.
pub fn flatten(tiles: &[AssembledTile<'_>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(tiles.len() * TILE_BYTES);
    for t in tiles {
        out.extend_from_slice(&t.tile.to_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, TileEntry};
    use crate::glyph::Corner;
    use crate::source;

    fn one_tile_catalog(offset: usize) -> Catalog {
        Catalog::new("test", "g", vec![TileEntry::new("only", offset, 0x00)])
    }

    #[test]
    fn zero_source_gives_zero_tile() {
        let src = GlyphSource::new(vec![0; 4 * GLYPH_BYTES]);
        let cat = one_tile_catalog(0);
        let tiles = assemble(&src, &cat).unwrap();
        assert_eq!(tiles.len(), 1);
        assert_eq!(flatten(&tiles), vec![0u8; TILE_BYTES]);
    }

    #[test]
    fn single_full_row_glyph() {
        let src = GlyphSource::new(vec![0xFF, 0, 0, 0, 0, 0, 0, 0]);
        let cat = one_tile_catalog(0);
        let tiles = assemble(&src, &cat).unwrap();
        let t = &tiles[0].tile;
        assert_eq!(t.quadrant(Corner::TopLeft), &[0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
        assert_eq!(t.quadrant(Corner::TopRight), &[0xFF, 0xFF, 0, 0, 0, 0, 0, 0]);
        assert_eq!(t.quadrant(Corner::BottomLeft), &[0; 8]);
        assert_eq!(t.quadrant(Corner::BottomRight), &[0; 8]);
    }

    #[test]
    fn output_follows_catalog_order() {
        let src = GlyphSource::new(vec![
            0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // glyph 0
            0, 0, 0, 0, 0, 0, 0, 0, // glyph 1
        ]);
        let cat = Catalog::new(
            "order",
            "g",
            vec![
                TileEntry::new("blank", 8, 0x00),
                TileEntry::new("solid", 0, 0x04),
                TileEntry::new("blank again", 8, 0x08),
            ],
        );
        let tiles = assemble(&src, &cat).unwrap();
        let names: Vec<&str> = tiles.iter().map(|t| t.entry.name.as_str()).collect();
        assert_eq!(names, ["blank", "solid", "blank again"]);

        let bytes = flatten(&tiles);
        assert_eq!(bytes.len(), 3 * TILE_BYTES);
        assert!(bytes[..32].iter().all(|&b| b == 0));
        assert!(bytes[32..64].iter().all(|&b| b == 0xFF));
        assert!(bytes[64..].iter().all(|&b| b == 0));
    }

    #[test]
    fn out_of_range_entry_fails_whole_run() {
        let src = GlyphSource::new(vec![0; 16]);
        let cat = Catalog::new(
            "oob",
            "g",
            vec![
                TileEntry::new("fine", 0, 0x00),
                TileEntry::new("past end", 12, 0x04),
                TileEntry::new("also fine", 8, 0x08),
            ],
        );
        assert_eq!(
            assemble(&src, &cat),
            Err(ScaleError::OutOfRange {
                name: "past end".into(),
                offset: 12,
                end: 20,
                len: 16,
            })
        );
    }

    #[test]
    fn last_glyph_exactly_at_end_is_in_range() {
        let src = GlyphSource::new(vec![0; 16]);
        assert!(assemble(&src, &one_tile_catalog(8)).is_ok());
        assert!(assemble(&src, &one_tile_catalog(9)).is_err());
    }

    #[test]
    fn duplicator_catalog_over_builtin_font() {
        let src = source::duplicator_font();
        let cat = catalog::duplicator();
        let tiles = assemble(&src, &cat).unwrap();
        assert_eq!(tiles.len(), cat.len());
        for (t, e) in tiles.iter().zip(cat.iter()) {
            assert_eq!(t.entry, e);
            let glyph = src.glyph_at(e.source_offset).unwrap();
            assert_eq!(t.tile, scale(&glyph));
        }
        assert_eq!(flatten(&tiles).len(), cat.len() * TILE_BYTES);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_result_keeps_catalog_order() {
        let src = source::duplicator_font();
        let glyphs = src.glyph_count();

        // Shuffled offsets so neighbouring entries scale different glyphs.
        let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
        let entries: Vec<TileEntry> = (0..4096)
            .map(|i| {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                let glyph = (state >> 33) as usize % glyphs;
                TileEntry::new(format!("tile {i}"), glyph * GLYPH_BYTES, (i % 64 * 4) as u8)
            })
            .collect();
        let cat = Catalog::new("shuffled", "g", entries);

        let serial: Vec<AssembledTile> = cat
            .iter()
            .map(|e| assemble_entry(&src, e).unwrap())
            .collect();
        let parallel = assemble(&src, &cat).unwrap();

        assert_eq!(parallel.len(), cat.len());
        assert_eq!(parallel, serial);
        assert_eq!(flatten(&parallel), flatten(&serial));
    }
}
