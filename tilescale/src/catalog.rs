#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::glyph::Corner;

/// One named tile: where its 8x8 art lives in the glyph source and which
/// character code its top-left quadrant lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct TileEntry {
    pub name: String,
    /// Byte offset of the glyph in the source table.
    #[cfg_attr(feature = "serde", serde(rename = "offset"))]
    pub source_offset: usize,
    /// Base character code; the tile occupies `code..=code + 3`.
    #[cfg_attr(feature = "serde", serde(rename = "code"))]
    pub destination_code: u8,
}

impl TileEntry {
    pub fn new(name: impl Into<String>, source_offset: usize, destination_code: u8) -> Self {
        TileEntry {
            name: name.into(),
            source_offset,
            destination_code,
        }
    }

    /// Character code of one quadrant, or `None` if it runs past 0xFF.
    pub fn corner_code(&self, corner: Corner) -> Option<u8> {
        self.destination_code.checked_add(corner as u8)
    }

    /// Last character code used by this tile.
    pub fn last_code(&self) -> Option<u8> {
        self.corner_code(Corner::BottomRight)
    }
}

/// An ordered table of tiles. Output order follows entry order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Catalog {
    pub name: String,
    /// Name of the C array the glyph source is read from.
    pub array: String,
    #[cfg_attr(feature = "serde", serde(rename = "tile"))]
    pub entries: Vec<TileEntry>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("config error: {0}")]
    Config(String),
    #[error("catalog '{0}' has no tiles")]
    Empty(String),
    #[error("tile '{name}' at code {code:#04X} needs codes past 0xFF")]
    CodeOutOfRange { name: String, code: u8 },
    #[error("tiles '{first}' and '{second}' overlap at codes {first_code:#04X} and {second_code:#04X}")]
    DuplicateDestination {
        first: String,
        first_code: u8,
        second: String,
        second_code: u8,
    },
}

impl Catalog {
    pub fn new(name: impl Into<String>, array: impl Into<String>, entries: Vec<TileEntry>) -> Self {
        Catalog {
            name: name.into(),
            array: array.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TileEntry> {
        self.entries.iter()
    }

    /// Smallest glyph source length that keeps every entry in bounds.
    pub fn required_source_len(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.source_offset + crate::glyph::GLYPH_BYTES)
            .max()
            .unwrap_or(0)
    }

    /// Check that destination ranges are distinct.
    ///
    /// Each tile claims four consecutive codes, so two tiles conflict when
    /// their base codes are less than four apart. Source offsets may repeat.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.entries.is_empty() {
            return Err(CatalogError::Empty(self.name.clone()));
        }

        for e in &self.entries {
            if e.last_code().is_none() {
                return Err(CatalogError::CodeOutOfRange {
                    name: e.name.clone(),
                    code: e.destination_code,
                });
            }
        }

        let mut by_code: Vec<&TileEntry> = self.entries.iter().collect();
        by_code.sort_by_key(|e| e.destination_code);
        for pair in by_code.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.destination_code - a.destination_code < Corner::ALL.len() as u8 {
                return Err(CatalogError::DuplicateDestination {
                    first: a.name.clone(),
                    first_code: a.destination_code,
                    second: b.name.clone(),
                    second_code: b.destination_code,
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML catalog.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog =
            toml::from_str(toml_str).map_err(|e| CatalogError::Config(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TileEntry;
    type IntoIter = std::slice::Iter<'a, TileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// --- Built-in catalogs ---

/// Tiles of the Duplicator puzzle game, in character-code order.
const DUPLICATOR_TILES: &[(&str, usize, u8)] = &[
    ("Wall", 8, 0x00),
    ("Player", 0, 0x04),
    ("Crate", 16, 0x08),
    ("Key", 24, 0x0C),
    ("Door", 32, 0x10),
    ("Enemy", 40, 0x14),
    ("Hole A", 48, 0x18),
    ("Hole B", 56, 0x1C),
    ("Plate A", 64, 0x20),
    ("Plate B", 72, 0x24),
    ("Gate A", 80, 0x28),
    ("Gate B", 88, 0x2C),
    ("Exit A", 96, 0x30),
    ("Exit B", 104, 0x34),
    ("Exit C", 208, 0x38),
    ("Floor", 112, 0x3C),
    ("Gate A Open", 216, 0x40),
    ("Gate B Open", 224, 0x44),
    ("Door Open", 232, 0x48),
    ("Hole A Filled", 240, 0x4C),
    ("Hole B Filled", 248, 0x50),
    ("Wall Line A", 120, 0x54),
    ("Wall Line B", 128, 0x58),
    ("Wall Line G", 136, 0x5C),
    ("Line A", 144, 0x60),
    ("Line B", 152, 0x64),
    ("Line C", 160, 0x68),
    ("Line D", 168, 0x6C),
    ("Line E", 176, 0x70),
    ("Line F", 184, 0x74),
    ("Line G", 192, 0x78),
    ("Line H", 200, 0x7C),
];

pub fn duplicator() -> Catalog {
    Catalog::new(
        "duplicator",
        "duplicator_graphics",
        DUPLICATOR_TILES
            .iter()
            .map(|&(name, offset, code)| TileEntry::new(name, offset, code))
            .collect(),
    )
}

/// List of all built-in catalog names.
pub const BUILTIN_NAMES: &[&str] = &["duplicator"];

/// Load a built-in catalog by name.
pub fn builtin_catalog(name: &str) -> Option<Catalog> {
    match name {
        "duplicator" => Some(duplicator()),
        _ => None,
    }
}
