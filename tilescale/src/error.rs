use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScaleError {
    #[error("malformed glyph source: {0}")]
    MalformedSource(String),

    #[error("glyph must be exactly 8 bytes, got {0}")]
    InvalidInput(usize),

    #[error("tile '{name}' reads bytes {offset}..{end} but the glyph source is only {len} bytes")]
    OutOfRange {
        name: String,
        offset: usize,
        end: usize,
        len: usize,
    },
}
