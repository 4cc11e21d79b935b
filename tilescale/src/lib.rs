pub mod error;
pub mod glyph;
pub mod scale;
pub mod source;
pub mod catalog;
pub mod assemble;
pub mod header;
