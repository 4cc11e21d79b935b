//! C header output for assembled tiles.

use std::fmt::Write;

use crate::assemble::AssembledTile;
use crate::glyph::Corner;

/// Name of the generated array for a given source array.
pub fn output_array_name(array: &str) -> String {
    format!("{array}_16x16")
}

/// Render `tiles` as a C header declaring `<array>_16x16[]`.
///
/// Each tile gets a comment with its name and character range, then one
/// line per quadrant in TL, TR, BL, BR order.
pub fn write_header(tiles: &[AssembledTile<'_>], array: &str) -> String {
    let out_name = output_array_name(array);
    let guard = format!("{}_H", out_name.to_ascii_uppercase());

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "/* {out_name}.h - Pre-scaled 16x16 graphics */");
    let _ = writeln!(out, "/* Generated by tilescale - DO NOT EDIT MANUALLY */");
    let _ = writeln!(out);
    let _ = writeln!(out, "#ifndef {guard}");
    let _ = writeln!(out, "#define {guard}");
    let _ = writeln!(out);
    let _ = writeln!(out, "/* Each tile is 32 bytes (4 characters x 8 bytes) */");
    let _ = writeln!(
        out,
        "/* Format: TL (8 bytes), TR (8 bytes), BL (8 bytes), BR (8 bytes) */"
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "static unsigned char {out_name}[] = {{");

    for t in tiles {
        let _ = writeln!(
            out,
            "    /* {} (char {}) - 32 bytes */",
            t.entry.name,
            code_range(t.entry.destination_code)
        );
        for corner in Corner::ALL {
            let bytes: Vec<String> = t
                .tile
                .quadrant(corner)
                .iter()
                .map(|b| format!("0x{b:02X}"))
                .collect();
            let _ = writeln!(out, "    /* {} */ {},", corner.label(), bytes.join(","));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "}};");
    let _ = writeln!(out);
    let _ = writeln!(out, "#endif /* {guard} */");
    out
}

/// `0x14-0x17` style label for the four codes a tile occupies.
fn code_range(base: u8) -> String {
    let last = u16::from(base) + (Corner::ALL.len() as u16 - 1);
    format!("0x{base:02X}-0x{last:02X}")
}
