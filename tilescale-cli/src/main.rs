use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::Path;

use tilescale::assemble::{assemble, flatten};
use tilescale::catalog::{self, Catalog};
use tilescale::glyph::{Corner, GLYPH_BYTES, TILE_BYTES};
use tilescale::header::{output_array_name, write_header};
use tilescale::source::{self, parse_c_array, GlyphSource};

mod render_png;

/// Scale 8x8 glyph tables into 16x16 four-character tiles
#[derive(Parser)]
#[command(name = "tilescale", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all built-in tile catalogs
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the entries of a catalog and check its character codes
    Info {
        /// Catalog name (built-in) or path to .toml config
        #[arg(long, default_value = "duplicator")]
        catalog: String,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Scale a glyph table and write the 16x16 C header
    Scale {
        #[command(flatten)]
        source: SourceArgs,
        /// Output header path (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check that an existing generated header matches a fresh run
    Verify {
        #[command(flatten)]
        source: SourceArgs,
        /// Previously generated 16x16 header
        #[arg(long)]
        expected: String,
    },
    /// Render the scaled tiles as a PNG sheet
    Preview {
        #[command(flatten)]
        source: SourceArgs,
        /// Pixels per tile pixel
        #[arg(long, default_value = "4")]
        scale: usize,
        /// Spacing between tiles in tile pixels
        #[arg(long, default_value = "2")]
        spacing: usize,
        /// Number of tiles per row
        #[arg(long, default_value = "8")]
        columns: usize,
        /// Output file path
        #[arg(short, long, default_value = "tiles.png")]
        output: String,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// C header holding the 8x8 glyph array (built-in font if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Catalog name (built-in) or path to .toml config
    #[arg(long, default_value = "duplicator")]
    catalog: String,
    /// Name of the glyph array (defaults to the catalog's)
    #[arg(long)]
    array: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::List { json } => cmd_list(json),
        Command::Info { catalog, json } => cmd_info(&catalog, json),
        Command::Scale { source, output } => cmd_scale(&source, output.as_deref()),
        Command::Verify { source, expected } => cmd_verify(&source, &expected),
        Command::Preview {
            source,
            scale,
            spacing,
            columns,
            output,
        } => cmd_preview(&source, scale, spacing, columns, &output),
    }
}

/// Warnings by default; `-v` and `RUST_LOG` raise it.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Load a catalog by name (built-in) or path (.toml file).
fn load_catalog(name_or_path: &str) -> Result<Catalog> {
    if let Some(catalog) = catalog::builtin_catalog(name_or_path) {
        return Ok(catalog);
    }

    let toml_path = Path::new(name_or_path);
    if toml_path.exists() {
        let toml_str = std::fs::read_to_string(toml_path)
            .with_context(|| format!("reading {}", toml_path.display()))?;
        let catalog = Catalog::from_toml(&toml_str)
            .with_context(|| format!("parsing catalog from {}", toml_path.display()))?;
        return Ok(catalog);
    }

    anyhow::bail!(
        "unknown catalog '{}'. Use 'list' to see built-in catalogs, or provide a .toml path.",
        name_or_path
    );
}

/// Load and validate the catalog, then the glyph source it indexes into.
fn load_inputs(args: &SourceArgs) -> Result<(Catalog, GlyphSource)> {
    let catalog = load_catalog(&args.catalog)?;
    catalog
        .validate()
        .with_context(|| format!("catalog '{}' failed its integrity check", catalog.name))?;

    let array = args.array.as_deref().unwrap_or(catalog.array.as_str());
    let source = match &args.input {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            parse_c_array(&text, array).with_context(|| format!("parsing {}", path))?
        }
        None => source::builtin_source(&catalog.name).with_context(|| {
            format!(
                "catalog '{}' has no built-in font, pass --input",
                catalog.name
            )
        })?,
    };
    log::info!(
        "{} bytes ({} glyphs) of glyph data, {} tiles in catalog '{}'",
        source.len(),
        source.glyph_count(),
        catalog.len(),
        catalog.name
    );
    Ok((catalog, source))
}

#[derive(Serialize)]
struct CatalogSummary<'a> {
    name: &'a str,
    array: &'a str,
    tiles: usize,
    source_bytes: usize,
    output_bytes: usize,
}

#[derive(Serialize)]
struct EntryInfo<'a> {
    name: &'a str,
    offset: usize,
    codes: Vec<u8>,
}

impl<'a> CatalogSummary<'a> {
    fn of(c: &'a Catalog) -> Self {
        CatalogSummary {
            name: &c.name,
            array: &c.array,
            tiles: c.len(),
            source_bytes: c.required_source_len(),
            output_bytes: c.len() * TILE_BYTES,
        }
    }
}

fn cmd_list(json: bool) -> Result<()> {
    let catalogs: Vec<Catalog> = catalog::BUILTIN_NAMES
        .iter()
        .filter_map(|name| catalog::builtin_catalog(name))
        .collect();
    let summaries: Vec<CatalogSummary> = catalogs.iter().map(CatalogSummary::of).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "{:<16} {:<24} {:>6} {:>8} {:>8}",
        "Catalog", "Array", "Tiles", "Source", "Output"
    );
    println!("{}", "-".repeat(66));
    for s in &summaries {
        println!(
            "{:<16} {:<24} {:>6} {:>8} {:>8}",
            s.name, s.array, s.tiles, s.source_bytes, s.output_bytes,
        );
    }
    Ok(())
}

fn cmd_info(name: &str, json: bool) -> Result<()> {
    let catalog = load_catalog(name)?;
    let check = catalog.validate();

    if json {
        let entries: Vec<EntryInfo> = catalog
            .iter()
            .map(|e| EntryInfo {
                name: &e.name,
                offset: e.source_offset,
                codes: Corner::ALL.iter().filter_map(|&c| e.corner_code(c)).collect(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return check.with_context(|| format!("catalog '{}' failed its integrity check", name));
    }

    println!("Catalog:       {}", catalog.name);
    println!("Array:         {}", catalog.array);
    println!("Tiles:         {}", catalog.len());
    println!("Source needs:  {} bytes", catalog.required_source_len());
    println!("Output:        {} bytes", catalog.len() * TILE_BYTES);
    println!();
    println!("{:<16} {:>6} {:>6} {:>6}", "Tile", "Offset", "Glyph", "Codes");
    println!("{}", "-".repeat(46));
    for e in &catalog {
        let codes = match e.last_code() {
            Some(last) => format!("{:#04X}-{:#04X}", e.destination_code, last),
            None => format!("{:#04X}-??", e.destination_code),
        };
        println!(
            "{:<16} {:>6} {:>6} {:>6}",
            e.name,
            e.source_offset,
            e.source_offset / GLYPH_BYTES,
            codes
        );
    }
    println!();

    match check {
        Ok(()) => {
            println!("Codes:         OK");
            Ok(())
        }
        Err(e) => anyhow::bail!("Codes:         {}", e),
    }
}

fn cmd_scale(args: &SourceArgs, output: Option<&str>) -> Result<()> {
    let (catalog, source) = load_inputs(args)?;
    let tiles = assemble(&source, &catalog).context("scaling tiles")?;

    let array = args.array.as_deref().unwrap_or(catalog.array.as_str());
    let text = write_header(&tiles, array);

    match output {
        Some(path) => {
            std::fs::write(path, &text).with_context(|| format!("writing {}", path))?;
            eprintln!(
                "wrote {} ({} tiles, {} bytes)",
                path,
                tiles.len(),
                tiles.len() * TILE_BYTES
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn cmd_verify(args: &SourceArgs, expected_path: &str) -> Result<()> {
    let (catalog, source) = load_inputs(args)?;
    let tiles = assemble(&source, &catalog).context("scaling tiles")?;
    let generated = flatten(&tiles);

    let array = args.array.as_deref().unwrap_or(catalog.array.as_str());
    let out_name = output_array_name(array);
    let text = std::fs::read_to_string(expected_path)
        .with_context(|| format!("reading {}", expected_path))?;
    let expected = parse_c_array(&text, &out_name)
        .with_context(|| format!("parsing {}", expected_path))?;

    if expected.as_bytes() == generated.as_slice() {
        println!(
            "PASS: {} — {} tiles match {}",
            catalog.name,
            tiles.len(),
            expected_path
        );
        return Ok(());
    }

    // Find first mismatch for diagnostics
    let mut msg = format!(
        "FAIL: {} — regenerated tiles differ from {}\n  expected {} bytes, got {}",
        catalog.name,
        expected_path,
        expected.len(),
        generated.len()
    );
    let first = expected
        .as_bytes()
        .iter()
        .zip(&generated)
        .position(|(e, g)| e != g);
    if let Some(i) = first {
        let tile = &tiles[i / TILE_BYTES];
        let corner = Corner::ALL[(i % TILE_BYTES) / GLYPH_BYTES];
        msg.push_str(&format!(
            "\n  first mismatch in '{}' {} row {}: expected {:#04X}, got {:#04X}",
            tile.entry.name,
            corner.label(),
            i % GLYPH_BYTES,
            expected.as_bytes()[i],
            generated[i]
        ));
    }
    anyhow::bail!(msg);
}

fn cmd_preview(
    args: &SourceArgs,
    scale: usize,
    spacing: usize,
    columns: usize,
    output: &str,
) -> Result<()> {
    let (catalog, source) = load_inputs(args)?;
    let tiles = assemble(&source, &catalog).context("scaling tiles")?;

    render_png::write_sheet_png(&tiles, scale, spacing, columns, Path::new(output))?;
    println!("wrote {}", output);
    Ok(())
}
