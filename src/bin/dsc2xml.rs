//! dsc2xml — convert a binary chart script to its XML document.
//!
//! # Usage
//!
//! ```bash
//! # Convert a chart; writes chart.xml next to the input
//! dsc2xml chart.dsc
//!
//! # Extract the lyric cue list instead of the note chart
//! dsc2xml chart.dsc --lyrics
//!
//! # Decode an older format generation with an external schema file
//! dsc2xml chart.dsc --format dt --schema opcode_db.json
//!
//! # Inspect the opcode table of a format generation
//! dsc2xml --list-opcodes --format f
//! ```
//!
//! All decoding happens in the chartlib library; this binary only parses
//! arguments, reads and writes files, and reports errors.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use chartlib::{chart_to_xml, decode_file, lyrics_to_xml, FormatVariant, OpcodeTable};

/// Convert a binary chart script (.dsc) to XML
#[derive(Parser)]
#[command(name = "dsc2xml")]
#[command(about = "Convert a binary chart script (.dsc) to XML")]
#[command(version)]
struct Cli {
    /// Chart script file to convert
    #[arg(required_unless_present = "list_opcodes")]
    input: Option<PathBuf>,

    /// Stream format generation: f, f-events, or dt
    #[arg(long, default_value = "f")]
    format: String,

    /// External opcode schema file (defaults to the built-in schema)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Write the lyric cue list instead of the note chart
    #[arg(long)]
    lyrics: bool,

    /// Output path (defaults to the input path with a .xml extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the active format's opcode table and exit
    #[arg(long)]
    list_opcodes: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let Some(variant) = FormatVariant::by_name(&cli.format) else {
        bail!(
            "unknown format '{}' (expected one of: {})",
            cli.format,
            FormatVariant::preset_names().join(", ")
        );
    };

    let table = match &cli.schema {
        Some(path) => OpcodeTable::from_file(path, &variant.schema_key)
            .with_context(|| format!("failed to load opcode schema '{}'", path.display()))?,
        None => OpcodeTable::builtin(&variant.schema_key)
            .context("failed to load built-in opcode schema")?,
    };

    if cli.list_opcodes {
        println!("Opcodes for {}:", table.variant_key());
        for (id, name, len) in table.entries() {
            println!("[{id:3}] {name:<16} args: {len}");
        }
        return Ok(());
    }

    // clap guarantees input is present unless --list-opcodes was given
    let input = cli.input.expect("input path");
    let chart = decode_file(&input, &table, &variant)
        .with_context(|| format!("failed to decode '{}'", input.display()))?;

    let xml = if cli.lyrics {
        lyrics_to_xml(&chart.lyrics)
    } else {
        chart_to_xml(&chart)
    };

    let output = cli
        .output
        .unwrap_or_else(|| input.with_extension("xml"));
    std::fs::write(&output, xml)
        .with_context(|| format!("failed to write '{}'", output.display()))?;

    println!(
        "{} -> {} ({} notes, {} lyric spans)",
        input.display(),
        output.display(),
        chart.note_count(),
        chart.lyrics.len()
    );

    Ok(())
}
