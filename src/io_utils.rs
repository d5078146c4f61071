//! Output helpers for the unified table.
//!
//! - **Destination**: a path, or stdout when the path is omitted or `-`.
//! - **CSV**: header row plus every record, all fields quoted, missing cells blank.
//! - **JSON**: an array of objects keyed by column name, missing cells `null`.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::QuoteStyle;

use crate::{cli::OutputFormat, data::Table};

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    })
}

/// Picks the output format: explicit flag first, then the file extension, then CSV.
pub fn resolve_format(path: Option<&Path>, provided: Option<OutputFormat>) -> OutputFormat {
    if let Some(format) = provided {
        return format;
    }
    match path.and_then(|p| p.extension()).and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
        _ => OutputFormat::Csv,
    }
}

pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut builder = csv::WriterBuilder::new();
    builder.quote_style(QuoteStyle::Always).double_quote(true);
    let mut writer = builder.from_writer(writer);
    writer
        .write_record(&table.columns)
        .context("Writing output headers")?;
    for (idx, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    writer.flush().context("Flushing output writer")?;
    Ok(())
}

pub fn write_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, &table.to_json_records())
        .context("Serializing records as JSON")?;
    writeln!(writer)?;
    writer.flush().context("Flushing output writer")?;
    Ok(())
}

pub fn write_table(table: &Table, path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let writer = open_output(path)?;
    match format {
        OutputFormat::Csv => write_csv(table, writer),
        OutputFormat::Json => write_json(table, writer),
    }
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Creating directory {parent:?}"))?;
    }
    fs::write(path, contents).with_context(|| format!("Writing {path:?}"))
}
