// src/writer.rs

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::models::CanonicalEntry;

/// Serializes the canonical entries to any sink as pretty-printed JSON,
/// preserving entry order exactly as produced by the merge reducer.
pub fn write_catalog<W: Write>(entries: &[CanonicalEntry], sink: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *sink, entries).context("Failed to serialize catalog")?;
    sink.write_all(b"\n").context("Failed to finish catalog")?;
    Ok(())
}

/// Writes the catalog to a file, creating or truncating it.
pub fn write_catalog_file(entries: &[CanonicalEntry], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_catalog(entries, &mut writer)?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output file {}", path.display()))?;
    info!(
        "Wrote {} canonical entries to {}",
        entries.len(),
        path.display()
    );
    Ok(())
}
