// src/ingest.rs

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::models::{PriceValue, ProductRecord, Variant};

/// Which shape a source file arrives in.
///
/// Most platforms are scraped straight into the common record shape. JioMart
/// feeds are flat: one object per listing with the package fields at the top
/// level, so they get their own field-mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Common,
    JioMart,
}

impl Platform {
    /// Detects the platform from the file name, the same way the scraping
    /// side names its dumps (e.g. `JioMartGroceries_500074_2024-04-14.json`).
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.contains("jiomart") {
            Platform::JioMart
        } else {
            Platform::Common
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Common => "common",
            Platform::JioMart => "jiomart",
        }
    }
}

/// Flat JioMart listing. Field mapping into the common shape:
/// `article_id` -> variant `articleId`; top-level `quantity`/`mrp`/`price`
/// become the listing's single variant.
#[derive(Debug, Deserialize)]
struct JioMartRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    brand: String,
    #[serde(default, deserialize_with = "crate::models::de_opt_stringish")]
    pincode: Option<String>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    mrp: Option<PriceValue>,
    #[serde(default)]
    price: Option<PriceValue>,
    #[serde(default, deserialize_with = "crate::models::de_opt_stringish")]
    article_id: Option<String>,
}

impl From<JioMartRecord> for ProductRecord {
    fn from(raw: JioMartRecord) -> Self {
        ProductRecord {
            title: raw.title,
            brand: raw.brand,
            pincode: raw.pincode,
            url: raw.url,
            variants: vec![Variant {
                quantity: raw.quantity,
                mrp: raw.mrp,
                price: raw.price,
                article_id: raw.article_id,
            }],
        }
    }
}

/// Loads one source file and adapts it into common-shape records.
///
/// Fail-fast: an unparseable file is `MalformedInput`; a record that comes
/// out of adaptation without a usable `title` or `url` is `MissingField`
/// with the record's index, and aborts the whole source. The core never
/// receives partially-valid records.
pub fn load_source(path: &Path) -> Result<Vec<ProductRecord>, PipelineError> {
    let platform = Platform::from_path(path);
    let raw = fs::read_to_string(path)
        .map_err(|e| PipelineError::malformed(path, e.to_string()))?;

    let records: Vec<ProductRecord> = match platform {
        Platform::Common => serde_json::from_str(&raw)
            .map_err(|e| PipelineError::malformed(path, e.to_string()))?,
        Platform::JioMart => {
            let raw_records: Vec<JioMartRecord> = serde_json::from_str(&raw)
                .map_err(|e| PipelineError::malformed(path, e.to_string()))?;
            raw_records.into_iter().map(ProductRecord::from).collect()
        }
    };

    for (index, record) in records.iter().enumerate() {
        if record.title.trim().is_empty() {
            return Err(PipelineError::MissingField {
                path: path.to_path_buf(),
                index,
                field: "title",
            });
        }
        if record.url.trim().is_empty() {
            return Err(PipelineError::MissingField {
                path: path.to_path_buf(),
                index,
                field: "url",
            });
        }
    }

    debug!(
        "Loaded {} records from {} ({})",
        records.len(),
        path.display(),
        platform.as_str()
    );
    Ok(records)
}

/// Loads every source file in the order given, concatenating their records.
/// Input order is what makes a run reproducible, so it is preserved exactly.
pub fn load_sources(paths: &[PathBuf]) -> Result<Vec<ProductRecord>, PipelineError> {
    let mut records = Vec::new();
    for path in paths {
        records.extend(load_source(path)?);
    }
    info!("Ingested {} records from {} source(s)", records.len(), paths.len());
    Ok(records)
}
