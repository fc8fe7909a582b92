// src/models.rs

use serde::{Deserialize, Deserializer, Serialize};

//------------------------------------------------------------------------------
// INGESTED RECORD TYPES
//------------------------------------------------------------------------------

/// One platform's listing for a product, normalized into the common shape.
///
/// Records are created once by ingestion and never mutated afterwards;
/// clustering and merging are read-only over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Listing title as scraped. Required; ingestion rejects records where
    /// this is absent or empty before the core ever sees them.
    #[serde(default)]
    pub title: String,

    /// Brand field, where the platform exposes one.
    #[serde(default)]
    pub brand: String,

    /// Delivery pincode the listing was scraped under.
    #[serde(default, deserialize_with = "de_opt_stringish")]
    pub pincode: Option<String>,

    /// Platform listing link. Required, same rule as `title`.
    #[serde(default)]
    pub url: String,

    /// Purchasable package sizes. The scraped feeds use the singular
    /// `variant` key for this array.
    #[serde(default, alias = "variant")]
    pub variants: Vec<Variant>,
}

/// One purchasable package size of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    /// Package size label, e.g. "1kg". Acts as the dedup key during merging;
    /// an empty quantity never participates in dedup.
    #[serde(default)]
    pub quantity: String,

    /// Listed MRP. Display-only, carried verbatim.
    #[serde(default)]
    pub mrp: Option<PriceValue>,

    /// Selling price, carried verbatim.
    #[serde(default)]
    pub price: Option<PriceValue>,

    /// Platform article identifier. Required for dedup to apply to this
    /// variant.
    #[serde(default, deserialize_with = "de_opt_stringish")]
    pub article_id: Option<String>,
}

/// A price-like scalar as it arrives from the feeds: some platforms emit
/// numbers, others pre-formatted strings. Carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

/// Accepts a string or a bare number for identifier-ish fields (article ids
/// and pincodes show up as both across platforms), normalizing to a string.
pub(crate) fn de_opt_stringish<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stringish {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Stringish>::deserialize(deserializer)?.map(|v| match v {
        Stringish::Text(s) => s,
        Stringish::Int(n) => n.to_string(),
        Stringish::Float(n) => n.to_string(),
    }))
}

//------------------------------------------------------------------------------
// CLUSTER TYPES
//------------------------------------------------------------------------------

/// A greedily-grown set of record indices deemed to denote the same product.
///
/// The seed is the first record claimed when the cluster was opened; it
/// anchors the comparison basis and supplies the canonical title, brand and
/// pincode. Members are stored in claim order, seed first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn new(seed: usize) -> Self {
        Self {
            members: vec![seed],
        }
    }

    /// Index of the seed record.
    pub fn seed(&self) -> usize {
        self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

//------------------------------------------------------------------------------
// CANONICAL CATALOG TYPES
//------------------------------------------------------------------------------

/// Merge output: one canonical product with deduplicated package variants and
/// per-platform price entries. Created once by the merge reducer and handed
/// off to serialization; never revisited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEntry {
    /// Lowercased, trimmed form of the seed's title.
    pub normalized_title: String,

    /// Seed's brand; later members' brand values are discarded (first-wins).
    pub brand: String,

    /// Always exactly one product in this design. The on-wire schema permits
    /// a sequence for forward compatibility; the core does not produce
    /// multi-product entries.
    pub products: Vec<CanonicalProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProduct {
    /// Seed's original, unnormalized title.
    pub title: String,

    pub pincode: Option<String>,

    pub variants: Vec<CatalogVariant>,
}

/// A variant as emitted into the catalog.
///
/// Normally a merged, quantity-keyed bucket; for a degenerate cluster (no
/// variant anywhere in the cluster carries both a quantity and an article id)
/// the seed's raw variant list is passed through unchanged instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogVariant {
    Merged(CanonicalVariant),
    Raw(Variant),
}

/// One deduplicated package size with every platform's price for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalVariant {
    pub quantity: String,

    /// First-seen MRP across the cluster's variants for this quantity.
    pub mrp: Option<PriceValue>,

    /// One entry per contributing platform variant, in cluster order.
    pub prices: Vec<PriceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub article_id: String,

    /// Listing link of the record that contributed this price. Freshly
    /// stamped per record; the source variant is never mutated.
    pub platform_url: String,

    pub price: Option<PriceValue>,
}
