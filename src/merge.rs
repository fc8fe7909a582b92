// src/merge.rs

use std::collections::HashMap;
use std::time::Instant;

use log::{info, warn};

use crate::models::{
    CanonicalEntry, CanonicalProduct, CanonicalVariant, CatalogVariant, Cluster, PriceEntry,
    ProductRecord,
};
use crate::utils::normalize_title;

/// Counters for the reduction pass, surfaced in the run report.
#[derive(Debug, Clone, Default)]
pub struct MergeStats {
    /// Canonical entries produced, including safety-net singletons.
    pub entries_created: usize,
    /// Clusters where no variant carried both a quantity and an article id,
    /// so the seed's raw variants were passed through and the other members'
    /// variant data was discarded.
    pub degenerate_fallbacks: usize,
    /// Records no cluster claimed, wrapped as singleton entries.
    pub unclaimed_wrapped: usize,
}

/// Collapses one cluster into a canonical entry.
///
/// The seed supplies the normalized title, brand and pincode (first-wins;
/// later members' values are discarded). Variants are bucketed by quantity in
/// first-seen order, walking members in cluster order and each member's
/// variants in their original order. A variant joins a bucket only when it
/// carries both a quantity and an article id; the bucket's MRP is the first
/// one seen, and each contribution becomes a freshly built `PriceEntry`
/// stamped with the owning record's url; source records are never touched.
pub fn reduce_cluster(cluster: &Cluster, records: &[ProductRecord]) -> CanonicalEntry {
    let seed = &records[cluster.seed()];

    let mut buckets: Vec<CanonicalVariant> = Vec::new();
    let mut bucket_index: HashMap<String, usize> = HashMap::new();

    for &member in &cluster.members {
        let record = &records[member];
        for variant in &record.variants {
            if variant.quantity.is_empty() {
                continue;
            }
            let Some(article_id) = &variant.article_id else {
                continue;
            };

            let idx = *bucket_index
                .entry(variant.quantity.clone())
                .or_insert_with(|| {
                    buckets.push(CanonicalVariant {
                        quantity: variant.quantity.clone(),
                        mrp: None,
                        prices: Vec::new(),
                    });
                    buckets.len() - 1
                });
            let bucket = &mut buckets[idx];

            if bucket.mrp.is_none() {
                bucket.mrp = variant.mrp.clone();
            }
            bucket.prices.push(PriceEntry {
                article_id: article_id.clone(),
                platform_url: record.url.clone(),
                price: variant.price.clone(),
            });
        }
    }

    let variants = if buckets.is_empty() {
        // Degenerate cluster: nothing was dedupable, so the seed's raw
        // variant list goes out unchanged and the other members' variant
        // data is dropped. Intentional, lossy passthrough.
        if cluster.len() > 1 {
            warn!(
                "Degenerate cluster seeded by {:?}: no variant with both quantity and \
                 article id; passing through {} raw seed variants, discarding {} other member(s)",
                seed.title,
                seed.variants.len(),
                cluster.len() - 1
            );
        }
        seed.variants.iter().cloned().map(CatalogVariant::Raw).collect()
    } else {
        buckets.into_iter().map(CatalogVariant::Merged).collect()
    };

    CanonicalEntry {
        normalized_title: normalize_title(&seed.title),
        brand: seed.brand.clone(),
        products: vec![CanonicalProduct {
            title: seed.title.clone(),
            pincode: seed.pincode.clone(),
            variants,
        }],
    }
}

/// True when an entry came out of the raw-passthrough fallback (no merged
/// bucket could be formed for its cluster).
fn is_degenerate(entry: &CanonicalEntry) -> bool {
    entry
        .products
        .first()
        .map(|p| {
            p.variants.is_empty()
                || p.variants.iter().any(|v| matches!(v, CatalogVariant::Raw(_)))
        })
        .unwrap_or(false)
}

/// Reduces every cluster to a canonical entry, in cluster order.
///
/// Any record no cluster claimed (cannot happen with a well-behaved
/// clustering pass, but guarded anyway) is wrapped as its own singleton
/// entry, so the output always references every input record exactly once.
pub fn merge_clusters(
    clusters: &[Cluster],
    records: &[ProductRecord],
) -> (Vec<CanonicalEntry>, MergeStats) {
    let start = Instant::now();
    let mut stats = MergeStats::default();
    let mut claimed = vec![false; records.len()];
    let mut entries = Vec::with_capacity(clusters.len());

    for cluster in clusters {
        for &member in &cluster.members {
            claimed[member] = true;
        }
        let entry = reduce_cluster(cluster, records);
        if is_degenerate(&entry) {
            stats.degenerate_fallbacks += 1;
        }
        entries.push(entry);
    }

    for (index, was_claimed) in claimed.iter().enumerate() {
        if !was_claimed {
            warn!(
                "Record {} {:?} was never claimed by clustering; emitting it as a singleton",
                index, records[index].title
            );
            stats.unclaimed_wrapped += 1;
            let entry = reduce_cluster(&Cluster::new(index), records);
            if is_degenerate(&entry) {
                stats.degenerate_fallbacks += 1;
            }
            entries.push(entry);
        }
    }

    stats.entries_created = entries.len();
    info!(
        "Merged {} clusters into {} canonical entries in {:.2?} ({} degenerate fallbacks)",
        clusters.len(),
        stats.entries_created,
        start.elapsed(),
        stats.degenerate_fallbacks
    );
    (entries, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PriceValue, Variant};

    fn variant(quantity: &str, article_id: Option<&str>, price: Option<f64>) -> Variant {
        Variant {
            quantity: quantity.to_string(),
            mrp: None,
            price: price.map(PriceValue::Number),
            article_id: article_id.map(str::to_string),
        }
    }

    fn record(title: &str, url: &str, variants: Vec<Variant>) -> ProductRecord {
        ProductRecord {
            title: title.to_string(),
            brand: "Tata".to_string(),
            pincode: Some("500085".to_string()),
            url: url.to_string(),
            variants,
        }
    }

    #[test]
    fn merges_matching_quantities_into_one_bucket() {
        let records = vec![
            record(
                "Tata Salt 1kg",
                "https://blinkit.example/p/1",
                vec![variant("1kg", Some("a1"), Some(20.0))],
            ),
            record(
                "tata salt 1 kg",
                "https://zepto.example/p/9",
                vec![variant("1kg", Some("a2"), Some(21.0))],
            ),
        ];
        let cluster = Cluster {
            members: vec![0, 1],
        };

        let entry = reduce_cluster(&cluster, &records);
        assert_eq!(entry.normalized_title, "tata salt 1kg");
        assert_eq!(entry.brand, "Tata");
        assert_eq!(entry.products.len(), 1);

        let product = &entry.products[0];
        assert_eq!(product.title, "Tata Salt 1kg");
        assert_eq!(product.variants.len(), 1);
        let CatalogVariant::Merged(merged) = &product.variants[0] else {
            panic!("expected a merged variant");
        };
        assert_eq!(merged.quantity, "1kg");
        assert_eq!(merged.prices.len(), 2);
        assert_eq!(merged.prices[0].article_id, "a1");
        assert_eq!(merged.prices[0].platform_url, "https://blinkit.example/p/1");
        assert_eq!(merged.prices[1].article_id, "a2");
        assert_eq!(merged.prices[1].platform_url, "https://zepto.example/p/9");
    }

    #[test]
    fn distinct_quantities_stay_distinct_in_first_seen_order() {
        let records = vec![
            record(
                "Aashirvaad Atta",
                "https://a.example/1",
                vec![
                    variant("5kg", Some("a1"), Some(260.0)),
                    variant("10kg", Some("a2"), Some(500.0)),
                ],
            ),
            record(
                "aashirvaad atta",
                "https://b.example/2",
                vec![
                    variant("1kg", Some("b1"), Some(60.0)),
                    variant("5kg", Some("b2"), Some(255.0)),
                ],
            ),
        ];
        let cluster = Cluster {
            members: vec![0, 1],
        };

        let entry = reduce_cluster(&cluster, &records);
        let quantities: Vec<&str> = entry.products[0]
            .variants
            .iter()
            .map(|v| match v {
                CatalogVariant::Merged(m) => m.quantity.as_str(),
                CatalogVariant::Raw(_) => panic!("unexpected raw variant"),
            })
            .collect();
        assert_eq!(quantities, vec!["5kg", "10kg", "1kg"]);

        let CatalogVariant::Merged(five_kg) = &entry.products[0].variants[0] else {
            unreachable!()
        };
        assert_eq!(five_kg.prices.len(), 2);
    }

    #[test]
    fn mrp_is_first_seen_for_the_bucket() {
        let mut first = variant("1kg", Some("a1"), Some(20.0));
        first.mrp = None;
        let mut second = variant("1kg", Some("a2"), Some(21.0));
        second.mrp = Some(PriceValue::Number(28.0));
        let mut third = variant("1kg", Some("a3"), Some(22.0));
        third.mrp = Some(PriceValue::Number(99.0));

        let records = vec![
            record("Tata Salt", "https://a.example/1", vec![first]),
            record("tata salt", "https://b.example/2", vec![second]),
            record("TATA SALT", "https://c.example/3", vec![third]),
        ];
        let cluster = Cluster {
            members: vec![0, 1, 2],
        };

        let entry = reduce_cluster(&cluster, &records);
        let CatalogVariant::Merged(merged) = &entry.products[0].variants[0] else {
            unreachable!()
        };
        // The bucket takes the first MRP that actually shows up.
        assert_eq!(merged.mrp, Some(PriceValue::Number(28.0)));
        assert_eq!(merged.prices.len(), 3);
    }

    #[test]
    fn degenerate_cluster_passes_seed_variants_through() {
        let records = vec![
            record(
                "Mystery Item",
                "https://a.example/1",
                vec![variant("", Some("a1"), Some(10.0)), variant("1kg", None, Some(11.0))],
            ),
            record(
                "mystery item",
                "https://b.example/2",
                vec![variant("2kg", None, Some(12.0))],
            ),
        ];
        let cluster = Cluster {
            members: vec![0, 1],
        };

        let entry = reduce_cluster(&cluster, &records);
        let product = &entry.products[0];
        // Seed's raw list, unchanged in count and content; the second
        // member's data is absent.
        assert_eq!(product.variants.len(), 2);
        assert_eq!(
            product.variants[0],
            CatalogVariant::Raw(records[0].variants[0].clone())
        );
        assert_eq!(
            product.variants[1],
            CatalogVariant::Raw(records[0].variants[1].clone())
        );
    }

    #[test]
    fn later_members_brand_and_pincode_are_discarded() {
        let mut other = record(
            "tata salt",
            "https://b.example/2",
            vec![variant("1kg", Some("b1"), Some(21.0))],
        );
        other.brand = "Not Tata".to_string();
        other.pincode = Some("110001".to_string());

        let records = vec![
            record(
                "Tata Salt",
                "https://a.example/1",
                vec![variant("1kg", Some("a1"), Some(20.0))],
            ),
            other,
        ];
        let cluster = Cluster {
            members: vec![0, 1],
        };

        let entry = reduce_cluster(&cluster, &records);
        assert_eq!(entry.brand, "Tata");
        assert_eq!(entry.products[0].pincode.as_deref(), Some("500085"));
    }

    #[test]
    fn merge_clusters_wraps_unclaimed_records() {
        let records = vec![
            record(
                "Tata Salt",
                "https://a.example/1",
                vec![variant("1kg", Some("a1"), Some(20.0))],
            ),
            record(
                "Orphan Record",
                "https://b.example/2",
                vec![variant("1kg", Some("b1"), Some(30.0))],
            ),
        ];
        // A broken clustering pass that forgot record 1.
        let clusters = vec![Cluster {
            members: vec![0],
        }];

        let (entries, stats) = merge_clusters(&clusters, &records);
        assert_eq!(entries.len(), 2);
        assert_eq!(stats.unclaimed_wrapped, 1);
        assert_eq!(entries[1].normalized_title, "orphan record");
    }

    #[test]
    fn merge_clusters_counts_degenerate_fallbacks() {
        let records = vec![
            record("No Key Data", "https://a.example/1", vec![variant("", None, None)]),
            record("no key data", "https://b.example/2", vec![]),
        ];
        let clusters = vec![Cluster {
            members: vec![0, 1],
        }];

        let (entries, stats) = merge_clusters(&clusters, &records);
        assert_eq!(entries.len(), 1);
        assert_eq!(stats.degenerate_fallbacks, 1);
        assert_eq!(stats.entries_created, 1);
    }
}
