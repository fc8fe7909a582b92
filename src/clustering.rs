// src/clustering.rs

use std::time::Instant;

use log::{debug, info, trace};

use crate::error::PipelineError;
use crate::matching::SimilarityOracle;
use crate::models::{Cluster, ProductRecord};

/// Partitions the records into similarity-based groups.
///
/// Greedy seeded single-pass grouping, processed in input order: each not-yet
/// claimed record opens a cluster and claims every later unclaimed record
/// whose title scores at least `threshold` against the *seed*. Members are
/// never compared against each other. This is deliberate single-link-to-seed
/// policy, not transitive closure, and two members of the same cluster may
/// themselves score below the threshold. Clusters come back in the order
/// their seeds were claimed.
///
/// Every input index lands in exactly one cluster; `threshold` is expected in
/// (0, 1] (the driver validates it before calling).
pub fn cluster_records(
    records: &[ProductRecord],
    oracle: &dyn SimilarityOracle,
    threshold: f64,
) -> Result<Vec<Cluster>, PipelineError> {
    let start = Instant::now();
    let mut clusters = Vec::new();
    let mut claimed = vec![false; records.len()];

    for i in 0..records.len() {
        if claimed[i] {
            continue;
        }
        claimed[i] = true;
        let mut cluster = Cluster::new(i);

        for j in (i + 1)..records.len() {
            if claimed[j] {
                continue;
            }
            let score = oracle.similarity(&records[i].title, &records[j].title)?;
            if score >= threshold {
                trace!(
                    "Record {} {:?} joins cluster seeded at {} (score {:.4})",
                    j,
                    records[j].title,
                    i,
                    score
                );
                claimed[j] = true;
                cluster.members.push(j);
            }
        }

        clusters.push(cluster);
    }

    info!(
        "Clustered {} records into {} groups at threshold {} in {:.2?}",
        records.len(),
        clusters.len(),
        threshold,
        start.elapsed()
    );
    Ok(clusters)
}

/// Top-k form of [`cluster_records`]: instead of scoring the seed against
/// every remaining record, asks the oracle for its `k` best matches among the
/// unclaimed candidates and claims those at or above `threshold`.
///
/// Same grouping policy; O(n·k) acceptances instead of O(n²), at the cost of
/// possibly missing true matches beyond the top-k window. Accepted members
/// are appended in input order, so whenever the window is wide enough the
/// partition is identical to the exhaustive form.
pub fn cluster_records_top_k(
    records: &[ProductRecord],
    oracle: &dyn SimilarityOracle,
    threshold: f64,
    k: usize,
) -> Result<Vec<Cluster>, PipelineError> {
    let start = Instant::now();
    let mut clusters = Vec::new();
    let mut claimed = vec![false; records.len()];

    for i in 0..records.len() {
        if claimed[i] {
            continue;
        }
        claimed[i] = true;
        let mut cluster = Cluster::new(i);

        let candidate_indices: Vec<usize> =
            ((i + 1)..records.len()).filter(|&j| !claimed[j]).collect();
        let candidate_titles: Vec<&str> = candidate_indices
            .iter()
            .map(|&j| records[j].title.as_str())
            .collect();

        let top = oracle.top_matches(&records[i].title, &candidate_titles, k)?;
        let mut accepted: Vec<usize> = top
            .into_iter()
            .filter(|&(_, score)| score >= threshold)
            .map(|(c, _)| candidate_indices[c])
            .collect();
        accepted.sort_unstable();

        for j in accepted {
            debug_assert!(!claimed[j]);
            claimed[j] = true;
            cluster.members.push(j);
        }

        clusters.push(cluster);
    }

    debug!(
        "Top-{} clustering of {} records produced {} groups in {:.2?}",
        k,
        records.len(),
        clusters.len(),
        start.elapsed()
    );
    Ok(clusters)
}
