// src/results.rs

use chrono::NaiveDateTime;

use crate::merge::MergeStats;
use crate::models::Cluster;

/// Shape of the partition the clustering engine produced.
#[derive(Debug, Clone, Default)]
pub struct ClusterStats {
    pub total_clusters: usize,
    /// Clusters holding a single record.
    pub singleton_clusters: usize,
    /// Clusters that actually unified two or more records.
    pub multi_record_clusters: usize,
    /// Size of the largest cluster, in records.
    pub largest_cluster_size: usize,
    pub avg_records_per_cluster: f64,
}

/// Computes partition statistics for the run report.
pub fn collect_cluster_stats(clusters: &[Cluster]) -> ClusterStats {
    let total_clusters = clusters.len();
    let singleton_clusters = clusters.iter().filter(|c| c.len() == 1).count();
    let largest_cluster_size = clusters.iter().map(Cluster::len).max().unwrap_or(0);
    let total_records: usize = clusters.iter().map(Cluster::len).sum();

    ClusterStats {
        total_clusters,
        singleton_clusters,
        multi_record_clusters: total_clusters - singleton_clusters,
        largest_cluster_size,
        avg_records_per_cluster: if total_clusters > 0 {
            total_records as f64 / total_clusters as f64
        } else {
            0.0
        },
    }
}

/// Complete run statistics, printed at the end of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    pub run_id: String,
    pub run_timestamp: NaiveDateTime,

    pub oracle: &'static str,
    pub threshold: f64,
    pub top_k: Option<usize>,

    pub total_sources: usize,
    pub total_records: usize,
    pub total_entries: usize,

    pub cluster_stats: ClusterStats,
    pub merge_stats: MergeStats,

    pub ingest_time: f64,
    pub clustering_time: f64,
    pub merge_time: f64,
    pub write_time: f64,
    pub total_time: f64,
}

pub fn print_report(stats: &PipelineStats) {
    println!("\n========== CATALOG RECONCILIATION REPORT ==========");
    println!("Run ID: {}", stats.run_id);
    println!("Timestamp: {}", stats.run_timestamp);
    println!(
        "Oracle: {} (threshold {:.2}{})",
        stats.oracle,
        stats.threshold,
        match stats.top_k {
            Some(k) => format!(", top-{k}"),
            None => ", exhaustive".to_string(),
        }
    );

    println!("\n--- GENERAL STATISTICS ---");
    println!("Source files ingested: {}", stats.total_sources);
    println!("Listing records processed: {}", stats.total_records);
    println!("Canonical entries written: {}", stats.total_entries);

    println!("\n--- CLUSTERING STATISTICS ---");
    println!("Total clusters: {}", stats.cluster_stats.total_clusters);
    println!(
        "  Singleton clusters: {}",
        stats.cluster_stats.singleton_clusters
    );
    println!(
        "  Multi-record clusters: {}",
        stats.cluster_stats.multi_record_clusters
    );
    println!(
        "  Largest cluster size: {}",
        stats.cluster_stats.largest_cluster_size
    );
    println!(
        "  Avg records per cluster: {:.2}",
        stats.cluster_stats.avg_records_per_cluster
    );

    println!("\n--- MERGE STATISTICS ---");
    println!(
        "Degenerate variant fallbacks: {}",
        stats.merge_stats.degenerate_fallbacks
    );
    println!(
        "Unclaimed records wrapped: {}",
        stats.merge_stats.unclaimed_wrapped
    );

    println!("\n--- TIMING INFORMATION ---");
    println!("Ingestion time: {:.2} seconds", stats.ingest_time);
    println!("Clustering time: {:.2} seconds", stats.clustering_time);
    println!("Merge time: {:.2} seconds", stats.merge_time);
    println!("Write time: {:.2} seconds", stats.write_time);
    println!("Total processing time: {:.2} seconds", stats.total_time);
    println!("\n===================================================\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_stats_over_empty_partition() {
        let stats = collect_cluster_stats(&[]);
        assert_eq!(stats.total_clusters, 0);
        assert_eq!(stats.largest_cluster_size, 0);
        assert_eq!(stats.avg_records_per_cluster, 0.0);
    }

    #[test]
    fn cluster_stats_split_singletons_from_groups() {
        let clusters = vec![
            Cluster {
                members: vec![0, 2, 3],
            },
            Cluster {
                members: vec![1],
            },
            Cluster {
                members: vec![4, 5],
            },
        ];
        let stats = collect_cluster_stats(&clusters);
        assert_eq!(stats.total_clusters, 3);
        assert_eq!(stats.singleton_clusters, 1);
        assert_eq!(stats.multi_record_clusters, 2);
        assert_eq!(stats.largest_cluster_size, 3);
        assert!((stats.avg_records_per_cluster - 2.0).abs() < 1e-9);
    }
}
