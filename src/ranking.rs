//! Cluster ranking by closeness to the high-attractiveness, high-density corner.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

use crate::hierarchy::{Hierarchy, NodeKind};
use crate::measure::{STRIP_ELLIPSIS, truncate_with};
use crate::metrics::ClusterMetric;

const ATTRACTIVENESS_COG_WEIGHT: f64 = 0.6;
const ATTRACTIVENESS_PCI_WEIGHT: f64 = 0.4;
const GEOMETRIC_MEAN_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterScore {
    pub cluster_id: u32,
    pub name: String,
    pub attractiveness: f64,
    pub density: f64,
    pub normalized_attractiveness: f64,
    pub normalized_density: f64,
    pub distance_from_top_right: f64,
    pub geometric_mean: f64,
    pub top_right_score: f64,
}

/// Score and sort clusters, best first.
///
/// Clusters missing `cog`, `pci` or `rca` are left out.
pub fn score_clusters(clusters: &[ClusterMetric]) -> Vec<ClusterScore> {
    let positioned: Vec<(&ClusterMetric, f64, f64)> = clusters
        .iter()
        .filter_map(|c| {
            let attractiveness =
                ATTRACTIVENESS_COG_WEIGHT * c.cog? + ATTRACTIVENESS_PCI_WEIGHT * c.pci?;
            Some((c, attractiveness, c.rca?))
        })
        .collect();

    if positioned.len() < clusters.len() {
        debug!(
            dropped = clusters.len() - positioned.len(),
            "clusters without cog, pci or rca left unscored"
        );
    }

    let attractiveness = Normalizer::over(positioned.iter().map(|p| p.1));
    let density = Normalizer::over(positioned.iter().map(|p| p.2));

    let mut scores: Vec<ClusterScore> = positioned
        .into_iter()
        .map(|(cluster, a, d)| {
            let na = attractiveness.apply(a);
            let nd = density.apply(d);
            let distance = ((1.0 - nd).powi(2) + (1.0 - na).powi(2)).sqrt();
            let geometric_mean = (na * nd).sqrt();
            ClusterScore {
                cluster_id: cluster.cluster_id,
                name: cluster.display_name(),
                attractiveness: a,
                density: d,
                normalized_attractiveness: na,
                normalized_density: nd,
                distance_from_top_right: distance,
                geometric_mean,
                top_right_score: 1.0 - distance + GEOMETRIC_MEAN_WEIGHT * geometric_mean,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.top_right_score
            .total_cmp(&a.top_right_score)
            .then_with(|| b.geometric_mean.total_cmp(&a.geometric_mean))
    });
    scores
}

/// Min-max scaling onto [0, 1]. Fewer than two values, or no spread, maps
/// everything to the middle.
struct Normalizer {
    min: f64,
    range: Option<f64>,
}

impl Normalizer {
    fn over(values: impl Iterator<Item = f64>) -> Self {
        let (count, min, max) = values.fold(
            (0usize, f64::INFINITY, f64::NEG_INFINITY),
            |(n, lo, hi), v| (n + 1, lo.min(v), hi.max(v)),
        );
        let range = max - min;
        Self {
            min,
            range: (count > 1 && range > 0.0).then_some(range),
        }
    }

    fn apply(&self, value: f64) -> f64 {
        match self.range {
            Some(range) => (value - self.min) / range,
            None => 0.5,
        }
    }
}

/// Cluster names in the hierarchy, best score first. Clusters without a
/// score keep their hierarchy order after the scored ones.
pub fn rank_cluster_names(graph: &Hierarchy, scores: &[ClusterScore]) -> Vec<String> {
    let by_name: HashMap<&str, f64> = scores
        .iter()
        .map(|s| (s.name.as_str(), s.top_right_score))
        .collect();

    let mut names: Vec<(&str, Option<f64>)> = graph
        .nodes_of(NodeKind::ManufacturingCluster)
        .map(|n| (n.id.as_str(), by_name.get(n.id.as_str()).copied()))
        .collect();

    names.sort_by(|a, b| match (a.1, b.1) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    names.into_iter().map(|(name, _)| name.to_string()).collect()
}

/// The cluster to focus when the caller has not picked one.
pub fn default_focus(graph: &Hierarchy, scores: &[ClusterScore]) -> Option<String> {
    rank_cluster_names(graph, scores).into_iter().next()
}

/// One circle in the ranking strip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCluster {
    pub cluster_id: u32,
    pub name: String,
    pub display_label: String,
    /// 1-based
    pub rank: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub score: f64,
    /// Sum of the export values of the cluster's products
    pub export_value: f64,
}

/// Horizontal strip of ranked clusters under the tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingLayout {
    pub spacing: f64,
    pub edge_padding: f64,
    pub node_radius: f64,
    pub max_label_chars: usize,
    /// Room under the circles for labels and the axis
    pub axis_space: f64,
}

impl Default for RankingLayout {
    fn default() -> Self {
        Self {
            spacing: 120.0,
            edge_padding: 10.0,
            node_radius: 18.0,
            max_label_chars: 18,
            axis_space: 40.0,
        }
    }
}

impl RankingLayout {
    pub fn layout(
        &self,
        scores: &[ClusterScore],
        graph: &Hierarchy,
        height: f64,
    ) -> Vec<RankedCluster> {
        let center_y = (height - self.axis_space).max(0.0) / 2.0;

        scores
            .iter()
            .enumerate()
            .map(|(i, score)| RankedCluster {
                cluster_id: score.cluster_id,
                name: score.name.clone(),
                display_label: truncate_with(&score.name, self.max_label_chars, STRIP_ELLIPSIS),
                rank: i + 1,
                x: self.edge_padding + i as f64 * self.spacing,
                y: center_y,
                radius: self.node_radius,
                score: score.top_right_score,
                export_value: cluster_export_value(graph, &score.name),
            })
            .collect()
    }

    /// Width the strip needs to show `count` clusters without clipping.
    pub fn content_width(&self, count: usize) -> f64 {
        count.saturating_sub(1) as f64 * self.spacing + self.edge_padding * 2.0
    }
}

fn cluster_export_value(graph: &Hierarchy, cluster: &str) -> f64 {
    graph
        .links
        .iter()
        .filter(|l| l.source == cluster)
        .filter_map(|l| graph.node(&l.target))
        .filter(|n| n.kind == NodeKind::Product)
        .filter_map(|n| n.metrics.export_value)
        .fold(0.0, |total, v| total + v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{CountryMetrics, ProductMetric};
    use crate::rows::ProductClusterRow;
    use pretty_assertions::assert_eq;

    fn metric(id: u32, name: &str, cog: f64, pci: f64, rca: f64) -> ClusterMetric {
        ClusterMetric {
            cluster_id: id,
            cluster_name: Some(name.to_string()),
            pci: Some(pci),
            cog: Some(cog),
            rca: Some(rca),
        }
    }

    #[test]
    fn test_empty() {
        assert!(score_clusters(&[]).is_empty());
    }

    #[test]
    fn test_single_cluster_is_centered() {
        let scores = score_clusters(&[metric(1, "Solo", 1.0, 1.0, 1.0)]);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].normalized_attractiveness, 0.5);
        assert_eq!(scores[0].normalized_density, 0.5);
        let expected = 1.0 - 0.5f64.sqrt() + 0.1 * 0.5;
        assert!((scores[0].top_right_score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_top_right_wins() {
        let scores = score_clusters(&[
            metric(1, "Low", 0.0, 0.0, 0.1),
            metric(2, "High", 2.0, 2.0, 3.0),
            metric(3, "Mixed", 2.0, 2.0, 0.1),
        ]);
        let names: Vec<&str> = scores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mixed", "Low"]);
        assert_eq!(scores[0].distance_from_top_right, 0.0);
        assert_eq!(scores[0].top_right_score, 1.1);
    }

    #[test]
    fn test_equal_values_do_not_divide_by_zero() {
        let scores = score_clusters(&[
            metric(1, "A", 1.0, 1.0, 2.0),
            metric(2, "B", 1.0, 1.0, 2.0),
        ]);
        assert!(scores.iter().all(|s| s.top_right_score.is_finite()));
        assert_eq!(scores[0].name, "A");
    }

    #[test]
    fn test_incomplete_metrics_skipped() {
        let partial = ClusterMetric {
            cluster_id: 9,
            rca: Some(1.0),
            ..ClusterMetric::default()
        };
        let scores = score_clusters(&[partial, metric(1, "A", 1.0, 1.0, 2.0)]);
        assert_eq!(scores.len(), 1);
    }

    fn graph() -> Hierarchy {
        let rows = vec![
            ProductClusterRow::new("Batteries", "Battery Materials", 1, "Lithium carbonate"),
            ProductClusterRow::new("Batteries", "Cathodes", 2, "Cobalt"),
            ProductClusterRow::new("Batteries", "Separators", 3, "Film"),
            ProductClusterRow::new("Batteries", "Cathodes", 4, "Nickel"),
        ];
        let metrics = CountryMetrics {
            product_data: vec![
                ProductMetric {
                    product_id: 2,
                    export_value: Some(100.0),
                    ..ProductMetric::default()
                },
                ProductMetric {
                    product_id: 4,
                    export_value: Some(50.0),
                    ..ProductMetric::default()
                },
            ],
            cluster_data: vec![],
        };
        Hierarchy::build(&rows, Some(&metrics))
    }

    #[test]
    fn test_rank_names_unscored_last() {
        let scores = score_clusters(&[
            metric(1, "Battery Materials", 0.0, 0.0, 0.1),
            metric(2, "Cathodes", 2.0, 2.0, 3.0),
        ]);
        let graph = graph();
        assert_eq!(
            rank_cluster_names(&graph, &scores),
            vec!["Cathodes", "Battery Materials", "Separators"]
        );
        assert_eq!(default_focus(&graph, &scores).as_deref(), Some("Cathodes"));
        assert_eq!(default_focus(&graph, &[]).as_deref(), Some("Battery Materials"));
    }

    #[test]
    fn test_ranking_layout() {
        let scores = score_clusters(&[
            metric(1, "Battery Materials", 0.0, 0.0, 0.1),
            metric(2, "Cathodes", 2.0, 2.0, 3.0),
        ]);
        let layout = RankingLayout::default();
        let ranked = layout.layout(&scores, &graph(), 120.0);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name, "Cathodes");
        assert_eq!((ranked[0].rank, ranked[0].x, ranked[0].y), (1, 10.0, 40.0));
        assert_eq!((ranked[1].rank, ranked[1].x), (2, 130.0));
        assert_eq!(ranked[0].export_value, 150.0);
        assert!(ranked[1].export_value.is_sign_positive());
        assert_eq!(ranked[1].export_value, 0.0);
        assert_eq!(layout.content_width(2), 140.0);
        assert_eq!(layout.content_width(0), 20.0);
    }

    #[test]
    fn test_strip_labels_end_in_single_ellipsis() {
        let scores = score_clusters(&[metric(1, "Electrical Transmission Equipment", 1.0, 1.0, 1.0)]);
        let ranked = RankingLayout::default().layout(&scores, &graph(), 120.0);
        assert_eq!(ranked[0].display_label, "Electrical Transm\u{2026}");
        assert_eq!(ranked[0].display_label.chars().count(), 18);
    }

    #[test]
    fn test_empty_export_total_serializes_as_zero() {
        let scores = score_clusters(&[metric(1, "Separators", 1.0, 1.0, 1.0)]);
        let ranked = RankingLayout::default().layout(&scores, &graph(), 120.0);
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["exportValue"].to_string(), "0.0");
    }
}
