//! RCA filtering and per-value-chain trees.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::hierarchy::{Hierarchy, NodeKind};

/// A value chain with its visible clusters and their products, nested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn leaf(id: &str, label: &str, kind: NodeKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            children: Vec::new(),
        }
    }

    /// Number of nodes in the tree, this one included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

impl Hierarchy {
    /// Keep only products with `rca >= threshold` and what still connects to them.
    ///
    /// A threshold of zero or below returns the graph unchanged.
    pub fn filter_by_product_rca(&self, threshold: f64) -> Hierarchy {
        if threshold <= 0.0 {
            return self.clone();
        }

        let products: HashSet<&str> = self
            .nodes_of(NodeKind::Product)
            .filter(|n| n.metrics.rca.is_some_and(|rca| rca >= threshold))
            .map(|n| n.id.as_str())
            .collect();

        let clusters: HashSet<&str> = self
            .links
            .iter()
            .filter(|l| products.contains(l.target.as_str()))
            .map(|l| l.source.as_str())
            .filter(|id| {
                self.node(id)
                    .is_some_and(|n| n.kind == NodeKind::ManufacturingCluster)
            })
            .collect();

        let value_chains: HashSet<&str> = self
            .links
            .iter()
            .filter(|l| clusters.contains(l.target.as_str()))
            .map(|l| l.source.as_str())
            .collect();

        let keep = |id: &str| {
            products.contains(id) || clusters.contains(id) || value_chains.contains(id)
        };

        let nodes: Vec<_> = self
            .nodes
            .iter()
            .filter(|n| keep(n.id.as_str()))
            .cloned()
            .collect();
        let links: Vec<_> = self
            .links
            .iter()
            .filter(|l| keep(l.source.as_str()) && keep(l.target.as_str()))
            .cloned()
            .collect();

        debug!(
            threshold,
            kept_products = products.len(),
            kept_nodes = nodes.len(),
            "filtered hierarchy by product rca"
        );

        Hierarchy { nodes, links }
    }

    /// Nested tree for one value chain, following visible links only.
    ///
    /// Products are included when their cluster link lists this value chain,
    /// or lists none at all.
    pub fn value_chain_tree(&self, value_chain_id: &str) -> Option<TreeNode> {
        let root = self
            .node(value_chain_id)
            .filter(|n| n.kind == NodeKind::ValueChain)?;

        let children = self
            .visible_links()
            .filter(|l| l.source == root.id)
            .filter_map(|l| self.node(&l.target))
            .filter(|n| n.visible && n.kind == NodeKind::ManufacturingCluster)
            .map(|cluster| {
                let products = self
                    .visible_links()
                    .filter(|l| l.source == cluster.id)
                    .filter(|l| {
                        l.supply_chains.is_empty()
                            || l.supply_chains.iter().any(|vc| *vc == root.id)
                    })
                    .filter_map(|l| self.node(&l.target))
                    .filter(|n| n.visible && n.kind == NodeKind::Product)
                    .map(|p| TreeNode::leaf(&p.id, &p.label, p.kind))
                    .collect();
                TreeNode {
                    children: products,
                    ..TreeNode::leaf(&cluster.id, &cluster.label, cluster.kind)
                }
            })
            .collect();

        Some(TreeNode {
            children,
            ..TreeNode::leaf(&root.id, &root.label, root.kind)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{CountryMetrics, ProductMetric};
    use crate::rows::ProductClusterRow;
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<ProductClusterRow> {
        vec![
            ProductClusterRow::new("Batteries", "Battery Materials", 1, "Lithium carbonate"),
            ProductClusterRow::new("Batteries", "Battery Materials", 2, "Cobalt"),
            ProductClusterRow::new("Electric Vehicles", "Battery Materials", 3, "Graphite"),
            ProductClusterRow::new("Electric Vehicles", "Motors", 4, "Magnets"),
        ]
    }

    fn rca(id: u32, value: f64) -> ProductMetric {
        ProductMetric {
            product_id: id,
            export_rca: Some(value),
            ..ProductMetric::default()
        }
    }

    #[test]
    fn test_zero_threshold_is_identity() {
        let graph = Hierarchy::build(&rows(), None);
        assert_eq!(graph.filter_by_product_rca(0.0), graph);
        assert_eq!(graph.filter_by_product_rca(-1.0), graph);
    }

    #[test]
    fn test_rca_filter_prunes_upwards() {
        let metrics = CountryMetrics {
            product_data: vec![rca(1, 1.5), rca(2, 0.3), rca(3, 0.9), rca(4, 0.1)],
            cluster_data: vec![],
        };
        let graph = Hierarchy::build(&rows(), Some(&metrics));
        let filtered = graph.filter_by_product_rca(1.0);

        let ids: Vec<&str> = filtered.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Electric Vehicles", "Batteries", "Battery Materials", "1"]);
        assert_eq!(filtered.links.len(), 3);
        for link in &filtered.links {
            assert!(filtered.node(&link.source).is_some());
            assert!(filtered.node(&link.target).is_some());
        }
    }

    #[test]
    fn test_value_chain_tree() {
        let graph = Hierarchy::build(&rows(), None).focus(Some("Battery Materials"));
        let tree = graph.value_chain_tree("Batteries").unwrap();

        assert_eq!(tree.children.len(), 1);
        let cluster = &tree.children[0];
        assert_eq!(cluster.id, "Battery Materials");
        let products: Vec<&str> = cluster.children.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(products, vec!["1", "2"]);
        assert_eq!(tree.size(), 4);
    }

    #[test]
    fn test_value_chain_tree_skips_hidden() {
        let graph = Hierarchy::build(&rows(), None).focus(Some("Battery Materials"));
        let tree = graph.value_chain_tree("Electric Vehicles").unwrap();
        let clusters: Vec<&str> = tree.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(clusters, vec!["Battery Materials"]);
        assert_eq!(tree.children[0].children.len(), 1);

        assert!(graph.value_chain_tree("Battery Materials").is_none());
        assert!(graph.value_chain_tree("nope").is_none());
    }
}
