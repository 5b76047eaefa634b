//! Value chain -> cluster -> product graph built from flat rows.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::metrics::{CountryMetrics, MetricsIndex};
use crate::rows::ProductClusterRow;

/// Story order of the known value chains. Unknown chains follow in first-seen order.
const VALUE_CHAIN_ORDER: [&str; 10] = [
    "Electric Vehicles",
    "Heat Pumps",
    "Fuel Cells And Green Hydrogen",
    "Wind Power",
    "Solar Power",
    "Hydroelectric Power",
    "Nuclear Power",
    "Batteries",
    "Electric Grid",
    "Critical Metals and Minerals",
];

pub fn value_chain_rank(name: &str) -> usize {
    VALUE_CHAIN_ORDER
        .iter()
        .position(|known| *known == name)
        .unwrap_or(VALUE_CHAIN_ORDER.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    ValueChain,
    ManufacturingCluster,
    Product,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValueChain => "value_chain",
            Self::ManufacturingCluster => "manufacturing_cluster",
            Self::Product => "product",
        }
    }
}

/// Caller-supplied numbers carried along with a node. Never part of its identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    pub rca: Option<f64>,
    pub export_value: Option<f64>,
    pub complexity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub visible: bool,
    pub metrics: NodeMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub source: String,
    pub target: String,
    pub visible: bool,
    pub value: f64,
    /// Value chains whose rows produced a cluster -> product link.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub supply_chains: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hierarchy {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

struct ProductEntry<'a> {
    key: String,
    product_id: u32,
    row: &'a ProductClusterRow,
}

impl Hierarchy {
    /// Build the full graph. Every node starts invisible.
    pub fn build(rows: &[ProductClusterRow], metrics: Option<&CountryMetrics>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }

        let index = metrics.map(CountryMetrics::index);

        let mut value_chains: Vec<&str> = Vec::new();
        let mut clusters: Vec<&str> = Vec::new();
        let mut products: Vec<ProductEntry> = Vec::new();
        let mut seen_products: HashSet<String> = HashSet::new();

        // value chain -> clusters, cluster -> products, both in first-seen order
        let mut vc_clusters: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut cluster_products: HashMap<&str, Vec<String>> = HashMap::new();
        let mut vc_products: HashMap<&str, Vec<u32>> = HashMap::new();
        let mut product_chains: HashMap<(&str, String), Vec<String>> = HashMap::new();
        let mut skipped = 0usize;

        for (row_index, row) in rows.iter().enumerate() {
            let (Some(cluster), Some(product_id)) = (row.cluster(), row.product_id) else {
                warn!(row = row_index, "skipping row without cluster name or product id");
                skipped += 1;
                continue;
            };
            let key = product_id.to_string();

            push_unique(&mut clusters, cluster);
            if seen_products.insert(key.clone()) {
                products.push(ProductEntry {
                    key: key.clone(),
                    product_id,
                    row,
                });
            }

            let cluster_entry = cluster_products.entry(cluster).or_default();
            if !cluster_entry.contains(&key) {
                cluster_entry.push(key.clone());
            }

            let chains = product_chains.entry((cluster, key)).or_default();
            if let Some(vc) = row.value_chain() {
                push_unique(&mut value_chains, vc);
                push_unique(vc_clusters.entry(vc).or_default(), cluster);
                push_unique(vc_products.entry(vc).or_default(), product_id);
                if !chains.iter().any(|c| c == vc) {
                    chains.push(vc.to_string());
                }
            }
        }

        value_chains.sort_by_key(|vc| value_chain_rank(vc));

        let mut builder = NodeSet::default();

        for vc in &value_chains {
            let rca = mean_rca(index.as_ref(), vc_products.get(vc).map(Vec::as_slice));
            builder.push(Node {
                id: vc.to_string(),
                kind: NodeKind::ValueChain,
                label: vc.to_string(),
                visible: false,
                metrics: NodeMetrics {
                    rca,
                    ..NodeMetrics::default()
                },
            });
        }

        for cluster in &clusters {
            let ids: Vec<u32> = products
                .iter()
                .filter(|p| {
                    cluster_products
                        .get(cluster)
                        .is_some_and(|keys| keys.contains(&p.key))
                })
                .map(|p| p.product_id)
                .collect();
            builder.push(Node {
                id: cluster.to_string(),
                kind: NodeKind::ManufacturingCluster,
                label: cluster.to_string(),
                visible: false,
                metrics: NodeMetrics {
                    rca: mean_rca(index.as_ref(), Some(ids.as_slice())),
                    ..NodeMetrics::default()
                },
            });
        }

        for product in &products {
            let metric = index.as_ref().and_then(|i| i.product(product.product_id));
            builder.push(Node {
                id: product.key.clone(),
                kind: NodeKind::Product,
                label: product.row.product_label(),
                visible: false,
                metrics: NodeMetrics {
                    rca: metric.and_then(|m| m.export_rca),
                    export_value: metric.and_then(|m| m.export_value),
                    complexity: metric.and_then(|m| m.normalized_pci),
                },
            });
        }

        let mut links = Vec::new();
        let mut seen_links: HashSet<(String, String)> = HashSet::new();

        for vc in &value_chains {
            for cluster in vc_clusters.get(vc).into_iter().flatten() {
                if !seen_links.insert((vc.to_string(), cluster.to_string())) {
                    continue;
                }
                links.push(Link {
                    id: format!("vc-{vc}-cl-{cluster}"),
                    source: vc.to_string(),
                    target: cluster.to_string(),
                    visible: false,
                    value: 1.0,
                    supply_chains: Vec::new(),
                });
            }
        }

        for cluster in &clusters {
            for key in cluster_products.get(cluster).into_iter().flatten() {
                if !seen_links.insert((cluster.to_string(), key.clone())) {
                    continue;
                }
                let rca = builder.rca_of(key);
                links.push(Link {
                    id: format!("cl-{cluster}-pr-{key}"),
                    source: cluster.to_string(),
                    target: key.clone(),
                    visible: false,
                    value: rca.map(|r| r.max(0.2) * 2.0).unwrap_or(2.0),
                    supply_chains: product_chains
                        .remove(&(*cluster, key.clone()))
                        .unwrap_or_default(),
                });
            }
        }

        let nodes = builder.nodes;
        debug!(
            nodes = nodes.len(),
            links = links.len(),
            skipped,
            "built cluster hierarchy"
        );

        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.visible)
    }

    pub fn visible_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.visible)
    }
}

/// Node list that keeps ids unique across kinds.
#[derive(Default)]
struct NodeSet {
    nodes: Vec<Node>,
    ids: HashMap<String, usize>,
}

impl NodeSet {
    fn push(&mut self, node: Node) {
        if let Some(&existing) = self.ids.get(&node.id) {
            let kept = &self.nodes[existing];
            if kept.kind != node.kind {
                warn!(
                    id = %node.id,
                    kept = kept.kind.as_str(),
                    dropped = node.kind.as_str(),
                    "node id collides across kinds; keeping the first"
                );
            }
            return;
        }
        self.ids.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn rca_of(&self, id: &str) -> Option<f64> {
        self.ids.get(id).and_then(|&i| self.nodes[i].metrics.rca)
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn mean_rca(index: Option<&MetricsIndex>, product_ids: Option<&[u32]>) -> Option<f64> {
    let index = index?;
    let values: Vec<f64> = product_ids?
        .iter()
        .filter_map(|&id| index.rca(id))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
