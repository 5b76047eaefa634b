//! Split visible nodes into the three layout columns.

use tracing::warn;

use crate::hierarchy::{Hierarchy, Node, NodeKind};
use crate::metrics::ProductOrdering;

pub(crate) struct Columns<'a> {
    pub value_chains: Vec<&'a Node>,
    pub cluster: Option<&'a Node>,
    pub products: Vec<&'a Node>,
}

pub(crate) fn partition(graph: &Hierarchy, ordering: ProductOrdering) -> Columns<'_> {
    let mut value_chains = Vec::new();
    let mut clusters = Vec::new();
    let mut products = Vec::new();

    for node in graph.visible_nodes() {
        match node.kind {
            NodeKind::ValueChain => value_chains.push(node),
            NodeKind::ManufacturingCluster => clusters.push(node),
            NodeKind::Product => products.push(node),
        }
    }

    if clusters.len() > 1 {
        warn!(
            visible = clusters.len(),
            "more than one visible cluster; laying out the first"
        );
    }

    sort_products(&mut products, ordering);

    Columns {
        value_chains,
        cluster: clusters.first().copied(),
        products,
    }
}

/// Stable sort of the product column. Numeric orderings put the largest value
/// first and treat a missing value as zero.
pub fn sort_products(products: &mut [&Node], ordering: ProductOrdering) {
    let key = |node: &Node| -> f64 {
        let m = &node.metrics;
        let value = match ordering {
            ProductOrdering::Rca => m.rca,
            ProductOrdering::ExportValue => m.export_value,
            ProductOrdering::Complexity => m.complexity,
            ProductOrdering::Label => None,
        };
        value.unwrap_or(0.0)
    };

    match ordering {
        ProductOrdering::Label => products.sort_by(|a, b| a.label.cmp(&b.label)),
        _ => products.sort_by(|a, b| key(*b).total_cmp(&key(*a))),
    }
}
