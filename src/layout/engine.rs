//! Layout engine core implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::hierarchy::{Hierarchy, Node};
use crate::measure::{LabelMetrics, truncate_label};
use crate::metrics::ProductOrdering;

use super::columns::partition;
use super::curves::position_link;
use super::margins::Breakpoint;
use super::spacing::{ColumnSpacing, dynamic_spacing};
use super::types::{Dimensions, Margins, PositionedGraph, PositionedNode};

/// Vertical spacing limits for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub max_spacing: f64,
    /// Floor on the column area height; short viewports overflow rather than squash
    pub min_height: f64,
}

/// Character limits for the value chain and cluster labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelLimits {
    pub value_chain: usize,
    pub cluster: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    /// Cluster column position between the value chain and product columns
    pub cluster_fraction: f64,
    pub value_chains: ColumnConfig,
    pub products: ColumnConfig,
    pub product_ordering: ProductOrdering,
    pub labels: LabelLimits,
    pub metrics: LabelMetrics,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

impl LayoutConfig {
    pub fn desktop() -> Self {
        Self {
            node_width: 16.0,
            node_height: 16.0,
            cluster_fraction: 0.33,
            value_chains: ColumnConfig {
                max_spacing: 100.0,
                min_height: 200.0,
            },
            products: ColumnConfig {
                max_spacing: 60.0,
                min_height: 220.0,
            },
            product_ordering: ProductOrdering::Rca,
            labels: LabelLimits {
                value_chain: 18,
                cluster: 25,
            },
            metrics: LabelMetrics::default(),
        }
    }

    pub fn mobile() -> Self {
        let desktop = Self::desktop();
        Self {
            value_chains: ColumnConfig {
                max_spacing: 80.0,
                ..desktop.value_chains
            },
            products: ColumnConfig {
                max_spacing: 50.0,
                ..desktop.products
            },
            labels: LabelLimits {
                value_chain: 12,
                cluster: 19,
            },
            metrics: LabelMetrics::mobile(),
            ..desktop
        }
    }

    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        if breakpoint.is_mobile() {
            Self::mobile()
        } else {
            Self::desktop()
        }
    }
}

/// Layout engine configuration and computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutEngine {
    pub(crate) config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Position the visible part of a focused graph.
    ///
    /// Only visible nodes are placed, and only visible links whose endpoints
    /// were both placed are emitted. A graph without a visible cluster lays
    /// out as empty.
    pub fn layout(
        &self,
        graph: &Hierarchy,
        dimensions: Dimensions,
        margins: Margins,
    ) -> PositionedGraph {
        let cfg = &self.config;

        // Phase 1: Column assignment
        let columns = partition(graph, cfg.product_ordering);
        let Some(cluster) = columns.cluster else {
            debug!("no focused cluster; empty layout");
            return PositionedGraph::empty(dimensions);
        };

        // Phase 2: Vertical spacing per column
        let area_height = dimensions.height - margins.bottom - margins.top;
        let vc_area = area_height.max(cfg.value_chains.min_height);
        let pr_area = area_height.max(cfg.products.min_height);

        let vc_spacing =
            self.column_spacing(columns.value_chains.len(), vc_area, &cfg.value_chains);
        let pr_spacing = self.column_spacing(columns.products.len(), pr_area, &cfg.products);

        // Phase 3: Horizontal columns
        let value_chain_x = margins.left;
        let product_x = dimensions.width - margins.right;
        let cluster_x = value_chain_x + cfg.cluster_fraction * (product_x - value_chain_x);

        // Phase 4: Cluster sits midway between the column extents
        let extents = [
            vc_spacing.extent(columns.value_chains.len(), cfg.node_height),
            pr_spacing.extent(columns.products.len(), cfg.node_height),
        ];
        let (top, bottom) = extents.into_iter().flatten().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(top, bottom), (t, b)| (top.min(t), bottom.max(b)),
        );
        let cluster_center_y = if top.is_finite() && bottom.is_finite() {
            margins.top + (top + bottom) / 2.0
        } else {
            margins.top + vc_area / 2.0
        };

        // Phase 5: Node placement
        let product_budget = cfg.metrics.product_label_budget(margins.right);
        let mut placed: HashMap<&str, PositionedNode> = HashMap::new();

        for (i, node) in columns.value_chains.iter().enumerate() {
            let y = margins.top + vc_spacing.offset(i, cfg.node_height);
            placed.insert(
                &node.id,
                self.place(node, value_chain_x, y, cfg.labels.value_chain),
            );
        }

        placed.insert(
            &cluster.id,
            self.place(
                cluster,
                cluster_x - cfg.node_width / 2.0,
                cluster_center_y - cfg.node_height / 2.0,
                cfg.labels.cluster,
            ),
        );

        for (i, node) in columns.products.iter().enumerate() {
            let y = margins.top + pr_spacing.offset(i, cfg.node_height);
            placed.insert(
                &node.id,
                self.place(node, product_x, y, product_budget.char_limit),
            );
        }

        // Phase 6: Links between placed nodes
        let link_positions = graph
            .visible_links()
            .filter_map(|link| {
                let source = placed.get(link.source.as_str())?;
                let target = placed.get(link.target.as_str())?;
                Some(position_link(link, source, target))
            })
            .collect();

        // Keep the graph's node order in the output
        let node_positions: Vec<PositionedNode> = graph
            .visible_nodes()
            .filter_map(|node| placed.remove(node.id.as_str()))
            .collect();

        debug!(
            value_chains = columns.value_chains.len(),
            products = columns.products.len(),
            cluster = %cluster.id,
            vc_spacing = vc_spacing.spacing,
            product_spacing = pr_spacing.spacing,
            "laid out cluster tree"
        );

        PositionedGraph {
            node_positions,
            link_positions,
            width: dimensions.width,
            height: dimensions.height,
        }
    }

    fn column_spacing(&self, count: usize, area: f64, column: &ColumnConfig) -> ColumnSpacing {
        let node_height = self.config.node_height;
        let spacing = dynamic_spacing(count, area, node_height, column.max_spacing);
        if count > 1 && count as f64 * node_height > area {
            debug!(count, area, "column overflows; nodes overlap");
        }
        spacing
    }

    fn place(&self, node: &Node, x: f64, y: f64, max_label: usize) -> PositionedNode {
        PositionedNode {
            id: node.id.clone(),
            label: node.label.clone(),
            display_label: truncate_label(&node.label, max_label),
            kind: node.kind,
            x,
            y,
            width: self.config.node_width,
            height: self.config.node_height,
            metrics: node.metrics,
        }
    }
}
