pub mod highlight;
pub mod hierarchy;
pub mod layout;
pub mod measure;
pub mod metrics;
pub mod ranking;
pub mod rows;
pub mod subtree;
pub mod view;
pub mod visibility;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use hierarchy::Hierarchy;
use layout::{
    Breakpoint, BreakpointThresholds, Dimensions, LayoutConfig, LayoutEngine, Margins,
    MarginPolicy, PositionedGraph, ViewportPolicy,
};
use metrics::{CountryMetrics, ProductOrdering};
use ranking::{RankedCluster, RankingLayout, default_focus, score_clusters};
use rows::{InputError, ProductClusterRow, parse_metrics, parse_rows};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Everything that shapes one cluster tree layout besides the data.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeOptions {
    /// Cluster to focus; the best ranked cluster when absent
    pub focus: Option<String>,
    /// Size of the container the view is mounted in
    pub container: Dimensions,
    /// Force the mobile presets regardless of width
    pub mobile: bool,
    /// Sidebar collapsed; widens the right margin
    pub condensed: bool,
    /// Drop products below this RCA first; zero keeps everything
    pub min_rca: f64,
    pub ordering: ProductOrdering,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            focus: None,
            container: Dimensions::new(1280.0, 900.0),
            mobile: false,
            condensed: false,
            min_rca: 0.0,
            ordering: ProductOrdering::default(),
        }
    }
}

impl TreeOptions {
    pub fn breakpoint(&self) -> Breakpoint {
        if self.mobile {
            Breakpoint::Mobile
        } else {
            Breakpoint::classify(self.container.width, &BreakpointThresholds::default())
        }
    }
}

/// Layout plus the context a renderer needs to draw it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTree {
    pub focus: Option<String>,
    pub breakpoint: Breakpoint,
    pub tree_area: Dimensions,
    pub margins: Margins,
    #[serde(flatten)]
    pub layout: PositionedGraph,
    pub ranking: Vec<RankedCluster>,
}

/// Build, focus and lay out a cluster tree.
pub fn cluster_tree(
    rows: &[ProductClusterRow],
    metrics: Option<&CountryMetrics>,
    options: &TreeOptions,
) -> ClusterTree {
    let breakpoint = options.breakpoint();
    let viewport = ViewportPolicy::for_breakpoint(breakpoint);
    let tree_area = viewport.tree_area(options.container);
    let margins = MarginPolicy::for_breakpoint(breakpoint).margins(tree_area, options.condensed);

    let full = Hierarchy::build(rows, metrics);
    let graph = full.filter_by_product_rca(options.min_rca);
    let scores = metrics
        .map(|m| score_clusters(&m.cluster_data))
        .unwrap_or_default();
    let focus = options
        .focus
        .clone()
        .or_else(|| default_focus(&graph, &scores));

    let engine = LayoutEngine::new(LayoutConfig {
        product_ordering: options.ordering,
        ..LayoutConfig::for_breakpoint(breakpoint)
    });
    let layout = engine.layout(&graph.focus(focus.as_deref()), tree_area, margins);
    // export totals cover every product of a cluster, filtered or not
    let ranking = RankingLayout::default().layout(&scores, &full, viewport.ranking_height);

    ClusterTree {
        focus,
        breakpoint,
        tree_area,
        margins,
        layout,
        ranking,
    }
}

/// JSON in, JSON out version of [`cluster_tree`].
pub fn layout_json(
    rows_json: &str,
    metrics_json: Option<&str>,
    options: &TreeOptions,
) -> Result<String, InputError> {
    let rows = parse_rows(rows_json)?;
    let metrics = metrics_json.map(parse_metrics).transpose()?;
    let tree = cluster_tree(&rows, metrics.as_ref(), options);
    Ok(serde_json::to_string(&tree)?)
}

/// Nodes and links to emphasize while `node_id` is hovered, as JSON.
pub fn highlight_json(rows_json: &str, node_id: &str) -> Result<String, InputError> {
    let rows = parse_rows(rows_json)?;
    let highlight = Hierarchy::build(&rows, None).connected(node_id);
    Ok(serde_json::to_string(&highlight)?)
}

/// Lay out a cluster tree from JSON rows and metrics
#[wasm_bindgen(js_name = "clusterTreeLayout")]
pub fn cluster_tree_layout(
    rows_json: &str,
    metrics_json: Option<String>,
    focus: Option<String>,
    width: f64,
    height: f64,
    mobile: Option<bool>,
    condensed: Option<bool>,
) -> Result<JsValue, JsValue> {
    let options = TreeOptions {
        focus,
        container: Dimensions::new(width, height),
        mobile: mobile.unwrap_or(false),
        condensed: condensed.unwrap_or(false),
        ..TreeOptions::default()
    };
    let json = layout_json(rows_json, metrics_json.as_deref(), &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// Hover highlight for one node
#[wasm_bindgen(js_name = "clusterTreeHighlight")]
pub fn cluster_tree_highlight(rows_json: &str, node_id: &str) -> Result<String, String> {
    highlight_json(rows_json, node_id).map_err(|e| e.to_string())
}
