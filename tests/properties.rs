//! Property tests for hierarchy building, focus and column spacing.

use clustertree::hierarchy::{Hierarchy, NodeKind};
use clustertree::layout::{Dimensions, LayoutEngine, MarginPolicy, dynamic_spacing};
use clustertree::rows::ProductClusterRow;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const EPSILON: f64 = 1e-9;

// ============================================================================
// Strategies
// ============================================================================

fn value_chain_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Batteries".to_string()),
        Just("Electric Vehicles".to_string()),
        Just("Solar Power".to_string()),
        Just("Wind Power".to_string()),
        "[A-Z][a-z]{3,8} Chain",
    ]
}

fn cluster_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Battery Materials".to_string()),
        Just("Cathodes".to_string()),
        Just("Silicon".to_string()),
        Just("Motors".to_string()),
    ]
}

fn row_strategy() -> impl Strategy<Value = ProductClusterRow> {
    (value_chain_strategy(), cluster_strategy(), 1u32..40, "[a-z]{3,12}")
        .prop_map(|(vc, cluster, id, name)| ProductClusterRow::new(&vc, &cluster, id, &name))
}

fn rows_strategy() -> impl Strategy<Value = Vec<ProductClusterRow>> {
    prop::collection::vec(row_strategy(), 0..40)
}

// ============================================================================
// Spacing
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn spacing_never_exceeds_bound(
        count in 2usize..60,
        available in 0.0f64..2000.0,
        node_height in 1.0f64..40.0,
        max_spacing in 0.0f64..200.0,
    ) {
        let s = dynamic_spacing(count, available, node_height, max_spacing);
        prop_assert!(s.spacing <= max_spacing + EPSILON);
        prop_assert!(s.spacing >= 0.0);
        prop_assert!(s.start_y >= 0.0);
    }

    #[test]
    fn spacing_fits_when_there_is_room(
        count in 2usize..60,
        node_height in 1.0f64..40.0,
        slack in 0.0f64..1000.0,
        max_spacing in 0.0f64..200.0,
    ) {
        let available = count as f64 * node_height + slack;
        let s = dynamic_spacing(count, available, node_height, max_spacing);
        let used = count as f64 * node_height + (count - 1) as f64 * s.spacing;
        prop_assert!(used <= available + EPSILON);
        prop_assert!(s.start_y + used <= available + EPSILON);
    }

    #[test]
    fn spacing_saturates_when_crowded(
        count in 2usize..60,
        node_height in 1.0f64..40.0,
        fraction in 0.0f64..0.99,
        max_spacing in 0.0f64..200.0,
    ) {
        let available = count as f64 * node_height * fraction;
        let s = dynamic_spacing(count, available, node_height, max_spacing);
        prop_assert_eq!(s.spacing, 0.0);
        prop_assert_eq!(s.start_y, 0.0);
    }

    #[test]
    fn single_item_is_centered(
        available in 0.0f64..2000.0,
        node_height in 1.0f64..40.0,
        max_spacing in 0.0f64..200.0,
    ) {
        let s = dynamic_spacing(1, available, node_height, max_spacing);
        prop_assert_eq!(s.start_y, available / 2.0);
        prop_assert_eq!(s.spacing, 0.0);
    }
}

// ============================================================================
// Hierarchy and focus
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn one_node_per_product_id(rows in rows_strategy()) {
        let graph = Hierarchy::build(&rows, None);
        let ids: HashSet<String> = rows.iter().filter_map(|r| r.product_key()).collect();
        for id in &ids {
            let count = graph
                .nodes
                .iter()
                .filter(|n| n.kind == NodeKind::Product && n.id == *id)
                .count();
            prop_assert_eq!(count, 1);
        }
    }

    #[test]
    fn node_ids_unique_and_links_resolve(rows in rows_strategy()) {
        let graph = Hierarchy::build(&rows, None);
        let mut seen = HashSet::new();
        for node in &graph.nodes {
            prop_assert!(seen.insert(node.id.clone()));
        }
        for link in &graph.links {
            prop_assert!(seen.contains(&link.source));
            prop_assert!(seen.contains(&link.target));
        }
    }

    #[test]
    fn link_visible_iff_both_endpoints_visible(
        rows in rows_strategy(),
        focus in prop::option::of(cluster_strategy()),
    ) {
        let graph = Hierarchy::build(&rows, None).focus(focus.as_deref());
        let visible: HashMap<&str, bool> = graph
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.visible))
            .collect();
        for link in &graph.links {
            let expected = visible[link.source.as_str()] && visible[link.target.as_str()];
            prop_assert_eq!(link.visible, expected);
        }
    }

    #[test]
    fn focus_shows_at_most_one_cluster(
        rows in rows_strategy(),
        focus in cluster_strategy(),
    ) {
        let graph = Hierarchy::build(&rows, None).focus(Some(focus.as_str()));
        let clusters: Vec<&str> = graph
            .visible_nodes()
            .filter(|n| n.kind == NodeKind::ManufacturingCluster)
            .map(|n| n.id.as_str())
            .collect();
        prop_assert!(clusters.len() <= 1);
        if let Some(cluster) = clusters.first() {
            prop_assert_eq!(*cluster, focus.as_str());
        }
    }

    #[test]
    fn layout_is_deterministic(
        rows in rows_strategy(),
        focus in cluster_strategy(),
        width in 300.0f64..2400.0,
        height in 200.0f64..1600.0,
    ) {
        let dims = Dimensions::new(width, height);
        let margins = MarginPolicy::desktop().margins(dims, false);
        let engine = LayoutEngine::default();

        let first = engine.layout(&Hierarchy::build(&rows, None).focus(Some(focus.as_str())), dims, margins);
        let second = engine.layout(&Hierarchy::build(&rows, None).focus(Some(focus.as_str())), dims, margins);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn layout_places_only_visible_nodes(
        rows in rows_strategy(),
        focus in cluster_strategy(),
    ) {
        let graph = Hierarchy::build(&rows, None).focus(Some(focus.as_str()));
        let dims = Dimensions::new(1200.0, 600.0);
        let layout = LayoutEngine::default().layout(&graph, dims, MarginPolicy::desktop().margins(dims, false));

        prop_assert_eq!(layout.node_positions.len(), graph.visible_nodes().count());
        prop_assert_eq!(layout.link_positions.len(), graph.visible_links().count());
        for link in &layout.link_positions {
            prop_assert!(layout.node(&link.source_name).is_some());
            prop_assert!(layout.node(&link.target_name).is_some());
        }
    }
}
