//! Focus-based visibility: the focused cluster and its one-hop neighborhood.

use std::collections::{HashMap, HashSet};

use crate::hierarchy::{Hierarchy, Node, NodeKind};

impl Hierarchy {
    /// Return a copy with `visible` set for the focused cluster's neighborhood.
    ///
    /// An absent focus, an unknown id, or an id naming a non-cluster node all
    /// produce a fully invisible graph.
    pub fn focus(&self, focused: Option<&str>) -> Hierarchy {
        let focus = focused.filter(|id| {
            self.node(id)
                .is_some_and(|n| n.kind == NodeKind::ManufacturingCluster)
        });
        let Some(focus) = focus else {
            return self.hidden();
        };

        let upstream: HashSet<&str> = self
            .links
            .iter()
            .filter(|l| l.target == focus)
            .map(|l| l.source.as_str())
            .collect();
        let downstream: HashSet<&str> = self
            .links
            .iter()
            .filter(|l| l.source == focus)
            .map(|l| l.target.as_str())
            .collect();

        let nodes: Vec<Node> = self
            .nodes
            .iter()
            .map(|node| {
                let visible = match node.kind {
                    NodeKind::ManufacturingCluster => node.id == focus,
                    NodeKind::ValueChain => upstream.contains(node.id.as_str()),
                    NodeKind::Product => downstream.contains(node.id.as_str()),
                };
                Node {
                    visible,
                    ..node.clone()
                }
            })
            .collect();

        let visibility: HashMap<&str, bool> =
            nodes.iter().map(|n| (n.id.as_str(), n.visible)).collect();
        let is_visible = |id: &str| visibility.get(id).copied().unwrap_or(false);

        let links = self
            .links
            .iter()
            .map(|link| {
                let mut link = link.clone();
                link.visible = is_visible(&link.source) && is_visible(&link.target);
                link
            })
            .collect();

        Hierarchy { nodes, links }
    }

    /// The cluster currently carrying focus, if any.
    pub fn focused_cluster(&self) -> Option<&Node> {
        self.nodes_of(NodeKind::ManufacturingCluster).find(|n| n.visible)
    }

    fn hidden(&self) -> Hierarchy {
        Hierarchy {
            nodes: self
                .nodes
                .iter()
                .map(|n| Node {
                    visible: false,
                    ..n.clone()
                })
                .collect(),
            links: self
                .links
                .iter()
                .map(|l| {
                    let mut l = l.clone();
                    l.visible = false;
                    l
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::ProductClusterRow;

    fn graph() -> Hierarchy {
        Hierarchy::build(
            &[
                ProductClusterRow::new("Batteries", "Battery Materials", 1, "Lithium carbonate"),
                ProductClusterRow::new("Batteries", "Battery Materials", 2, "Cobalt"),
                ProductClusterRow::new("Electric Vehicles", "Battery Materials", 2, "Cobalt"),
                ProductClusterRow::new("Electric Vehicles", "Motors", 3, "Magnets"),
            ],
            None,
        )
    }

    #[test]
    fn test_no_focus_hides_everything() {
        let filtered = graph().focus(None);
        assert!(filtered.nodes.iter().all(|n| !n.visible));
        assert!(filtered.links.iter().all(|l| !l.visible));
    }

    #[test]
    fn test_unknown_focus_hides_everything() {
        let filtered = graph().focus(Some("Nope"));
        assert_eq!(filtered.visible_nodes().count(), 0);
        assert_eq!(filtered.visible_links().count(), 0);
    }

    #[test]
    fn test_focus_on_non_cluster_hides_everything() {
        let filtered = graph().focus(Some("Batteries"));
        assert_eq!(filtered.visible_nodes().count(), 0);
    }

    #[test]
    fn test_one_hop_neighborhood() {
        let filtered = graph().focus(Some("Battery Materials"));
        let mut visible: Vec<&str> = filtered.visible_nodes().map(|n| n.id.as_str()).collect();
        visible.sort();
        assert_eq!(
            visible,
            vec!["1", "2", "Batteries", "Battery Materials", "Electric Vehicles"]
        );
        assert!(!filtered.node("Motors").unwrap().visible);
        assert!(!filtered.node("3").unwrap().visible);
        assert_eq!(filtered.focused_cluster().unwrap().id, "Battery Materials");
    }

    #[test]
    fn test_links_need_both_endpoints() {
        let filtered = graph().focus(Some("Motors"));
        for link in &filtered.links {
            let source = filtered.node(&link.source).unwrap().visible;
            let target = filtered.node(&link.target).unwrap().visible;
            assert_eq!(link.visible, source && target);
        }
        // EV is visible, but its link into Battery Materials is not
        let ev_link = filtered
            .links
            .iter()
            .find(|l| l.id == "vc-Electric Vehicles-cl-Battery Materials")
            .unwrap();
        assert!(!ev_link.visible);
    }

    #[test]
    fn test_focus_is_idempotent_and_pure() {
        let base = graph();
        let once = base.focus(Some("Motors"));
        let twice = once.focus(Some("Motors"));
        assert_eq!(once, twice);
        assert!(base.nodes.iter().all(|n| !n.visible));
    }
}
