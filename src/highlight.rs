//! Hover highlighting: which nodes and links connect to a node.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::hierarchy::{Hierarchy, NodeKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub nodes: BTreeSet<String>,
    pub links: BTreeSet<String>,
}

impl Highlight {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_link(&self, id: &str) -> bool {
        self.links.contains(id)
    }
}

impl Hierarchy {
    /// Nodes and links to emphasize while `node_id` is hovered.
    ///
    /// A cluster lights up its direct neighbors. A value chain follows its
    /// products through the cluster links that list it, and a product lights
    /// up the value chains listed on its incoming links.
    pub fn connected(&self, node_id: &str) -> Highlight {
        let Some(node) = self.node(node_id) else {
            return Highlight::default();
        };

        let mut nodes = BTreeSet::from([node.id.clone()]);

        match node.kind {
            NodeKind::ManufacturingCluster => {
                let mut links = BTreeSet::new();
                for link in &self.links {
                    if link.source == node.id {
                        nodes.insert(link.target.clone());
                    } else if link.target == node.id {
                        nodes.insert(link.source.clone());
                    } else {
                        continue;
                    }
                    links.insert(link.id.clone());
                }
                return Highlight { nodes, links };
            }
            NodeKind::ValueChain => {
                for link in &self.links {
                    if link.supply_chains.iter().any(|vc| *vc == node.id) {
                        nodes.insert(link.source.clone());
                        nodes.insert(link.target.clone());
                    }
                }
            }
            NodeKind::Product => {
                for link in self.links.iter().filter(|l| l.target == node.id) {
                    nodes.insert(link.source.clone());
                    nodes.extend(link.supply_chains.iter().cloned());
                }
            }
        }

        let links = self
            .links
            .iter()
            .filter(|l| nodes.contains(&l.source) && nodes.contains(&l.target))
            .map(|l| l.id.clone())
            .collect();

        Highlight { nodes, links }
    }
}
