//! Stateful view that memoizes the last layout.

use tracing::debug;

use crate::hierarchy::Hierarchy;
use crate::layout::{Dimensions, LayoutEngine, Margins, PositionedGraph};
use crate::metrics::CountryMetrics;
use crate::rows::ProductClusterRow;

#[derive(Debug, Clone, PartialEq)]
struct LayoutKey {
    version: u64,
    focus: Option<String>,
    dimensions: Dimensions,
    margins: Margins,
}

/// Owns the current hierarchy and recomputes positions only when the data
/// version, focus, dimensions or margins change.
#[derive(Debug, Default)]
pub struct TreeView {
    engine: LayoutEngine,
    graph: Hierarchy,
    version: u64,
    cached: Option<(LayoutKey, PositionedGraph)>,
    layout_passes: usize,
}

impl TreeView {
    pub fn new(engine: LayoutEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn set_data(&mut self, rows: &[ProductClusterRow], metrics: Option<&CountryMetrics>) {
        self.graph = Hierarchy::build(rows, metrics);
        self.version += 1;
        self.cached = None;
    }

    /// Swap the layout configuration. Drops the cached layout.
    pub fn set_engine(&mut self, engine: LayoutEngine) {
        if engine != self.engine {
            self.engine = engine;
            self.cached = None;
        }
    }

    pub fn graph(&self) -> &Hierarchy {
        &self.graph
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of layouts actually computed so far.
    pub fn layout_passes(&self) -> usize {
        self.layout_passes
    }

    pub fn positions(
        &mut self,
        focus: Option<&str>,
        dimensions: Dimensions,
        margins: Margins,
    ) -> &PositionedGraph {
        let key = LayoutKey {
            version: self.version,
            focus: focus.map(str::to_string),
            dimensions,
            margins,
        };

        if self.cached.as_ref().is_some_and(|(cached, _)| *cached != key) {
            self.cached = None;
        }
        let (_, positioned) = self.cached.get_or_insert_with(|| {
            let focused = self.graph.focus(focus);
            let positioned = self.engine.layout(&focused, dimensions, margins);
            self.layout_passes += 1;
            debug!(version = self.version, focus, "recomputed layout");
            (key, positioned)
        });
        positioned
    }
}
