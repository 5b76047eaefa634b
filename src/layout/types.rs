//! Data structures for layout computation.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::hierarchy::{NodeKind, NodeMetrics};

/// Pixel size of the drawing area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Space reserved around the tree for labels, icons and the legend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A positioned node. `x`/`y` is the top-left corner of its box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    /// Label cut to the column's character limit
    pub display_label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub metrics: NodeMetrics,
}

impl PositionedNode {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Cubic Bézier from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CubicCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// Horizontal S-curve: both control points sit half the horizontal
    /// distance in from their endpoint, at the endpoint's height.
    pub fn s_curve(start: Point, end: Point) -> Self {
        let offset = (end.x - start.x).abs() * 0.5;
        Self {
            start,
            control1: Point::new(start.x + offset, start.y),
            control2: Point::new(end.x - offset, end.y),
            end,
        }
    }

    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }

    /// SVG path data, `M sx sy C c1x c1y, c2x c2y, tx ty`.
    pub fn svg_path(&self) -> String {
        let mut d = String::new();
        let _ = write!(
            d,
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        );
        d
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedLink {
    pub id: String,
    pub source_name: String,
    pub target_name: String,
    pub source_x: f64,
    pub source_y: f64,
    pub target_x: f64,
    pub target_y: f64,
    pub value: f64,
    pub curve_intensity: f64,
    pub curve: CubicCurve,
    pub path: String,
}

/// The complete layout result handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedGraph {
    pub node_positions: Vec<PositionedNode>,
    pub link_positions: Vec<PositionedLink>,
    pub width: f64,
    pub height: f64,
}

impl PositionedGraph {
    pub fn empty(dimensions: Dimensions) -> Self {
        Self {
            node_positions: Vec::new(),
            link_positions: Vec::new(),
            width: dimensions.width,
            height: dimensions.height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.node_positions.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.node_positions.iter().find(|n| n.id == id)
    }

    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &PositionedNode> {
        self.node_positions.iter().filter(move |n| n.kind == kind)
    }
}
