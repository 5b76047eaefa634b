//! Link anchoring and curve generation.

use crate::hierarchy::{Link, NodeKind};

use super::types::{CubicCurve, Point, PositionedLink, PositionedNode};

/// Where a link attaches to a node: clusters at their center, other nodes at
/// the middle of the side facing the link.
pub fn link_anchor(node: &PositionedNode, is_source: bool) -> Point {
    let center = node.center();
    match node.kind {
        NodeKind::ManufacturingCluster => center,
        _ if is_source => Point::new(node.x + node.width, center.y),
        _ => Point::new(node.x, center.y),
    }
}

/// How strongly a renderer may bend a link with this vertical travel, in [0, 0.8].
pub fn curve_intensity(vertical_distance: f64) -> f64 {
    (vertical_distance.abs() / 300.0).min(0.8)
}

pub(crate) fn position_link(
    link: &Link,
    source: &PositionedNode,
    target: &PositionedNode,
) -> PositionedLink {
    let start = link_anchor(source, true);
    let end = link_anchor(target, false);
    let curve = CubicCurve::s_curve(start, end);

    PositionedLink {
        id: link.id.clone(),
        source_name: link.source.clone(),
        target_name: link.target.clone(),
        source_x: start.x,
        source_y: start.y,
        target_x: end.x,
        target_y: end.y,
        value: link.value,
        curve_intensity: curve_intensity(end.y - start.y),
        path: curve.svg_path(),
        curve,
    }
}
