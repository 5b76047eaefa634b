//! Dynamic vertical spacing for one column.

/// Vertical placement of a column of equally sized nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpacing {
    /// Gap between consecutive nodes
    pub spacing: f64,
    /// Offset of the first node's top edge from the top of the column area
    pub start_y: f64,
}

impl ColumnSpacing {
    /// Top edge of the node at `index`, relative to the column area.
    pub fn offset(&self, index: usize, node_height: f64) -> f64 {
        self.start_y + index as f64 * (node_height + self.spacing)
    }

    /// (top, bottom) of a column holding `count` nodes, or `None` when empty.
    pub fn extent(&self, count: usize, node_height: f64) -> Option<(f64, f64)> {
        if count == 0 {
            return None;
        }
        Some((self.start_y, self.offset(count - 1, node_height) + node_height))
    }
}

/// Spread `item_count` nodes of `node_height` over `available_height`.
///
/// Gaps shrink as far as zero so the column always fits; they never grow past
/// `max_spacing`, leftover room becomes equal top and bottom margin. When the
/// nodes alone are taller than the area the gap is zero and nodes overlap.
pub fn dynamic_spacing(
    item_count: usize,
    available_height: f64,
    node_height: f64,
    max_spacing: f64,
) -> ColumnSpacing {
    if item_count <= 1 {
        return ColumnSpacing {
            spacing: 0.0,
            start_y: (available_height / 2.0).max(0.0),
        };
    }

    let total_node_height = item_count as f64 * node_height;
    let gap_count = (item_count - 1) as f64;
    let available_spacing_height = (available_height - total_node_height).max(0.0);

    let fitted_spacing = available_spacing_height / gap_count;
    let spacing = max_spacing.min(fitted_spacing);

    let total_used_height = total_node_height + gap_count * spacing;
    let start_y = ((available_height - total_used_height) / 2.0).max(0.0);

    ColumnSpacing { spacing, start_y }
}
