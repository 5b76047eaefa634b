//! Three-column cluster tree layout.
//!
//! Value chains sit on the left margin, the focused cluster a fixed fraction of
//! the way across, and the cluster's products on the right margin. Columns are
//! spaced vertically by [`dynamic_spacing`], which shrinks gaps until the column
//! fits rather than scaling the drawing.

mod columns;
mod curves;
mod engine;
pub mod margins;
mod spacing;
mod types;

pub use columns::sort_products;
pub use curves::{curve_intensity, link_anchor};
pub use engine::{ColumnConfig, LabelLimits, LayoutConfig, LayoutEngine};
pub use margins::{Breakpoint, BreakpointThresholds, MarginPolicy, ViewportPolicy};
pub use spacing::{ColumnSpacing, dynamic_spacing};
pub use types::{
    CubicCurve, Dimensions, Margins, Point, PositionedGraph, PositionedLink, PositionedNode,
};
