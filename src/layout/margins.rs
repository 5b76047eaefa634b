//! Responsive margins and tree viewport.
//!
//! The breakpoints and factors here were tuned by eye for the story pages;
//! every one of them is a field so callers can retune without code changes.

use serde::{Deserialize, Serialize};

use super::types::{Dimensions, Margins};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakpointThresholds {
    /// Widths below this are mobile
    pub mobile_below: f64,
    /// Widths below this (and not mobile) are tablet
    pub tablet_below: f64,
}

impl Default for BreakpointThresholds {
    fn default() -> Self {
        Self {
            mobile_below: 600.0,
            tablet_below: 900.0,
        }
    }
}

impl Breakpoint {
    pub fn classify(width: f64, thresholds: &BreakpointThresholds) -> Self {
        if width < thresholds.mobile_below {
            Self::Mobile
        } else if width < thresholds.tablet_below {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == Self::Mobile
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mobile" => Some(Self::Mobile),
            "tablet" => Some(Self::Tablet),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginPolicy {
    pub top: f64,
    pub left_base: f64,
    pub left_fraction: f64,
    pub right_base: f64,
    pub right_fraction: f64,
    /// Upper bound on the proportional right margin, as a fraction of width
    pub right_cap_fraction: f64,
    /// Right margin multiplier while the sidebar is condensed
    pub condensed_factor: f64,
    pub bottom_base: f64,
    pub bottom_min: f64,
    pub bottom_max: f64,
    pub bottom_fraction: f64,
}

impl Default for MarginPolicy {
    fn default() -> Self {
        Self::desktop()
    }
}

impl MarginPolicy {
    pub fn desktop() -> Self {
        Self {
            top: 48.0,
            left_base: 180.0,
            left_fraction: 0.1,
            right_base: 380.0,
            right_fraction: 0.25,
            right_cap_fraction: 0.65,
            condensed_factor: 1.4,
            bottom_base: 200.0,
            bottom_min: 120.0,
            bottom_max: 260.0,
            bottom_fraction: 0.3,
        }
    }

    pub fn mobile() -> Self {
        Self {
            top: 36.0,
            left_base: 140.0,
            right_base: 280.0,
            bottom_base: 140.0,
            bottom_min: 100.0,
            bottom_max: 180.0,
            ..Self::desktop()
        }
    }

    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        if breakpoint.is_mobile() {
            Self::mobile()
        } else {
            Self::desktop()
        }
    }

    /// Margins for a tree area of `dimensions`.
    pub fn margins(&self, dimensions: Dimensions, condensed: bool) -> Margins {
        let w = dimensions.width.max(0.0);
        let h = dimensions.height.max(0.0);

        let left = self.left_base.max((w * self.left_fraction).round());

        let factor = if condensed { self.condensed_factor } else { 1.0 };
        let proportional = (w * self.right_fraction * factor)
            .round()
            .min((w * self.right_cap_fraction).round());
        let right = (self.right_base * factor).round().max(proportional);

        let bottom = self
            .bottom_base
            .min((h * self.bottom_fraction).round())
            .max(self.bottom_min)
            .min(self.bottom_max);

        Margins {
            top: self.top,
            right,
            bottom,
            left,
        }
    }
}

/// Carves the tree area out of the container the view is mounted in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPolicy {
    pub horizontal_padding: f64,
    pub min_width: f64,
    /// Title plus its bottom margin
    pub header_height: f64,
    /// Cluster ranking strip under the tree
    pub ranking_height: f64,
    pub vertical_spacing: f64,
    pub min_height: f64,
}

impl ViewportPolicy {
    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        let (horizontal_padding, ranking_height, vertical_spacing) = match breakpoint {
            Breakpoint::Mobile => (16.0, 100.0, 16.0),
            Breakpoint::Tablet => (32.0, 110.0, 24.0),
            Breakpoint::Desktop => (32.0, 120.0, 24.0),
        };
        Self {
            horizontal_padding,
            min_width: 300.0,
            header_height: 92.0,
            ranking_height,
            vertical_spacing,
            min_height: 200.0,
        }
    }

    pub fn tree_area(&self, container: Dimensions) -> Dimensions {
        let width = (container.width - self.horizontal_padding).max(self.min_width);
        let height = (container.height
            - self.header_height
            - self.ranking_height
            - self.vertical_spacing * 2.0)
            .max(self.min_height);
        Dimensions { width, height }
    }
}

impl Default for ViewportPolicy {
    fn default() -> Self {
        Self::for_breakpoint(Breakpoint::Desktop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        let t = BreakpointThresholds::default();
        assert_eq!(Breakpoint::classify(375.0, &t), Breakpoint::Mobile);
        assert_eq!(Breakpoint::classify(600.0, &t), Breakpoint::Tablet);
        assert_eq!(Breakpoint::classify(1440.0, &t), Breakpoint::Desktop);
    }

    #[test]
    fn test_desktop_margins() {
        let m = MarginPolicy::desktop().margins(Dimensions::new(1200.0, 600.0), false);
        assert_eq!(m.left, 180.0);
        assert_eq!(m.right, 380.0);
        assert_eq!(m.bottom, 180.0);
        assert_eq!(m.top, 48.0);
    }

    #[test]
    fn test_wide_desktop_margins_scale() {
        let m = MarginPolicy::desktop().margins(Dimensions::new(2400.0, 1200.0), false);
        assert_eq!(m.left, 240.0);
        assert_eq!(m.right, 600.0);
        assert_eq!(m.bottom, 200.0);
    }

    #[test]
    fn test_condensed_widens_right_margin() {
        let m = MarginPolicy::desktop().margins(Dimensions::new(1200.0, 600.0), true);
        assert_eq!(m.right, 532.0);
    }

    #[test]
    fn test_bottom_margin_bounds() {
        let policy = MarginPolicy::desktop();
        let short = policy.margins(Dimensions::new(1200.0, 200.0), false);
        assert_eq!(short.bottom, 120.0);

        let mobile = MarginPolicy::mobile().margins(Dimensions::new(360.0, 900.0), false);
        assert_eq!(mobile.bottom, 140.0);
        assert_eq!(mobile.left, 140.0);
        assert_eq!(mobile.right, 280.0);
    }

    #[test]
    fn test_tree_area() {
        let desktop = ViewportPolicy::for_breakpoint(Breakpoint::Desktop);
        let area = desktop.tree_area(Dimensions::new(1280.0, 900.0));
        assert_eq!(area, Dimensions::new(1248.0, 640.0));

        let tiny = desktop.tree_area(Dimensions::new(100.0, 100.0));
        assert_eq!(tiny, Dimensions::new(300.0, 200.0));
    }
}
