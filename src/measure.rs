use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
/// Single-column ellipsis used by the ranking strip.
pub const STRIP_ELLIPSIS: &str = "\u{2026}";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    /// Approximate pixel width of one display column of label text
    pub char_width: f64,
    /// Room kept right of the product labels for the axis and legend
    pub axis_reserve: f64,
    pub min_label_width: f64,
    pub max_label_width: f64,
    pub min_char_limit: usize,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            char_width: 9.0,
            axis_reserve: 80.0,
            min_label_width: 200.0,
            max_label_width: 600.0,
            min_char_limit: 15,
        }
    }
}

/// Horizontal room for product labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelBudget {
    pub max_width: f64,
    pub char_limit: usize,
}

impl LabelMetrics {
    pub fn mobile() -> Self {
        Self {
            char_width: 7.0,
            ..Self::default()
        }
    }

    pub fn product_label_budget(&self, right_margin: f64) -> LabelBudget {
        let available = right_margin - self.axis_reserve;
        let max_width = available
            .min(self.max_label_width)
            .max(self.min_label_width);
        let columns = (max_width / self.char_width).floor();
        let char_limit = if columns.is_finite() && columns > 0.0 {
            (columns as usize).max(self.min_char_limit)
        } else {
            self.min_char_limit
        };
        LabelBudget {
            max_width,
            char_limit,
        }
    }
}

/// Cut `label` to at most `max_columns` display columns, ending in `...`.
pub fn truncate_label(label: &str, max_columns: usize) -> String {
    truncate_with(label, max_columns, ELLIPSIS)
}

/// Cut `label` to at most `max_columns` display columns, ending in `ellipsis`.
///
/// When the limit is narrower than the ellipsis itself, the ellipsis is cut too.
pub fn truncate_with(label: &str, max_columns: usize, ellipsis: &str) -> String {
    if UnicodeWidthStr::width(label) <= max_columns {
        return label.to_string();
    }
    let budget = max_columns.saturating_sub(UnicodeWidthStr::width(ellipsis));
    let mut out = take_columns(label, budget);
    out.push_str(&take_columns(ellipsis, max_columns - UnicodeWidthStr::width(out.as_str())));
    out
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > columns {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}
