//! Per-country metric rows and product ordering.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::rows::{lenient_f64, lenient_id};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMetric {
    #[serde(deserialize_with = "lenient_id")]
    pub product_id: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub export_rca: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub export_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub normalized_pci: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetric {
    #[serde(deserialize_with = "lenient_id")]
    pub cluster_id: u32,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub pci: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub cog: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rca: Option<f64>,
}

impl ClusterMetric {
    /// Name used to match the metric against cluster nodes.
    pub fn display_name(&self) -> String {
        self.cluster_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Cluster {}", self.cluster_id))
    }
}

/// Metrics for one country and year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryMetrics {
    #[serde(default)]
    pub product_data: Vec<ProductMetric>,
    #[serde(default)]
    pub cluster_data: Vec<ClusterMetric>,
}

impl CountryMetrics {
    pub fn index(&self) -> MetricsIndex<'_> {
        let mut by_product = HashMap::with_capacity(self.product_data.len());
        for metric in &self.product_data {
            by_product.entry(metric.product_id).or_insert(metric);
        }
        MetricsIndex { by_product }
    }
}

/// Product id -> metric lookup. The first row wins on duplicate ids.
pub struct MetricsIndex<'a> {
    by_product: HashMap<u32, &'a ProductMetric>,
}

impl<'a> MetricsIndex<'a> {
    pub fn product(&self, product_id: u32) -> Option<&'a ProductMetric> {
        self.by_product.get(&product_id).copied()
    }

    pub fn rca(&self, product_id: u32) -> Option<f64> {
        self.product(product_id).and_then(|m| m.export_rca)
    }
}

/// How the product column is ordered top to bottom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductOrdering {
    /// Highest RCA first.
    #[default]
    Rca,
    ExportValue,
    Complexity,
    /// Alphabetical by label.
    Label,
}

impl ProductOrdering {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rca" => Some(Self::Rca),
            "export_value" => Some(Self::ExportValue),
            "complexity" => Some(Self::Complexity),
            "label" => Some(Self::Label),
            _ => None,
        }
    }
}
