//! Relational input rows as delivered by the data layer.

use serde::{Deserialize, Deserializer, Serialize};

use crate::metrics::CountryMetrics;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One (value chain, cluster, product) membership row.
///
/// Every field is optional on the wire; rows missing the identifiers the
/// hierarchy needs are skipped by the builder instead of failing the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductClusterRow {
    #[serde(default)]
    pub supply_chain: Option<String>,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_id")]
    pub product_id: Option<u32>,
    #[serde(default)]
    pub name_short_en: Option<String>,
    #[serde(default, rename = "HS2012_4dg")]
    pub hs_code: Option<String>,
}

impl ProductClusterRow {
    pub fn new(supply_chain: &str, cluster_name: &str, product_id: u32, name: &str) -> Self {
        Self {
            supply_chain: Some(supply_chain.to_string()),
            cluster_name: Some(cluster_name.to_string()),
            product_id: Some(product_id),
            name_short_en: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn value_chain(&self) -> Option<&str> {
        non_blank(self.supply_chain.as_deref())
    }

    pub fn cluster(&self) -> Option<&str> {
        non_blank(self.cluster_name.as_deref())
    }

    /// Node id of the product: the decimal product id.
    pub fn product_key(&self) -> Option<String> {
        self.product_id.map(|id| id.to_string())
    }

    /// Short name, then HS code, then the bare id.
    pub fn product_label(&self) -> String {
        non_blank(self.name_short_en.as_deref())
            .or_else(|| non_blank(self.hs_code.as_deref()))
            .map(str::to_string)
            .or_else(|| self.product_key())
            .unwrap_or_default()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_rows(json: &str) -> Result<Vec<ProductClusterRow>, InputError> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_metrics(json: &str) -> Result<CountryMetrics, InputError> {
    Ok(serde_json::from_str(json)?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Num(f64),
    Text(String),
}

impl Lenient {
    fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Lenient::Num(n) => *n,
            Lenient::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    fn as_id(&self) -> Option<u32> {
        match self {
            Lenient::Num(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 => {
                Some(*n as u32)
            }
            Lenient::Num(_) => None,
            Lenient::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }
}

/// Accepts `1.5`, `"1.5"` or `null`; anything unparseable becomes `None`.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Lenient> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Lenient::as_f64))
}

pub(crate) fn lenient_opt_id<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Lenient> = Option::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Lenient::as_id))
}

pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Lenient::deserialize(deserializer)?;
    raw.as_id()
        .ok_or_else(|| serde::de::Error::custom("expected a non-negative integer id"))
}
