use super::record::Record;
use crate::error::DataspotError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between `field=value` segments of a path
pub const PATH_SEPARATOR: &str = " > ";

/// A concentration pattern: one node of the hierarchical count tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// e.g. `country=US > device=mobile`
    pub path: String,
    pub count: usize,
    /// Share of all analysed records, rounded to 2 decimals
    pub percentage: f64,
    pub depth: usize,
    /// Up to three records that reached this node
    #[serde(default)]
    pub samples: Vec<Record>,
}

/// Field used to order patterns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Percentage,
    Count,
    Depth,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Percentage => "percentage",
            SortField::Count => "count",
            SortField::Depth => "depth",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = DataspotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percentage" => Ok(SortField::Percentage),
            "count" => Ok(SortField::Count),
            "depth" => Ok(SortField::Depth),
            other => Err(DataspotError::query(format!(
                "Invalid sort field '{}'; expected percentage, count or depth",
                other
            ))),
        }
    }
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `count` as a percentage of `total`, rounded to two decimals
pub(crate) fn percentage_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}
