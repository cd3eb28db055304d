use super::finder::{FindInput, FindOptions};
use super::pattern::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `analyze` takes the same input as `find`
pub type AnalyzeInput<'a> = FindInput<'a>;

/// `analyze` filters patterns exactly like `find`
pub type AnalyzeOptions = FindOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_records: usize,
    pub filtered_records: usize,
    /// Percentage of records kept by the query
    pub filter_ratio: f64,
    pub patterns_found: usize,
    pub max_concentration: f64,
    pub avg_concentration: f64,
}

/// Shape of the concentration values across all patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcentrationDistribution {
    #[serde(rename = "No patterns found")]
    NoPatterns,
    #[serde(rename = "High concentration patterns dominant")]
    HighDominant,
    #[serde(rename = "Moderate concentration patterns")]
    Moderate,
    #[serde(rename = "Low concentration patterns prevalent")]
    LowPrevalent,
}

impl ConcentrationDistribution {
    pub fn describe(&self) -> &'static str {
        match self {
            ConcentrationDistribution::NoPatterns => "No patterns found",
            ConcentrationDistribution::HighDominant => "High concentration patterns dominant",
            ConcentrationDistribution::Moderate => "Moderate concentration patterns",
            ConcentrationDistribution::LowPrevalent => "Low concentration patterns prevalent",
        }
    }
}

impl fmt::Display for ConcentrationDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub patterns_found: usize,
    pub max_concentration: f64,
    pub avg_concentration: f64,
    pub concentration_distribution: ConcentrationDistribution,
}

/// Occurrences of one value of a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

/// Distribution of a single field across the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub total_count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: usize,
    /// Detected value type: string, integer, float, boolean, datetime, mixed or null
    pub value_type: String,
    /// Most frequent values, highest first
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeOutput {
    pub patterns: Vec<Pattern>,
    pub insights: Insights,
    pub statistics: Statistics,
    pub field_stats: BTreeMap<String, FieldStats>,
    /// First five patterns
    pub top_patterns: Vec<Pattern>,
    pub fields_analyzed: Vec<String>,
}
