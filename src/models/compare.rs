use super::finder::FindOptions;
use super::query::Query;
use super::record::Record;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone)]
pub struct CompareInput<'a> {
    pub current_data: &'a [Record],
    pub baseline_data: &'a [Record],
    pub fields: Vec<String>,
    pub query: Option<Query>,
}

impl<'a> CompareInput<'a> {
    pub fn new<S: AsRef<str>>(
        current_data: &'a [Record],
        baseline_data: &'a [Record],
        fields: &[S],
    ) -> Self {
        Self {
            current_data,
            baseline_data,
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            query: None,
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Relative count change at which a change counts as significant
    pub change_threshold: f64,
    /// Run the chi-square analysis for patterns present in both periods
    pub statistical_significance: bool,
    #[serde(flatten)]
    pub filters: FindOptions,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            change_threshold: 0.15,
            statistical_significance: false,
            filters: FindOptions::default(),
        }
    }
}

/// Classification of a count change, from the count change percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeStatus {
    New,
    CriticalIncrease,
    SignificantIncrease,
    Increase,
    SlightIncrease,
    Stable,
    SlightDecrease,
    Decrease,
    CriticalDecrease,
    Disappeared,
}

impl ChangeStatus {
    const THRESHOLDS: [(f64, ChangeStatus); 8] = [
        (200.0, ChangeStatus::CriticalIncrease),
        (100.0, ChangeStatus::SignificantIncrease),
        (50.0, ChangeStatus::Increase),
        (15.0, ChangeStatus::SlightIncrease),
        (-15.0, ChangeStatus::Stable),
        (-50.0, ChangeStatus::SlightDecrease),
        (-80.0, ChangeStatus::Decrease),
        (-100.0, ChangeStatus::CriticalDecrease),
    ];

    pub fn from_change_percentage(change_pct: f64) -> Self {
        if change_pct == f64::INFINITY {
            return ChangeStatus::New;
        }
        Self::THRESHOLDS
            .iter()
            .find(|(threshold, _)| change_pct >= *threshold)
            .map(|(_, status)| *status)
            .unwrap_or(ChangeStatus::Disappeared)
    }

    pub fn is_increase(&self) -> bool {
        matches!(
            self,
            ChangeStatus::CriticalIncrease
                | ChangeStatus::SignificantIncrease
                | ChangeStatus::Increase
                | ChangeStatus::SlightIncrease
        )
    }

    pub fn is_decrease(&self) -> bool {
        matches!(
            self,
            ChangeStatus::SlightDecrease | ChangeStatus::Decrease | ChangeStatus::CriticalDecrease
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::New => "NEW",
            ChangeStatus::CriticalIncrease => "CRITICAL_INCREASE",
            ChangeStatus::SignificantIncrease => "SIGNIFICANT_INCREASE",
            ChangeStatus::Increase => "INCREASE",
            ChangeStatus::SlightIncrease => "SLIGHT_INCREASE",
            ChangeStatus::Stable => "STABLE",
            ChangeStatus::SlightDecrease => "SLIGHT_DECREASE",
            ChangeStatus::Decrease => "DECREASE",
            ChangeStatus::CriticalDecrease => "CRITICAL_DECREASE",
            ChangeStatus::Disappeared => "DISAPPEARED",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectMagnitude {
    Negligible,
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Chi-square summary of a count change between two periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalAnalysis {
    pub chi_square: f64,
    pub p_value: f64,
    pub is_significant: bool,
    /// 95% interval for the difference `current - baseline`
    pub confidence_interval: ConfidenceInterval,
    /// Relative change magnitude `|current - baseline| / baseline`
    pub effect_size: f64,
    pub effect_magnitude: EffectMagnitude,
}

/// One pattern path compared across periods.
///
/// Infinite change values (new patterns) serialize as `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeItem {
    pub path: String,
    pub current_count: usize,
    pub baseline_count: usize,
    pub count_change: i64,
    #[serde(with = "infinite_as_null")]
    pub count_change_percentage: f64,
    #[serde(with = "infinite_as_null")]
    pub relative_change: f64,
    pub current_percentage: f64,
    pub baseline_percentage: f64,
    /// Percentage point change
    pub percentage_change: f64,
    pub status: ChangeStatus,
    pub is_new: bool,
    pub is_disappeared: bool,
    pub is_significant: bool,
    pub depth: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistical_significance: Option<StatisticalAnalysis>,
}

/// JSON has no infinity: `+inf` is written as `null` and read back from it
mod infinite_as_null {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonStatistics {
    pub current_total: usize,
    pub baseline_total: usize,
    pub patterns_compared: usize,
    pub significant_changes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareOutput {
    /// Every compared path, significant and largest changes first
    pub changes: Vec<ChangeItem>,
    pub stable_patterns: Vec<ChangeItem>,
    pub new_patterns: Vec<ChangeItem>,
    pub disappeared_patterns: Vec<ChangeItem>,
    pub increased_patterns: Vec<ChangeItem>,
    pub decreased_patterns: Vec<ChangeItem>,
    pub statistics: ComparisonStatistics,
    pub fields_analyzed: Vec<String>,
    pub change_threshold: f64,
    pub statistical_significance: bool,
}
