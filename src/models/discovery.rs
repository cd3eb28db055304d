use super::finder::FindOptions;
use super::pattern::Pattern;
use super::query::Query;
use super::record::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct DiscoverInput<'a> {
    pub data: &'a [Record],
    pub query: Option<Query>,
}

impl<'a> DiscoverInput<'a> {
    pub fn new(data: &'a [Record]) -> Self {
        Self { data, query: None }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverOptions {
    /// Largest field combination tried
    pub max_fields: usize,
    /// Combinations tried per combination size
    pub max_combinations: usize,
    #[serde(flatten)]
    pub filters: FindOptions,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            max_fields: 3,
            max_combinations: 10,
            filters: FindOptions {
                min_percentage: Some(10.0),
                ..FindOptions::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRanking {
    pub field: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationTried {
    pub fields: Vec<String>,
    pub patterns_found: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryStatistics {
    pub total_records: usize,
    pub fields_analyzed: usize,
    pub combinations_tried: usize,
    pub patterns_discovered: usize,
    pub best_concentration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverOutput {
    /// Best patterns across all combinations (at most 20)
    pub top_patterns: Vec<Pattern>,
    /// Fields ranked by concentration potential, best first
    pub field_ranking: Vec<FieldRanking>,
    pub combinations_tried: Vec<CombinationTried>,
    pub statistics: DiscoveryStatistics,
    /// Fields judged suitable for analysis
    pub fields_analyzed: Vec<String>,
}

impl DiscoverOutput {
    pub(crate) fn empty() -> Self {
        Self {
            top_patterns: Vec::new(),
            field_ranking: Vec::new(),
            combinations_tried: Vec::new(),
            statistics: DiscoveryStatistics {
                total_records: 0,
                fields_analyzed: 0,
                combinations_tried: 0,
                patterns_discovered: 0,
                best_concentration: 0.0,
            },
            fields_analyzed: Vec::new(),
        }
    }
}
