//! Input, option and output types for every dataspot operation
//!
//! Inputs borrow the caller's records; outputs own their data so they can
//! be serialized or kept after the input is dropped.

pub mod analyzer;
pub mod compare;
pub mod discovery;
pub mod finder;
pub mod pattern;
pub mod query;
pub mod record;
pub mod tree;

pub use analyzer::{
    AnalyzeInput, AnalyzeOptions, AnalyzeOutput, ConcentrationDistribution, FieldStats, Insights,
    Statistics, ValueCount,
};
pub use compare::{
    ChangeItem, ChangeStatus, CompareInput, CompareOptions, CompareOutput, ComparisonStatistics,
    ConfidenceInterval, EffectMagnitude, StatisticalAnalysis,
};
pub use discovery::{
    CombinationTried, DiscoverInput, DiscoverOptions, DiscoverOutput, DiscoveryStatistics,
    FieldRanking,
};
pub use finder::{FindInput, FindOptions, FindOutput};
pub use pattern::{Pattern, SortField, PATH_SEPARATOR};
pub use query::{Query, QueryValue};
pub use record::{records_from_json, value_text, Record};
pub use tree::{TreeInput, TreeNode, TreeOptions, TreeOutput, TreeStatistics};
