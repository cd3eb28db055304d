//! Find where data concentrates.
//!
//! dataspot counts records along an ordered list of fields and reports
//! every `field=value > field=value` slice as a [`Pattern`] with its share of
//! the data. On top of that it ranks, filters, compares and auto-discovers
//! patterns.

pub mod analyzers;
pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod preprocessors;
pub mod query;
pub mod table_display;
pub mod utils;

pub use crate::core::Dataspot;
pub use crate::error::{DataspotError, Result};
pub use crate::models::*;
pub use crate::preprocessors::Preprocessors;
pub use crate::query::{
    create_business_query, create_data_quality_query, create_fraud_query, QueryBuilder,
};

/// `find` with a fresh `Dataspot`
pub fn find<S: AsRef<str>>(
    data: &[Record],
    fields: &[S],
    query: Option<Query>,
    options: &FindOptions,
) -> Result<FindOutput> {
    let mut input = FindInput::new(data, fields);
    input.query = query;
    Dataspot::new().find(&input, options)
}

/// `analyze` with a fresh `Dataspot`
pub fn analyze<S: AsRef<str>>(
    data: &[Record],
    fields: &[S],
    query: Option<Query>,
    options: &AnalyzeOptions,
) -> Result<AnalyzeOutput> {
    let mut input = AnalyzeInput::new(data, fields);
    input.query = query;
    Dataspot::new().analyze(&input, options)
}

/// `tree` with a fresh `Dataspot`
pub fn tree<S: AsRef<str>>(
    data: &[Record],
    fields: &[S],
    query: Option<Query>,
    options: &TreeOptions,
) -> Result<TreeOutput> {
    let mut input = TreeInput::new(data, fields);
    input.query = query;
    Dataspot::new().tree(&input, options)
}

/// `discover` with a fresh `Dataspot`
pub fn discover(
    data: &[Record],
    query: Option<Query>,
    options: &DiscoverOptions,
) -> Result<DiscoverOutput> {
    let input = DiscoverInput { data, query };
    Dataspot::new().discover(&input, options)
}

/// `compare` with a fresh `Dataspot`
pub fn compare<S: AsRef<str>>(
    current_data: &[Record],
    baseline_data: &[Record],
    fields: &[S],
    query: Option<Query>,
    options: &CompareOptions,
) -> Result<CompareOutput> {
    let mut input = CompareInput::new(current_data, baseline_data, fields);
    input.query = query;
    Dataspot::new().compare(&input, options)
}
