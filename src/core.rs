//! The `Dataspot` facade

use crate::analyzers::{Analyzer, Base, Compare, Discovery, Finder, TreeAnalyzer};
use crate::error::Result;
use crate::models::{
    AnalyzeInput, AnalyzeOptions, AnalyzeOutput, CompareInput, CompareOptions, CompareOutput,
    DiscoverInput, DiscoverOptions, DiscoverOutput, FindInput, FindOptions, FindOutput, TreeInput,
    TreeOptions, TreeOutput,
};
use crate::preprocessors::Preprocessors;
use crate::query::QueryBuilder;
use serde_json::Value;
use tracing::debug;

/// Finds where records concentrate.
///
/// Preprocessors registered here apply to every operation.
#[derive(Debug, Clone, Default)]
pub struct Dataspot {
    base: Base,
}

impl Dataspot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preprocessors(preprocessors: Preprocessors) -> Self {
        Self {
            base: Base::with_preprocessors(preprocessors),
        }
    }

    /// Rewrite `field` values before they are counted. Replaces an earlier registration.
    pub fn add_preprocessor<F>(&mut self, field: impl Into<String>, preprocessor: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.base.preprocessors.insert(field, preprocessor);
    }

    pub fn preprocessors(&self) -> &Preprocessors {
        &self.base.preprocessors
    }

    pub fn find(&self, input: &FindInput<'_>, options: &FindOptions) -> Result<FindOutput> {
        debug!("find over {} records, fields {:?}", input.data.len(), input.fields);
        Finder::new(&self.base).execute(input, options)
    }

    pub fn analyze(&self, input: &AnalyzeInput<'_>, options: &AnalyzeOptions) -> Result<AnalyzeOutput> {
        debug!("analyze over {} records, fields {:?}", input.data.len(), input.fields);
        Analyzer::new(&self.base).execute(input, options)
    }

    pub fn tree(&self, input: &TreeInput<'_>, options: &TreeOptions) -> Result<TreeOutput> {
        debug!("tree over {} records, fields {:?}", input.data.len(), input.fields);
        TreeAnalyzer::new(&self.base).execute(input, options)
    }

    pub fn discover(&self, input: &DiscoverInput<'_>, options: &DiscoverOptions) -> Result<DiscoverOutput> {
        debug!("discover over {} records", input.data.len());
        Discovery::new(&self.base).execute(input, options)
    }

    pub fn compare(&self, input: &CompareInput<'_>, options: &CompareOptions) -> Result<CompareOutput> {
        debug!(
            "compare {} current against {} baseline records, fields {:?}",
            input.current_data.len(),
            input.baseline_data.len(),
            input.fields
        );
        Compare::new(&self.base).execute(input, options)
    }

    /// Start a fluent query bound to this instance
    pub fn query(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(self)
    }
}
