use super::base::Base;
use super::filters::PatternFilter;
use super::pattern_extractor::PatternExtractor;
use crate::error::Result;
use crate::models::{FindInput, FindOptions, FindOutput, Record};
use tracing::debug;

/// Finds concentration patterns over an ordered field hierarchy
pub struct Finder<'a> {
    base: &'a Base,
}

impl<'a> Finder<'a> {
    pub fn new(base: &'a Base) -> Self {
        Self { base }
    }

    pub fn execute(&self, input: &FindInput<'_>, options: &FindOptions) -> Result<FindOutput> {
        self.base.validate_fields(&input.fields)?;
        options.validate()?;

        if input.fields.is_empty() {
            return Ok(FindOutput::empty(input.data.len()));
        }

        let filtered = self
            .base
            .filter_data_by_query(input.data, input.query.as_ref());
        if filtered.is_empty() {
            return Ok(FindOutput::empty(input.data.len()));
        }

        self.find_in(&filtered, &input.fields, options)
    }

    /// Find over records that are already query-filtered
    pub(crate) fn find_in(
        &self,
        records: &[&Record],
        fields: &[String],
        options: &FindOptions,
    ) -> Result<FindOutput> {
        let tree = self.base.build_tree(records, fields);
        let patterns = PatternExtractor::from_tree(&tree, records.len());
        debug!(
            "Extracted {} patterns from {} records over {:?}",
            patterns.len(),
            records.len(),
            fields
        );

        let patterns = PatternFilter::apply(patterns, options)?;
        Ok(FindOutput {
            total_records: records.len(),
            total_patterns: patterns.len(),
            patterns,
        })
    }
}
