//! Behaviour shared by every analyzer

use super::pattern_extractor::PatternTree;
use crate::data::data_analyzer::DataAnalyzer;
use crate::error::{DataspotError, Result};
use crate::models::{FieldStats, Query, Record};
use crate::preprocessors::Preprocessors;
use std::collections::BTreeMap;
use tracing::debug;

/// Preprocessor registry plus the steps every analysis starts with
#[derive(Debug, Clone, Default)]
pub struct Base {
    pub preprocessors: Preprocessors,
}

impl Base {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preprocessors(preprocessors: Preprocessors) -> Self {
        Self { preprocessors }
    }

    /// Field names must be non-empty
    pub fn validate_fields(&self, fields: &[String]) -> Result<()> {
        if let Some(index) = fields.iter().position(|f| f.trim().is_empty()) {
            return Err(DataspotError::validation(format!(
                "Field name at position {} is empty",
                index
            )));
        }
        Ok(())
    }

    /// Records matching `query`, in input order. No query keeps everything.
    pub fn filter_data_by_query<'r>(
        &self,
        data: &'r [Record],
        query: Option<&Query>,
    ) -> Vec<&'r Record> {
        match query {
            Some(query) if !query.is_empty() => {
                let filtered = query.filter(data);
                debug!(
                    "Query kept {} of {} records ({} constraints)",
                    filtered.len(),
                    data.len(),
                    query.len()
                );
                filtered
            }
            _ => data.iter().collect(),
        }
    }

    /// Hierarchical counts of `records` over `fields`, preprocessors applied
    pub fn build_tree(&self, records: &[&Record], fields: &[String]) -> PatternTree {
        PatternTree::build(records, fields, &self.preprocessors)
    }

    /// Per-field statistics over the raw records
    pub fn analyze_field_distributions(
        &self,
        data: &[Record],
        fields: &[String],
    ) -> BTreeMap<String, FieldStats> {
        DataAnalyzer::new().field_distributions(data, fields)
    }
}
