use super::pattern::{Pattern, SortField};
use super::query::Query;
use super::record::Record;
use crate::error::{DataspotError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Records, hierarchy fields and optional pre-filter for `find`
#[derive(Debug, Clone)]
pub struct FindInput<'a> {
    pub data: &'a [Record],
    pub fields: Vec<String>,
    pub query: Option<Query>,
}

impl<'a> FindInput<'a> {
    pub fn new<S: AsRef<str>>(data: &'a [Record], fields: &[S]) -> Self {
        Self {
            data,
            fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
            query: None,
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }
}

/// Pattern filtering, ordering and limiting options.
///
/// Bounds are inclusive. `min_percentage > max_percentage` is allowed and
/// simply yields no patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindOptions {
    pub min_percentage: Option<f64>,
    pub max_percentage: Option<f64>,
    pub min_count: Option<usize>,
    pub max_count: Option<usize>,
    pub min_depth: Option<usize>,
    pub max_depth: Option<usize>,
    /// Keep patterns whose path contains this text
    pub contains: Option<String>,
    /// Drop patterns whose path contains any of these terms
    pub exclude: Vec<String>,
    /// Keep patterns whose path matches this regex
    pub regex: Option<String>,
    pub limit: Option<usize>,
    pub sort_by: SortField,
    /// Sort descending
    pub reverse: bool,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            min_percentage: None,
            max_percentage: None,
            min_count: None,
            max_count: None,
            min_depth: None,
            max_depth: None,
            contains: None,
            exclude: Vec::new(),
            regex: None,
            limit: None,
            sort_by: SortField::Percentage,
            reverse: true,
        }
    }
}

impl FindOptions {
    /// Compile the regex filter, if one is set
    pub fn compiled_regex(&self) -> Result<Option<Regex>> {
        self.regex
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| DataspotError::Regex {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Check option values that would otherwise fail mid-analysis
    pub fn validate(&self) -> Result<()> {
        self.compiled_regex()?;
        if self.limit == Some(0) {
            return Err(DataspotError::query("limit must be greater than 0"));
        }
        Ok(())
    }
}

/// Patterns found by `find`, sorted per the options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindOutput {
    pub patterns: Vec<Pattern>,
    /// Records analysed after query filtering
    pub total_records: usize,
    pub total_patterns: usize,
}

impl FindOutput {
    pub(crate) fn empty(total_records: usize) -> Self {
        Self {
            patterns: Vec::new(),
            total_records,
            total_patterns: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn find_path(&self, path: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.path == path)
    }
}
