//! Fluent query construction on top of a `Dataspot`
//!
//! ```ignore
//! let output = QueryBuilder::new(&dataspot)
//!     .field("country", "US")
//!     .min_percentage(20.0)?
//!     .sort_by("count", true)?
//!     .limit(10)?
//!     .execute(&records, &["country", "device"])?;
//! ```

use crate::core::Dataspot;
use crate::error::{DataspotError, Result};
use crate::models::{
    AnalyzeInput, AnalyzeOutput, FindInput, FindOptions, FindOutput, Query, QueryValue, Record,
    SortField, TreeInput, TreeOptions, TreeOutput,
};
use regex::Regex;
use serde_json::{Map, Value};

/// Accumulates record filters, pattern filters, ordering and a limit
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    dataspot: &'a Dataspot,
    data_filters: Query,
    pattern_filters: FindOptions,
    sorting: Option<(SortField, bool)>,
    limit: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(dataspot: &'a Dataspot) -> Self {
        Self {
            dataspot,
            data_filters: Query::new(),
            pattern_filters: FindOptions::default(),
            sorting: None,
            limit: None,
        }
    }

    pub fn dataspot(&self) -> &'a Dataspot {
        self.dataspot
    }

    pub fn data_filters(&self) -> &Query {
        &self.data_filters
    }

    /// Current options as passed to `find`
    pub fn options(&self) -> FindOptions {
        let (sort_by, reverse) = self
            .sorting
            .unwrap_or((SortField::Percentage, true));
        FindOptions {
            sort_by,
            reverse,
            limit: self.limit,
            ..self.pattern_filters.clone()
        }
    }

    /// Keep records whose `field` equals `value`
    pub fn field(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.data_filters.insert(field, value);
        self
    }

    /// Keep records whose `field` is any of `values`
    pub fn field_in<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.data_filters.insert(
            field,
            QueryValue::Any(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    pub fn min_percentage(mut self, value: f64) -> Result<Self> {
        self.pattern_filters.min_percentage = Some(check_percentage("min_percentage", value)?);
        Ok(self)
    }

    pub fn max_percentage(mut self, value: f64) -> Result<Self> {
        self.pattern_filters.max_percentage = Some(check_percentage("max_percentage", value)?);
        Ok(self)
    }

    pub fn min_count(mut self, value: usize) -> Self {
        self.pattern_filters.min_count = Some(value);
        self
    }

    pub fn max_count(mut self, value: usize) -> Self {
        self.pattern_filters.max_count = Some(value);
        self
    }

    pub fn min_depth(mut self, value: usize) -> Result<Self> {
        self.pattern_filters.min_depth = Some(check_depth("min_depth", value)?);
        Ok(self)
    }

    pub fn max_depth(mut self, value: usize) -> Result<Self> {
        self.pattern_filters.max_depth = Some(check_depth("max_depth", value)?);
        Ok(self)
    }

    pub fn contains(mut self, text: impl Into<String>) -> Self {
        self.pattern_filters.contains = Some(text.into());
        self
    }

    /// Drop patterns containing any of `terms`; replaces earlier terms
    pub fn exclude<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pattern_filters.exclude = terms.into_iter().map(Into::into).collect();
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if let Err(source) = Regex::new(&pattern) {
            return Err(DataspotError::Regex { pattern, source });
        }
        self.pattern_filters.regex = Some(pattern);
        Ok(self)
    }

    /// Sort by `percentage`, `count` or `depth`; `reverse` sorts descending
    pub fn sort_by(mut self, field: &str, reverse: bool) -> Result<Self> {
        self.sorting = Some((field.parse()?, reverse));
        Ok(self)
    }

    pub fn limit(mut self, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(DataspotError::query("limit must be greater than 0"));
        }
        self.limit = Some(count);
        Ok(self)
    }

    /// Alias for [`limit`](Self::limit)
    pub fn top(self, count: usize) -> Result<Self> {
        self.limit(count)
    }

    pub fn percentage_range(self, min: f64, max: f64) -> Result<Self> {
        self.min_percentage(min)?.max_percentage(max)
    }

    pub fn count_range(self, min: usize, max: usize) -> Self {
        self.min_count(min).max_count(max)
    }

    pub fn depth_range(self, min: usize, max: usize) -> Result<Self> {
        self.min_depth(min)?.max_depth(max)
    }

    /// Flat JSON view of everything set so far
    pub fn build_query(&self) -> Map<String, Value> {
        let mut query = Map::new();
        for (field, value) in self.data_filters.iter() {
            let value = match value {
                QueryValue::One(v) => v.clone(),
                QueryValue::Any(values) => Value::Array(values.clone()),
            };
            query.insert(field.clone(), value);
        }

        let filters = &self.pattern_filters;
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                query.insert(key.to_string(), value);
            }
        };
        put("min_percentage", filters.min_percentage.map(Value::from));
        put("max_percentage", filters.max_percentage.map(Value::from));
        put("min_count", filters.min_count.map(Value::from));
        put("max_count", filters.max_count.map(Value::from));
        put("min_depth", filters.min_depth.map(Value::from));
        put("max_depth", filters.max_depth.map(Value::from));
        put("contains", filters.contains.clone().map(Value::from));
        put(
            "exclude",
            (!filters.exclude.is_empty()).then(|| Value::from(filters.exclude.clone())),
        );
        put("regex", filters.regex.clone().map(Value::from));
        if let Some((sort_by, reverse)) = self.sorting {
            put("sort_by", Some(Value::from(sort_by.as_str())));
            put("reverse", Some(Value::from(reverse)));
        }
        put("limit", self.limit.map(Value::from));
        query
    }

    /// Clear every filter, ordering and limit
    pub fn reset(self) -> Self {
        Self::new(self.dataspot)
    }

    fn query(&self) -> Option<Query> {
        (!self.data_filters.is_empty()).then(|| self.data_filters.clone())
    }

    /// Run `find` with the accumulated settings
    pub fn execute<S: AsRef<str>>(&self, data: &[Record], fields: &[S]) -> Result<FindOutput> {
        let mut input = FindInput::new(data, fields);
        input.query = self.query();
        self.dataspot.find(&input, &self.options())
    }

    /// Run `analyze` with the accumulated settings
    pub fn analyze<S: AsRef<str>>(&self, data: &[Record], fields: &[S]) -> Result<AnalyzeOutput> {
        let mut input = AnalyzeInput::new(data, fields);
        input.query = self.query();
        self.dataspot.analyze(&input, &self.options())
    }

    /// Build a tree keeping `top` children per level. Sorting and limit do not apply.
    pub fn tree<S: AsRef<str>>(&self, data: &[Record], fields: &[S], top: usize) -> Result<TreeOutput> {
        let mut input = TreeInput::new(data, fields);
        input.query = self.query();
        let filters = &self.pattern_filters;
        let options = TreeOptions {
            top,
            min_value: filters.min_count,
            max_value: filters.max_count,
            min_percentage: filters.min_percentage,
            max_percentage: filters.max_percentage,
            min_depth: filters.min_depth,
            max_depth: filters.max_depth,
            contains: filters.contains.clone(),
            exclude: filters.exclude.clone(),
            regex: filters.regex.clone(),
        };
        self.dataspot.tree(&input, &options)
    }
}

fn check_percentage(name: &str, value: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&value) {
        return Err(DataspotError::query(format!(
            "{} must be between 0 and 100, got {}",
            name, value
        )));
    }
    Ok(value)
}

fn check_depth(name: &str, value: usize) -> Result<usize> {
    if value < 1 {
        return Err(DataspotError::query(format!("{} must be at least 1", name)));
    }
    Ok(value)
}

/// Broad fraud screening: small concentrations, up to four levels deep
pub fn create_fraud_query(dataspot: &Dataspot) -> Result<QueryBuilder<'_>> {
    QueryBuilder::new(dataspot)
        .min_percentage(5.0)?
        .max_depth(4)?
        .sort_by("percentage", true)
}

/// Headline business segments
pub fn create_business_query(dataspot: &Dataspot) -> Result<QueryBuilder<'_>> {
    QueryBuilder::new(dataspot)
        .min_percentage(10.0)?
        .max_depth(3)?
        .limit(20)
}

/// Values dominating a field, a common sign of defaults or bad data
pub fn create_data_quality_query(dataspot: &Dataspot) -> Result<QueryBuilder<'_>> {
    QueryBuilder::new(dataspot).min_percentage(50.0)?.limit(10)
}
