use super::base::Base;
use super::filters::PatternFilter;
use super::pattern_extractor::{PatternExtractor, TreeBuilder};
use crate::error::Result;
use crate::models::{TreeInput, TreeOptions, TreeOutput, TreeStatistics};
use tracing::debug;

/// Builds the nested `root` tree used for hierarchical views
pub struct TreeAnalyzer<'a> {
    base: &'a Base,
}

impl<'a> TreeAnalyzer<'a> {
    pub fn new(base: &'a Base) -> Self {
        Self { base }
    }

    pub fn execute(&self, input: &TreeInput<'_>, options: &TreeOptions) -> Result<TreeOutput> {
        self.base.validate_fields(&input.fields)?;
        let find_options = options.to_find_options();
        find_options.validate()?;

        let filtered = self
            .base
            .filter_data_by_query(input.data, input.query.as_ref());

        let mut statistics = TreeStatistics {
            total_records: input.data.len(),
            filtered_records: filtered.len(),
            patterns_found: 0,
            fields_analyzed: input.fields.len(),
        };

        if filtered.is_empty() || input.fields.is_empty() {
            return Ok(TreeOutput {
                name: "root".to_string(),
                children: Vec::new(),
                value: filtered.len(),
                percentage: if filtered.is_empty() { 0.0 } else { 100.0 },
                node: 0,
                top: options.top,
                statistics,
                fields_analyzed: input.fields.clone(),
            });
        }

        let tree = self.base.build_tree(&filtered, &input.fields);
        let patterns = PatternExtractor::from_tree(&tree, filtered.len());
        let patterns = PatternFilter::apply(patterns, &find_options)?;
        statistics.patterns_found = patterns.len();

        let root = TreeBuilder::new(&tree, &patterns, filtered.len(), options.top).build();
        debug!(
            "Built tree with {} nodes from {} patterns",
            root.node_count(),
            patterns.len()
        );

        Ok(TreeOutput {
            name: root.name,
            children: root.children,
            value: root.value,
            percentage: root.percentage,
            node: root.node,
            top: options.top,
            statistics,
            fields_analyzed: input.fields.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{records_from_json, Query};
    use serde_json::json;

    #[test]
    fn test_empty_after_query() {
        let data = records_from_json(json!([{"a": 1}, {"a": 2}])).unwrap();
        let base = Base::new();
        let input = TreeInput::new(&data, &["a"]).with_query(Query::new().field("a", json!(3)));
        let output = TreeAnalyzer::new(&base)
            .execute(&input, &TreeOptions::default())
            .unwrap();

        assert_eq!(output.name, "root");
        assert_eq!(output.value, 0);
        assert_eq!(output.percentage, 0.0);
        assert!(output.children.is_empty());
        assert_eq!(output.statistics.total_records, 2);
        assert_eq!(output.statistics.filtered_records, 0);
    }

    #[test]
    fn test_min_value_prunes_nodes() {
        let data = records_from_json(json!([
            {"a": "x", "b": 1},
            {"a": "x", "b": 2},
            {"a": "y", "b": 1},
        ]))
        .unwrap();
        let base = Base::new();
        let options = TreeOptions {
            min_value: Some(2),
            ..Default::default()
        };
        let output = TreeAnalyzer::new(&base)
            .execute(&TreeInput::new(&data, &["a", "b"]), &options)
            .unwrap();

        assert_eq!(output.value, 3);
        assert_eq!(output.children.len(), 1);
        assert_eq!(output.children[0].name, "a=x");
        assert!(output.children[0].children.is_empty());
        assert_eq!(output.statistics.patterns_found, 1);
    }
}
