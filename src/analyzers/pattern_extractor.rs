//! Hierarchical counting, pattern extraction and output tree building

use crate::models::pattern::percentage_of;
use crate::models::{value_text, Pattern, Record, TreeNode, PATH_SEPARATOR};
use crate::preprocessors::Preprocessors;
use serde_json::Value;
use std::collections::HashMap;

/// Records kept per node as examples
pub const MAX_SAMPLES: usize = 3;

/// One `field=value` node of the count tree
#[derive(Debug, Clone, Default)]
pub struct CountNode {
    pub count: usize,
    pub samples: Vec<Record>,
    children: Vec<(String, CountNode)>,
    index: HashMap<String, usize>,
}

impl CountNode {
    /// Children in first-seen order
    pub fn children(&self) -> impl Iterator<Item = (&str, &CountNode)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn child(&self, segment: &str) -> Option<&CountNode> {
        self.index.get(segment).map(|&i| &self.children[i].1)
    }

    fn child_mut(&mut self, segment: &str) -> &mut CountNode {
        let position = match self.index.get(segment) {
            Some(&position) => position,
            None => {
                self.children.push((segment.to_string(), CountNode::default()));
                self.index.insert(segment.to_string(), self.children.len() - 1);
                self.children.len() - 1
            }
        };
        &mut self.children[position].1
    }

    fn record(&mut self, record: &Record) {
        self.count += 1;
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(record.clone());
        }
    }
}

/// Count tree over an ordered list of fields.
///
/// Each record is counted along every combination of its field values;
/// array values branch once per distinct element.
#[derive(Debug, Clone, Default)]
pub struct PatternTree {
    pub root: CountNode,
}

impl PatternTree {
    pub fn build(records: &[&Record], fields: &[String], preprocessors: &Preprocessors) -> Self {
        let mut root = CountNode::default();
        for record in records {
            let segments: Vec<Vec<String>> = fields
                .iter()
                .map(|field| field_segments(record, field, preprocessors))
                .collect();
            insert(&mut root, record, &segments);
        }
        Self { root }
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }
}

fn field_segments(record: &Record, field: &str, preprocessors: &Preprocessors) -> Vec<String> {
    let raw = record.get(field).unwrap_or(&Value::Null);
    let value = preprocessors.apply(field, raw);

    match value.as_ref() {
        Value::Array(items) => {
            let mut segments: Vec<String> = Vec::with_capacity(items.len());
            for item in items {
                let segment = format!("{}={}", field, value_text(item));
                if !segments.contains(&segment) {
                    segments.push(segment);
                }
            }
            segments
        }
        other => vec![format!("{}={}", field, value_text(other))],
    }
}

fn insert(node: &mut CountNode, record: &Record, segments: &[Vec<String>]) {
    let Some((level, rest)) = segments.split_first() else {
        return;
    };
    for segment in level {
        let child = node.child_mut(segment);
        child.record(record);
        insert(child, record, rest);
    }
}

/// Turns a count tree into a flat pattern list
pub struct PatternExtractor;

impl PatternExtractor {
    /// Depth-first, parents before children, siblings in first-seen order
    pub fn from_tree(tree: &PatternTree, total: usize) -> Vec<Pattern> {
        let mut patterns = Vec::new();
        Self::collect(&tree.root, "", 1, total, &mut patterns);
        patterns
    }

    fn collect(node: &CountNode, prefix: &str, depth: usize, total: usize, out: &mut Vec<Pattern>) {
        for (segment, child) in node.children() {
            let path = if prefix.is_empty() {
                segment.to_string()
            } else {
                format!("{}{}{}", prefix, PATH_SEPARATOR, segment)
            };
            out.push(Pattern {
                path: path.clone(),
                count: child.count,
                percentage: percentage_of(child.count, total),
                depth,
                samples: child.samples.clone(),
            });
            Self::collect(child, &path, depth + 1, total, out);
        }
    }
}

/// Builds the nested output tree from an already-filtered pattern list.
///
/// Walks the count tree so parents come from real segments, never from
/// re-splitting rendered paths.
pub struct TreeBuilder<'p> {
    tree: &'p PatternTree,
    surviving: HashMap<(usize, String), &'p Pattern>,
    total: usize,
    top: usize,
}

impl<'p> TreeBuilder<'p> {
    /// `patterns` must come from `tree`; a node is kept when its (depth, path) survived
    pub fn new(tree: &'p PatternTree, patterns: &'p [Pattern], total: usize, top: usize) -> Self {
        let surviving = patterns
            .iter()
            .map(|p| ((p.depth, p.path.clone()), p))
            .collect();
        Self {
            tree,
            surviving,
            total,
            top,
        }
    }

    /// Root node named `root` holding the whole tree
    pub fn build(&self) -> TreeNode {
        TreeNode {
            name: "root".to_string(),
            value: self.total,
            percentage: if self.total > 0 { 100.0 } else { 0.0 },
            node: 0,
            children: self.ranked(self.attached(&self.tree.root, "", 1, &[])),
        }
    }

    /// Kept descendants of `node` that hang off the nearest kept ancestor.
    /// `pending` holds segments of dropped nodes between that ancestor and `node`.
    fn attached(&self, node: &CountNode, prefix: &str, depth: usize, pending: &[&str]) -> Vec<TreeNode> {
        let mut out = Vec::new();
        for (segment, child) in node.children() {
            let path = if prefix.is_empty() {
                segment.to_string()
            } else {
                format!("{}{}{}", prefix, PATH_SEPARATOR, segment)
            };
            let mut name_parts = pending.to_vec();
            name_parts.push(segment);

            let key = (depth, path);
            let path = &key.1;
            match self.surviving.get(&key) {
                Some(pattern) => out.push(TreeNode {
                    name: name_parts.join(PATH_SEPARATOR),
                    value: pattern.count,
                    percentage: pattern.percentage,
                    node: depth,
                    children: self.ranked(self.attached(child, path, depth + 1, &[])),
                }),
                None => out.extend(self.attached(child, path, depth + 1, &name_parts)),
            }
        }
        out
    }

    fn ranked(&self, mut level: Vec<TreeNode>) -> Vec<TreeNode> {
        level.sort_by(|a, b| b.value.cmp(&a.value));
        level.truncate(self.top);
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::records_from_json;
    use serde_json::json;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn records() -> Vec<Record> {
        records_from_json(json!([
            {"country": "US", "device": "mobile"},
            {"country": "US", "device": "desktop"},
            {"country": "US", "device": "mobile"},
            {"country": "EU", "device": "mobile"},
        ]))
        .unwrap()
    }

    #[test]
    fn test_counts_and_extraction_order() {
        let data = records();
        let refs: Vec<&Record> = data.iter().collect();
        let tree = PatternTree::build(&refs, &fields(&["country", "device"]), &Preprocessors::new());
        let patterns = PatternExtractor::from_tree(&tree, refs.len());

        let paths: Vec<&str> = patterns.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "country=US",
                "country=US > device=mobile",
                "country=US > device=desktop",
                "country=EU",
                "country=EU > device=mobile",
            ]
        );
        assert_eq!(patterns[0].count, 3);
        assert_eq!(patterns[0].percentage, 75.0);
        assert_eq!(patterns[1].depth, 2);
        assert_eq!(patterns[0].samples.len(), MAX_SAMPLES);
    }

    #[test]
    fn test_array_values_branch_once_per_distinct_element() {
        let data = records_from_json(json!([
            {"tags": ["a", "b", "a"]},
            {"tags": []},
            {"tags": "a"},
        ]))
        .unwrap();
        let refs: Vec<&Record> = data.iter().collect();
        let tree = PatternTree::build(&refs, &fields(&["tags"]), &Preprocessors::new());

        assert_eq!(tree.root.child("tags=a").map(|n| n.count), Some(2));
        assert_eq!(tree.root.child("tags=b").map(|n| n.count), Some(1));
        assert_eq!(tree.root.children().count(), 2);
    }

    #[test]
    fn test_missing_field_renders_null() {
        let data = records_from_json(json!([{"a": 1}, {"b": 2}])).unwrap();
        let refs: Vec<&Record> = data.iter().collect();
        let tree = PatternTree::build(&refs, &fields(&["a"]), &Preprocessors::new());
        assert!(tree.root.child("a=null").is_some());
        assert!(tree.root.child("a=1").is_some());
    }

    #[test]
    fn test_tree_builder_reattaches_orphans_to_root() {
        let data = records();
        let refs: Vec<&Record> = data.iter().collect();
        let tree = PatternTree::build(&refs, &fields(&["country", "device"]), &Preprocessors::new());
        let patterns: Vec<Pattern> = PatternExtractor::from_tree(&tree, 4)
            .into_iter()
            .filter(|p| p.path != "country=EU")
            .collect();

        let root = TreeBuilder::new(&tree, &patterns, 4, 5).build();
        assert_eq!(root.name, "root");
        assert_eq!(root.value, 4);
        assert_eq!(root.percentage, 100.0);

        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["country=US", "country=EU > device=mobile"]);

        let us = &root.children[0];
        assert_eq!(us.node, 1);
        assert_eq!(us.children[0].name, "device=mobile");
        assert_eq!(us.children[0].value, 2);
        assert_eq!(us.children[0].node, 2);
        assert_eq!(root.children[1].node, 2);
    }

    #[test]
    fn test_tree_builder_top_limits_each_level() {
        let data = records();
        let refs: Vec<&Record> = data.iter().collect();
        let tree = PatternTree::build(&refs, &fields(&["country", "device"]), &Preprocessors::new());
        let patterns = PatternExtractor::from_tree(&tree, 4);

        let root = TreeBuilder::new(&tree, &patterns, 4, 1).build();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].name, "country=US");
        assert_eq!(root.children[0].children.len(), 1);
        assert_eq!(root.children[0].children[0].name, "device=mobile");
    }

    #[test]
    fn test_tree_builder_keeps_separator_inside_values() {
        let data = records_from_json(json!([
            {"c": "A"},
            {"c": "A > B"},
            {"c": "A > B"},
            {"c": "A > B"},
        ]))
        .unwrap();
        let refs: Vec<&Record> = data.iter().collect();
        let tree = PatternTree::build(&refs, &fields(&["c"]), &Preprocessors::new());
        let patterns = PatternExtractor::from_tree(&tree, 4);

        let root = TreeBuilder::new(&tree, &patterns, 4, 5).build();
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["c=A > B", "c=A"]);
        assert!(root.children.iter().all(|c| c.node == 1 && c.children.is_empty()));
        assert_eq!(root.children[0].value, 3);
    }
}
