use super::finder::{FindInput, FindOptions};
use serde::{Deserialize, Serialize};

/// `tree` takes the same input as `find`
pub type TreeInput<'a> = FindInput<'a>;

/// Options for `tree`. `min_value`/`max_value` bound node record counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Children kept per level
    pub top: usize,
    pub min_value: Option<usize>,
    pub max_value: Option<usize>,
    pub min_percentage: Option<f64>,
    pub max_percentage: Option<f64>,
    pub min_depth: Option<usize>,
    pub max_depth: Option<usize>,
    pub contains: Option<String>,
    pub exclude: Vec<String>,
    pub regex: Option<String>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            top: 5,
            min_value: None,
            max_value: None,
            min_percentage: None,
            max_percentage: None,
            min_depth: None,
            max_depth: None,
            contains: None,
            exclude: Vec::new(),
            regex: None,
        }
    }
}

impl TreeOptions {
    /// Equivalent pattern filters; ordering is left to the tree builder
    pub fn to_find_options(&self) -> FindOptions {
        FindOptions {
            min_percentage: self.min_percentage,
            max_percentage: self.max_percentage,
            min_count: self.min_value,
            max_count: self.max_value,
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            contains: self.contains.clone(),
            exclude: self.exclude.clone(),
            regex: self.regex.clone(),
            ..FindOptions::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Segment label such as `country=US`
    pub name: String,
    /// Records under this node
    pub value: usize,
    pub percentage: f64,
    /// Depth of the node; the root is 0
    pub node: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Length of the longest downward chain below this node
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeStatistics {
    pub total_records: usize,
    pub filtered_records: usize,
    pub patterns_found: usize,
    pub fields_analyzed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeOutput {
    pub name: String,
    pub children: Vec<TreeNode>,
    pub value: usize,
    pub percentage: f64,
    pub node: usize,
    pub top: usize,
    pub statistics: TreeStatistics,
    pub fields_analyzed: Vec<String>,
}
