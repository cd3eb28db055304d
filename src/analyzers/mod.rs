//! Analysis engines behind the `Dataspot` facade
//!
//! Every analyzer borrows a shared [`Base`] so preprocessors registered on
//! the facade apply to all operations.

pub mod analyzer;
pub mod base;
pub mod compare;
pub mod discovery;
pub mod filters;
pub mod finder;
pub mod pattern_extractor;
pub mod stats;
pub mod tree_analyzer;

pub use analyzer::Analyzer;
pub use base::Base;
pub use compare::Compare;
pub use discovery::Discovery;
pub use filters::PatternFilter;
pub use finder::Finder;
pub use pattern_extractor::{PatternExtractor, PatternTree, TreeBuilder};
pub use stats::Stats;
pub use tree_analyzer::TreeAnalyzer;
