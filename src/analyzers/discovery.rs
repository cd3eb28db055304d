//! Automatic discovery of the most concentrated field combinations

use super::base::Base;
use super::finder::Finder;
use crate::error::Result;
use crate::models::{
    value_text, CombinationTried, DiscoverInput, DiscoverOptions, DiscoverOutput,
    DiscoveryStatistics, FieldRanking, FindOptions, Pattern, Record,
};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Records sampled for field detection
const FIELD_SAMPLE_SIZE: usize = 100;
/// Patterns kept in the result
const MAX_TOP_PATTERNS: usize = 20;
/// Minimum percentage used while scoring single fields
const SCORING_MIN_PERCENTAGE: f64 = 5.0;
/// Percentage at which a pattern adds to a field's score
const SIGNIFICANT_PERCENTAGE: f64 = 10.0;

pub struct Discovery<'a> {
    base: &'a Base,
}

impl<'a> Discovery<'a> {
    pub fn new(base: &'a Base) -> Self {
        Self { base }
    }

    pub fn execute(&self, input: &DiscoverInput<'_>, options: &DiscoverOptions) -> Result<DiscoverOutput> {
        options.filters.validate()?;

        let data = self
            .base
            .filter_data_by_query(input.data, input.query.as_ref());
        if data.is_empty() {
            return Ok(DiscoverOutput::empty());
        }

        let available_fields = Self::detect_categorical_fields(&data);
        debug!("Discovery candidate fields: {:?}", available_fields);

        let field_ranking = self.score_fields(&data, &available_fields, options)?;
        let (patterns, combinations_tried) =
            self.try_combinations(&data, &field_ranking, options)?;
        let top_patterns = Self::rank_and_deduplicate(patterns);

        let statistics = DiscoveryStatistics {
            total_records: data.len(),
            fields_analyzed: available_fields.len(),
            combinations_tried: combinations_tried.len(),
            patterns_discovered: top_patterns.len(),
            best_concentration: top_patterns.first().map(|p| p.percentage).unwrap_or(0.0),
        };

        Ok(DiscoverOutput {
            top_patterns,
            field_ranking,
            combinations_tried,
            statistics,
            fields_analyzed: available_fields,
        })
    }

    /// Fields from the sampled records that look categorical, sorted by name
    pub fn detect_categorical_fields(data: &[&Record]) -> Vec<String> {
        let sample = &data[..data.len().min(FIELD_SAMPLE_SIZE)];
        let all_fields: BTreeSet<&String> = sample.iter().flat_map(|r| r.keys()).collect();

        all_fields
            .into_iter()
            .filter(|field| Self::is_suitable_for_analysis(sample, field))
            .cloned()
            .collect()
    }

    /// Needs variation, but not so much that the field looks like an id
    pub fn is_suitable_for_analysis(sample: &[&Record], field: &str) -> bool {
        let non_null: Vec<&Value> = sample
            .iter()
            .filter_map(|r| r.get(field))
            .filter(|v| !v.is_null())
            .collect();
        if non_null.len() < 2 {
            return false;
        }

        let unique = non_null.iter().map(|v| value_text(v)).collect::<HashSet<_>>().len();
        let total = non_null.len();
        if unique <= 1 {
            return false;
        }
        if total <= 5 {
            return true;
        }

        let unique_ratio = unique as f64 / total as f64;
        unique as f64 <= total as f64 * 0.8 && unique_ratio < 0.95
    }

    fn score_fields(
        &self,
        data: &[&Record],
        fields: &[String],
        options: &DiscoverOptions,
    ) -> Result<Vec<FieldRanking>> {
        let finder = Finder::new(self.base);
        let scoring_options = FindOptions {
            min_percentage: Some(SCORING_MIN_PERCENTAGE),
            ..options.filters.clone()
        };

        let mut ranking = Vec::with_capacity(fields.len());
        for field in fields {
            let found = finder.find_in(data, std::slice::from_ref(field), &scoring_options)?;
            ranking.push(FieldRanking {
                field: field.clone(),
                score: Self::field_score(&found.patterns),
            });
        }
        ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranking)
    }

    /// Weighted mix of peak concentration, significant patterns and diversity
    pub fn field_score(patterns: &[Pattern]) -> f64 {
        if patterns.is_empty() {
            return 0.0;
        }
        let max_concentration = patterns.iter().map(|p| p.percentage).fold(0.0, f64::max);
        let significant = patterns
            .iter()
            .filter(|p| p.percentage >= SIGNIFICANT_PERCENTAGE)
            .count();

        max_concentration * 0.5 + significant as f64 * 5.0 + patterns.len() as f64 * 0.5
    }

    fn try_combinations(
        &self,
        data: &[&Record],
        ranking: &[FieldRanking],
        options: &DiscoverOptions,
    ) -> Result<(Vec<Pattern>, Vec<CombinationTried>)> {
        let finder = Finder::new(self.base);
        let top_fields: Vec<String> = ranking
            .iter()
            .take(options.max_fields + 2)
            .map(|r| r.field.clone())
            .collect();

        let mut attempts: Vec<Vec<String>> = top_fields
            .iter()
            .take(options.max_fields)
            .map(|f| vec![f.clone()])
            .collect();
        let max_size = options.max_fields.min(top_fields.len());
        for size in 2..=max_size {
            attempts.extend(
                combinations(&top_fields, size)
                    .into_iter()
                    .take(options.max_combinations),
            );
        }

        let mut patterns = Vec::new();
        let mut tried = Vec::with_capacity(attempts.len());
        for fields in attempts {
            let found = finder.find_in(data, &fields, &options.filters)?;
            tried.push(CombinationTried {
                fields,
                patterns_found: found.patterns.len(),
            });
            patterns.extend(found.patterns);
        }
        Ok((patterns, tried))
    }

    /// One pattern per path (highest percentage wins), best first, capped
    fn rank_and_deduplicate(patterns: Vec<Pattern>) -> Vec<Pattern> {
        let mut order: Vec<String> = Vec::new();
        let mut best: HashMap<String, Pattern> = HashMap::new();
        for pattern in patterns {
            match best.get(&pattern.path) {
                Some(existing) if existing.percentage >= pattern.percentage => {}
                Some(_) => {
                    best.insert(pattern.path.clone(), pattern);
                }
                None => {
                    order.push(pattern.path.clone());
                    best.insert(pattern.path.clone(), pattern);
                }
            }
        }

        let mut ranked: Vec<Pattern> = order
            .into_iter()
            .filter_map(|path| best.remove(&path))
            .collect();
        ranked.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        ranked.truncate(MAX_TOP_PATTERNS);
        ranked
    }
}

/// Size-`k` combinations of `items` in lexicographic index order
fn combinations(items: &[String], k: usize) -> Vec<Vec<String>> {
    let n = items.len();
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i].clone()).collect());

        // Rightmost index that can still move
        let Some(pos) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
            return result;
        };
        indices[pos] += 1;
        for j in pos + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}
