//! Pattern comparison between a current and a baseline dataset

use super::base::Base;
use super::finder::Finder;
use super::stats::Stats;
use crate::error::Result;
use crate::models::{
    ChangeItem, ChangeStatus, CompareInput, CompareOptions, CompareOutput, ComparisonStatistics,
    FindOptions, Pattern, Record,
};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Sort weight for changes from a zero baseline
const NEW_PATTERN_WEIGHT: f64 = 1000.0;
/// A new pattern is significant above this count
const NEW_PATTERN_MIN_COUNT: usize = 5;

pub struct Compare<'a> {
    base: &'a Base,
    stats: Stats,
}

impl<'a> Compare<'a> {
    pub fn new(base: &'a Base) -> Self {
        Self {
            base,
            stats: Stats::default(),
        }
    }

    pub fn execute(&self, input: &CompareInput<'_>, options: &CompareOptions) -> Result<CompareOutput> {
        self.base.validate_fields(&input.fields)?;
        options.filters.validate()?;

        let query = input.query.as_ref();
        let current_data = self.base.filter_data_by_query(input.current_data, query);
        let baseline_data = self.base.filter_data_by_query(input.baseline_data, query);

        let current = self.patterns_by_path(&current_data, &input.fields, &options.filters)?;
        let baseline = self.patterns_by_path(&baseline_data, &input.fields, &options.filters)?;

        let changes = self.compare_patterns(&current, &baseline, options);
        debug!(
            "Compared {} current and {} baseline patterns, {} paths",
            current.len(),
            baseline.len(),
            changes.len()
        );

        let pick = |keep: fn(&ChangeItem) -> bool| -> Vec<ChangeItem> {
            changes.iter().filter(|c| keep(c)).cloned().collect()
        };
        let stable_patterns = pick(|c| c.status == ChangeStatus::Stable);
        let new_patterns = pick(|c| c.is_new);
        let disappeared_patterns = pick(|c| c.is_disappeared);
        let increased_patterns = pick(|c| c.status.is_increase());
        let decreased_patterns = pick(|c| c.status.is_decrease());

        let statistics = ComparisonStatistics {
            current_total: input.current_data.len(),
            baseline_total: input.baseline_data.len(),
            patterns_compared: changes.len(),
            significant_changes: changes.iter().filter(|c| c.is_significant).count(),
        };

        Ok(CompareOutput {
            changes,
            stable_patterns,
            new_patterns,
            disappeared_patterns,
            increased_patterns,
            decreased_patterns,
            statistics,
            fields_analyzed: input.fields.clone(),
            change_threshold: options.change_threshold,
            statistical_significance: options.statistical_significance,
        })
    }

    fn patterns_by_path(
        &self,
        records: &[&Record],
        fields: &[String],
        options: &FindOptions,
    ) -> Result<HashMap<String, Pattern>> {
        if records.is_empty() || fields.is_empty() {
            return Ok(HashMap::new());
        }
        let found = Finder::new(self.base).find_in(records, fields, options)?;
        Ok(found
            .patterns
            .into_iter()
            .map(|p| (p.path.clone(), p))
            .collect())
    }

    fn compare_patterns(
        &self,
        current: &HashMap<String, Pattern>,
        baseline: &HashMap<String, Pattern>,
        options: &CompareOptions,
    ) -> Vec<ChangeItem> {
        let paths: BTreeSet<&String> = current.keys().chain(baseline.keys()).collect();

        let mut changes: Vec<ChangeItem> = paths
            .into_iter()
            .map(|path| self.change_for(path, current.get(path), baseline.get(path), options))
            .collect();

        changes.sort_by(|a, b| {
            b.is_significant
                .cmp(&a.is_significant)
                .then_with(|| {
                    sort_magnitude(b)
                        .partial_cmp(&sort_magnitude(a))
                        .unwrap_or(Ordering::Equal)
                })
        });
        changes
    }

    fn change_for(
        &self,
        path: &str,
        current: Option<&Pattern>,
        baseline: Option<&Pattern>,
        options: &CompareOptions,
    ) -> ChangeItem {
        let current_count = current.map_or(0, |p| p.count);
        let baseline_count = baseline.map_or(0, |p| p.count);
        let current_percentage = current.map_or(0.0, |p| p.percentage);
        let baseline_percentage = baseline.map_or(0.0, |p| p.percentage);

        let count_change = current_count as i64 - baseline_count as i64;
        let relative_change = if baseline_count > 0 {
            count_change as f64 / baseline_count as f64
        } else if current_count > 0 {
            f64::INFINITY
        } else {
            0.0
        };
        let count_change_percentage = if relative_change.is_infinite() {
            f64::INFINITY
        } else {
            relative_change * 100.0
        };

        let is_significant = if relative_change.is_infinite() {
            current_count > NEW_PATTERN_MIN_COUNT
        } else {
            relative_change.abs() >= options.change_threshold
        };

        let statistical_significance = (options.statistical_significance
            && current_count > 0
            && baseline_count > 0)
            .then(|| self.stats.analyze(current_count, baseline_count));

        ChangeItem {
            path: path.to_string(),
            current_count,
            baseline_count,
            count_change,
            count_change_percentage,
            relative_change,
            current_percentage,
            baseline_percentage,
            percentage_change: current_percentage - baseline_percentage,
            status: ChangeStatus::from_change_percentage(count_change_percentage),
            is_new: baseline.is_none(),
            is_disappeared: current.is_none(),
            is_significant,
            depth: current.or(baseline).map_or(1, |p| p.depth),
            statistical_significance,
        }
    }
}

fn sort_magnitude(change: &ChangeItem) -> f64 {
    if change.count_change_percentage.is_infinite() {
        NEW_PATTERN_WEIGHT
    } else {
        change.count_change_percentage.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{records_from_json, EffectMagnitude};
    use serde_json::json;

    fn repeat(record: serde_json::Value, times: usize) -> Vec<serde_json::Value> {
        vec![record; times]
    }

    fn dataset(parts: Vec<Vec<serde_json::Value>>) -> Vec<Record> {
        records_from_json(serde_json::Value::Array(parts.concat())).unwrap()
    }

    #[test]
    fn test_status_and_categories() {
        let current = dataset(vec![
            repeat(json!({"country": "US"}), 10),
            repeat(json!({"country": "EU"}), 10),
            repeat(json!({"country": "JP"}), 6),
        ]);
        let baseline = dataset(vec![
            repeat(json!({"country": "US"}), 10),
            repeat(json!({"country": "EU"}), 4),
            repeat(json!({"country": "CA"}), 5),
        ]);

        let base = Base::new();
        let output = Compare::new(&base)
            .execute(
                &CompareInput::new(&current, &baseline, &["country"]),
                &CompareOptions::default(),
            )
            .unwrap();

        assert_eq!(output.statistics.patterns_compared, 4);
        assert_eq!(output.statistics.current_total, 26);

        let find = |path: &str| output.changes.iter().find(|c| c.path == path).unwrap();
        assert_eq!(find("country=US").status, ChangeStatus::Stable);
        assert!(!find("country=US").is_significant);
        assert_eq!(find("country=EU").status, ChangeStatus::SignificantIncrease);
        assert_eq!(find("country=EU").count_change, 6);
        assert_eq!(find("country=JP").status, ChangeStatus::New);
        assert!(find("country=JP").is_new);
        assert!(find("country=JP").is_significant);
        assert_eq!(find("country=CA").status, ChangeStatus::CriticalDecrease);
        assert!(find("country=CA").is_disappeared);

        assert_eq!(output.new_patterns.len(), 1);
        assert_eq!(output.disappeared_patterns.len(), 1);
        assert_eq!(output.stable_patterns.len(), 1);
        assert_eq!(output.increased_patterns.len(), 1);
        assert_eq!(output.decreased_patterns.len(), 1);

        // new pattern sorts first, stable last
        assert_eq!(output.changes[0].path, "country=JP");
        assert_eq!(output.changes[3].path, "country=US");
    }

    #[test]
    fn test_statistical_analysis_only_when_both_present() {
        let current = dataset(vec![
            repeat(json!({"a": "x"}), 150),
            repeat(json!({"a": "new"}), 2),
        ]);
        let baseline = dataset(vec![repeat(json!({"a": "x"}), 50)]);

        let base = Base::new();
        let options = CompareOptions {
            statistical_significance: true,
            ..Default::default()
        };
        let output = Compare::new(&base)
            .execute(&CompareInput::new(&current, &baseline, &["a"]), &options)
            .unwrap();

        let x = output.changes.iter().find(|c| c.path == "a=x").unwrap();
        let analysis = x.statistical_significance.as_ref().unwrap();
        assert!(analysis.is_significant);
        assert_eq!(analysis.effect_magnitude, EffectMagnitude::Large);

        let new = output.changes.iter().find(|c| c.path == "a=new").unwrap();
        assert!(new.statistical_significance.is_none());
        // two records is below the new-pattern significance count
        assert!(!new.is_significant);
    }
}
