use super::base::Base;
use super::finder::Finder;
use crate::error::Result;
use crate::models::pattern::{percentage_of, round2};
use crate::models::{
    AnalyzeInput, AnalyzeOptions, AnalyzeOutput, ConcentrationDistribution, Insights, Pattern,
    Statistics,
};
use tracing::debug;

/// Patterns shown in `top_patterns`
const TOP_PATTERNS: usize = 5;

/// `find` plus dataset statistics, field distributions and insights
pub struct Analyzer<'a> {
    base: &'a Base,
}

impl<'a> Analyzer<'a> {
    pub fn new(base: &'a Base) -> Self {
        Self { base }
    }

    pub fn execute(&self, input: &AnalyzeInput<'_>, options: &AnalyzeOptions) -> Result<AnalyzeOutput> {
        let found = Finder::new(self.base).execute(input, options)?;
        let patterns = found.patterns;

        let total_records = input.data.len();
        let filtered_records = match input.query.as_ref() {
            Some(query) if !query.is_empty() => {
                self.base
                    .filter_data_by_query(input.data, Some(query))
                    .len()
            }
            _ => total_records,
        };

        let field_stats = self
            .base
            .analyze_field_distributions(input.data, &input.fields);
        let insights = Self::insights(&patterns);
        debug!(
            "Analyzed {} records: {} patterns, {}",
            total_records,
            patterns.len(),
            insights.concentration_distribution
        );

        let statistics = Statistics {
            total_records,
            filtered_records,
            filter_ratio: percentage_of(filtered_records, total_records),
            patterns_found: patterns.len(),
            max_concentration: insights.max_concentration,
            // Unrounded here; the insights average is rounded for display
            avg_concentration: Self::mean_percentage(&patterns),
        };

        Ok(AnalyzeOutput {
            top_patterns: patterns.iter().take(TOP_PATTERNS).cloned().collect(),
            patterns,
            insights,
            statistics,
            field_stats,
            fields_analyzed: input.fields.clone(),
        })
    }

    fn insights(patterns: &[Pattern]) -> Insights {
        if patterns.is_empty() {
            return Insights {
                patterns_found: 0,
                max_concentration: 0.0,
                avg_concentration: 0.0,
                concentration_distribution: ConcentrationDistribution::NoPatterns,
            };
        }

        let concentrations: Vec<f64> = patterns.iter().map(|p| p.percentage).collect();
        let max = concentrations.iter().copied().fold(f64::MIN, f64::max);
        let avg = Self::mean_percentage(patterns);

        Insights {
            patterns_found: patterns.len(),
            max_concentration: max,
            avg_concentration: round2(avg),
            concentration_distribution: Self::distribution(&concentrations),
        }
    }

    fn mean_percentage(patterns: &[Pattern]) -> f64 {
        if patterns.is_empty() {
            return 0.0;
        }
        patterns.iter().map(|p| p.percentage).sum::<f64>() / patterns.len() as f64
    }

    /// Classify by the share of high (>= 50%) and moderate (20-50%) patterns
    pub fn distribution(concentrations: &[f64]) -> ConcentrationDistribution {
        if concentrations.is_empty() {
            return ConcentrationDistribution::NoPatterns;
        }
        let total = concentrations.len() as f64;
        let high = concentrations.iter().filter(|&&c| c >= 50.0).count() as f64;
        let moderate = concentrations
            .iter()
            .filter(|&&c| (20.0..50.0).contains(&c))
            .count() as f64;

        if high / total > 0.3 {
            ConcentrationDistribution::HighDominant
        } else if moderate / total > 0.5 {
            ConcentrationDistribution::Moderate
        } else {
            ConcentrationDistribution::LowPrevalent
        }
    }
}
