//! Pattern filtering, sorting and limiting

use crate::error::Result;
use crate::models::{FindOptions, Pattern, SortField};
use std::cmp::Ordering;
use tracing::debug;

pub struct PatternFilter;

impl PatternFilter {
    /// Apply bounds, text filters, ordering and limit from `options`
    pub fn apply(patterns: Vec<Pattern>, options: &FindOptions) -> Result<Vec<Pattern>> {
        let regex = options.compiled_regex()?;
        let before = patterns.len();

        let mut kept: Vec<Pattern> = patterns
            .into_iter()
            .filter(|p| Self::within_bounds(p, options))
            .filter(|p| {
                options
                    .contains
                    .as_deref()
                    .is_none_or(|text| p.path.contains(text))
            })
            .filter(|p| !options.exclude.iter().any(|term| p.path.contains(term.as_str())))
            .filter(|p| regex.as_ref().is_none_or(|re| re.is_match(&p.path)))
            .collect();

        Self::sort(&mut kept, options.sort_by, options.reverse);

        if let Some(limit) = options.limit {
            kept.truncate(limit);
        }

        debug!("Pattern filter kept {} of {} patterns", kept.len(), before);
        Ok(kept)
    }

    fn within_bounds(pattern: &Pattern, options: &FindOptions) -> bool {
        options.min_percentage.is_none_or(|min| pattern.percentage >= min)
            && options.max_percentage.is_none_or(|max| pattern.percentage <= max)
            && options.min_count.is_none_or(|min| pattern.count >= min)
            && options.max_count.is_none_or(|max| pattern.count <= max)
            && options.min_depth.is_none_or(|min| pattern.depth >= min)
            && options.max_depth.is_none_or(|max| pattern.depth <= max)
    }

    /// Stable sort; equal keys keep their extraction order
    pub fn sort(patterns: &mut [Pattern], sort_by: SortField, reverse: bool) {
        patterns.sort_by(|a, b| {
            let ordering = match sort_by {
                SortField::Percentage => a
                    .percentage
                    .partial_cmp(&b.percentage)
                    .unwrap_or(Ordering::Equal),
                SortField::Count => a.count.cmp(&b.count),
                SortField::Depth => a.depth.cmp(&b.depth),
            };
            if reverse {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
}
