use crate::data::type_inference::{InferredType, TypeInference};
use crate::models::pattern::percentage_of;
use crate::models::{value_text, FieldStats, Record, ValueCount};
use serde_json::Value;
use std::collections::BTreeMap;

/// Number of most frequent values kept per field
pub const TOP_VALUES: usize = 5;

/// Computes per-field distribution statistics over a record set
pub struct DataAnalyzer {
    top_values: usize,
}

impl Default for DataAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl DataAnalyzer {
    pub fn new() -> Self {
        Self {
            top_values: TOP_VALUES,
        }
    }

    pub fn with_top_values(top_values: usize) -> Self {
        Self { top_values }
    }

    /// Statistics for one field. A record without the field counts as null.
    pub fn field_statistics(&self, records: &[Record], field: &str) -> FieldStats {
        let total_count = records.len();
        let mut null_count = 0;
        let mut value_type = InferredType::Null;
        let mut frequency_map: BTreeMap<String, usize> = BTreeMap::new();

        for record in records {
            match record.get(field) {
                None | Some(Value::Null) => null_count += 1,
                Some(value) => {
                    value_type =
                        TypeInference::merge_types(value_type, TypeInference::infer_from_json(value));
                    *frequency_map.entry(value_text(value)).or_insert(0) += 1;
                }
            }
        }

        let unique_count = frequency_map.len();

        // BTreeMap iteration is alphabetical, so ties keep that order
        let mut ranked: Vec<(String, usize)> = frequency_map.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let top_values = ranked
            .into_iter()
            .take(self.top_values)
            .map(|(value, count)| ValueCount {
                value,
                count,
                percentage: percentage_of(count, total_count),
            })
            .collect();

        FieldStats {
            total_count,
            null_count,
            null_percentage: percentage_of(null_count, total_count),
            unique_count,
            value_type: value_type.as_str().to_string(),
            top_values,
        }
    }

    /// Statistics for each of `fields`, keyed by field name
    pub fn field_distributions(
        &self,
        records: &[Record],
        fields: &[String],
    ) -> BTreeMap<String, FieldStats> {
        fields
            .iter()
            .map(|field| (field.clone(), self.field_statistics(records, field)))
            .collect()
    }
}
