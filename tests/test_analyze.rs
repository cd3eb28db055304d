use dataspot::{
    records_from_json, AnalyzeInput, AnalyzeOptions, ConcentrationDistribution, Dataspot, Query,
    Record,
};
use serde_json::json;

fn payments() -> Vec<Record> {
    let mut rows = Vec::new();
    for i in 0..50 {
        rows.push(json!({
            "method": if i < 35 { "card" } else { "transfer" },
            "country": if i % 5 == 0 { "EU" } else { "US" },
            "note": if i % 10 == 0 { serde_json::Value::Null } else { json!("ok") },
        }));
    }
    records_from_json(json!(rows)).unwrap()
}

#[test]
fn test_statistics_and_insights() {
    let data = payments();
    let output = Dataspot::new()
        .analyze(&AnalyzeInput::new(&data, &["method", "country"]), &AnalyzeOptions::default())
        .unwrap();

    assert_eq!(output.statistics.total_records, 50);
    assert_eq!(output.statistics.filtered_records, 50);
    assert_eq!(output.statistics.filter_ratio, 100.0);
    assert_eq!(output.statistics.patterns_found, output.patterns.len());
    assert_eq!(output.statistics.max_concentration, 70.0);
    assert_eq!(output.insights.max_concentration, 70.0);
    assert_eq!(output.insights.patterns_found, output.patterns.len());
    assert_eq!(output.fields_analyzed, vec!["method", "country"]);

    assert!(output.top_patterns.len() <= 5);
    assert_eq!(output.top_patterns[..], output.patterns[..output.top_patterns.len()]);
}

#[test]
fn test_field_stats_cover_unfiltered_data() {
    let data = payments();
    let input = AnalyzeInput::new(&data, &["method", "note"]).with_query(Query::new().field("country", "EU"));
    let output = Dataspot::new().analyze(&input, &AnalyzeOptions::default()).unwrap();

    assert_eq!(output.statistics.filtered_records, 10);
    assert_eq!(output.statistics.filter_ratio, 20.0);

    let method = &output.field_stats["method"];
    assert_eq!(method.total_count, 50);
    assert_eq!(method.unique_count, 2);
    assert_eq!(method.top_values[0].value, "card");
    assert_eq!(method.top_values[0].count, 35);

    let note = &output.field_stats["note"];
    assert_eq!(note.null_count, 5);
    assert_eq!(note.null_percentage, 10.0);
}

#[test]
fn test_distribution_labels() {
    let skewed = records_from_json(json!([
        {"k": "a"}, {"k": "a"}, {"k": "a"}, {"k": "a"}, {"k": "b"},
    ]))
    .unwrap();
    let output = Dataspot::new()
        .analyze(&AnalyzeInput::new(&skewed, &["k"]), &AnalyzeOptions::default())
        .unwrap();
    assert_eq!(
        output.insights.concentration_distribution,
        ConcentrationDistribution::HighDominant
    );

    let flat: Vec<Record> = (0..20)
        .map(|i| json!({"k": format!("v{}", i)}).as_object().cloned().unwrap())
        .collect();
    let output = Dataspot::new()
        .analyze(&AnalyzeInput::new(&flat, &["k"]), &AnalyzeOptions::default())
        .unwrap();
    assert_eq!(
        output.insights.concentration_distribution,
        ConcentrationDistribution::LowPrevalent
    );
}

#[test]
fn test_no_matching_records() {
    let data = payments();
    let input = AnalyzeInput::new(&data, &["method"]).with_query(Query::new().field("country", "JP"));
    let output = Dataspot::new().analyze(&input, &AnalyzeOptions::default()).unwrap();

    assert!(output.patterns.is_empty());
    assert_eq!(output.statistics.filtered_records, 0);
    assert_eq!(output.statistics.filter_ratio, 0.0);
    assert_eq!(
        output.insights.concentration_distribution,
        ConcentrationDistribution::NoPatterns
    );
}

#[test]
fn test_filters_apply_to_patterns() {
    let data = payments();
    let options = AnalyzeOptions {
        min_percentage: Some(50.0),
        ..Default::default()
    };
    let output = dataspot::analyze(&data, &["method", "country"], None, &options).unwrap();
    assert!(output.patterns.iter().all(|p| p.percentage >= 50.0));

    let value = serde_json::to_value(&output).unwrap();
    assert!(value["insights"]["concentration_distribution"].is_string());
}
