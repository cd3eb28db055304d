use dataspot::{records_from_json, Dataspot, Query, Record, TreeInput, TreeNode, TreeOptions};
use serde_json::json;

fn orders() -> Vec<Record> {
    records_from_json(json!([
        {"country": "US", "device": "mobile", "type": "premium"},
        {"country": "US", "device": "mobile", "type": "basic"},
        {"country": "US", "device": "mobile", "type": "basic"},
        {"country": "US", "device": "desktop", "type": "premium"},
        {"country": "US", "device": "tablet", "type": "basic"},
        {"country": "EU", "device": "mobile", "type": "basic"},
        {"country": "EU", "device": "desktop", "type": "basic"},
        {"country": "EU", "device": "desktop", "type": "premium"},
        {"country": "CA", "device": "mobile", "type": "basic"},
        {"country": "CA", "device": "mobile", "type": "premium"},
    ]))
    .unwrap()
}

fn tree(data: &[Record], fields: &[&str], options: TreeOptions) -> dataspot::TreeOutput {
    Dataspot::new()
        .tree(&TreeInput::new(data, fields), &options)
        .unwrap()
}

fn all_nodes(nodes: &[TreeNode]) -> Vec<&TreeNode> {
    let mut out = Vec::new();
    for node in nodes {
        out.push(node);
        out.extend(all_nodes(&node.children));
    }
    out
}

#[test]
fn test_basic_structure() {
    let data = orders();
    let output = tree(&data, &["country", "device"], TreeOptions::default());

    assert_eq!(output.name, "root");
    assert_eq!(output.value, 10);
    assert_eq!(output.percentage, 100.0);
    assert_eq!(output.node, 0);
    assert_eq!(output.top, 5);
    assert_eq!(output.fields_analyzed, vec!["country", "device"]);

    let names: Vec<&str> = output.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["country=US", "country=EU", "country=CA"]);

    let us = &output.children[0];
    assert_eq!(us.value, 5);
    assert_eq!(us.percentage, 50.0);
    assert_eq!(us.node, 1);
    assert_eq!(us.children[0].name, "device=mobile");
    assert_eq!(us.children[0].value, 3);
    assert_eq!(us.children[0].percentage, 30.0);
    assert_eq!(us.children[0].node, 2);
}

#[test]
fn test_empty_data() {
    let output = tree(&[], &["country"], TreeOptions::default());
    assert_eq!(output.name, "root");
    assert_eq!(output.value, 0);
    assert_eq!(output.percentage, 0.0);
    assert!(output.children.is_empty());
}

#[test]
fn test_children_never_exceed_parent() {
    let data = orders();
    let output = tree(&data, &["country", "device", "type"], TreeOptions::default());
    fn check(node: &TreeNode) {
        for child in &node.children {
            assert!(child.value <= node.value);
            assert_eq!(child.node, node.node + 1);
            check(child);
        }
    }
    for child in &output.children {
        check(child);
    }
}

#[test]
fn test_min_and_max_value() {
    let data = orders();
    let options = TreeOptions {
        min_value: Some(2),
        ..Default::default()
    };
    let output = tree(&data, &["country", "device"], options);
    assert!(all_nodes(&output.children).iter().all(|n| n.value >= 2));

    let options = TreeOptions {
        max_value: Some(3),
        ..Default::default()
    };
    let output = tree(&data, &["country", "device"], options);
    let nodes = all_nodes(&output.children);
    assert!(!nodes.is_empty());
    assert!(nodes.iter().all(|n| n.value <= 3));
}

#[test]
fn test_percentage_bounds() {
    let data = orders();
    let options = TreeOptions {
        min_percentage: Some(20.0),
        max_percentage: Some(40.0),
        ..Default::default()
    };
    let output = tree(&data, &["country", "device"], options);
    for node in all_nodes(&output.children) {
        assert!(node.percentage >= 20.0 && node.percentage <= 40.0);
    }
}

#[test]
fn test_depth_limits() {
    let data = orders();
    let options = TreeOptions {
        max_depth: Some(1),
        ..Default::default()
    };
    let output = tree(&data, &["country", "device", "type"], options);
    assert!(output.children.iter().all(|c| c.children.is_empty()));

    // Without surviving parents, second level nodes attach to the root
    let options = TreeOptions {
        min_depth: Some(2),
        max_depth: Some(2),
        ..Default::default()
    };
    let output = tree(&data, &["country", "device"], options);
    assert!(!output.children.is_empty());
    for child in &output.children {
        assert!(child.name.contains(" > "));
        assert_eq!(child.node, 2);
    }
}

#[test]
fn test_text_filters() {
    let data = orders();
    let options = TreeOptions {
        contains: Some("mobile".to_string()),
        ..Default::default()
    };
    let output = tree(&data, &["country", "device"], options);
    assert!(all_nodes(&output.children).iter().all(|n| n.name.contains("mobile")));

    let options = TreeOptions {
        exclude: vec!["EU".to_string()],
        ..Default::default()
    };
    let output = tree(&data, &["country", "device"], options);
    assert!(output.children.iter().all(|c| c.name != "country=EU"));

    let options = TreeOptions {
        regex: Some("^country=(US|CA)$".to_string()),
        ..Default::default()
    };
    let output = tree(&data, &["country", "device"], options);
    let names: Vec<&str> = output.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["country=US", "country=CA"]);
}

#[test]
fn test_query_restricts_records() {
    let data = orders();
    let input = TreeInput::new(&data, &["country", "device"]).with_query(Query::new().field("type", "premium"));
    let output = Dataspot::new().tree(&input, &TreeOptions::default()).unwrap();

    assert_eq!(output.value, 4);
    assert_eq!(output.statistics.total_records, 10);
    assert_eq!(output.statistics.filtered_records, 4);
    let total: usize = output.children.iter().map(|c| c.value).sum();
    assert_eq!(total, 4);
}

#[test]
fn test_top_limits_each_level() {
    let data = orders();
    let options = TreeOptions {
        top: 2,
        ..Default::default()
    };
    let output = tree(&data, &["country", "device"], options);
    assert_eq!(output.top, 2);
    assert_eq!(output.children.len(), 2);
    assert!(all_nodes(&output.children).iter().all(|n| n.children.len() <= 2));
}

#[test]
fn test_single_and_identical_records() {
    let single = records_from_json(json!([{"country": "US", "device": "mobile"}])).unwrap();
    let output = tree(&single, &["country", "device"], TreeOptions::default());
    assert_eq!(output.value, 1);
    assert_eq!(output.children[0].percentage, 100.0);
    assert_eq!(output.children[0].children[0].percentage, 100.0);

    let identical: Vec<Record> = std::iter::repeat(single[0].clone()).take(4).collect();
    let output = tree(&identical, &["country", "device"], TreeOptions::default());
    assert_eq!(output.children.len(), 1);
    assert_eq!(output.children[0].value, 4);
}

#[test]
fn test_consistent_with_find() {
    let data = orders();
    let found = Dataspot::new()
        .find(
            &dataspot::FindInput::new(&data, &["country", "device"]),
            &dataspot::FindOptions::default(),
        )
        .unwrap();
    let output = tree(&data, &["country", "device"], TreeOptions::default());
    for child in &output.children {
        let pattern = found.find_path(&child.name).unwrap();
        assert_eq!(pattern.count, child.value);
        assert_eq!(pattern.percentage, child.percentage);
    }
}

#[test]
fn test_json_serializable() {
    let data = orders();
    let output = tree(&data, &["country"], TreeOptions::default());
    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["name"], "root");
    assert_eq!(value["children"][0]["name"], "country=US");
    assert!(value["statistics"]["patterns_found"].as_u64().unwrap() >= 3);
}

#[test]
fn test_values_containing_separator() {
    let data = records_from_json(json!([
        {"c": "A", "d": "x"},
        {"c": "A > B", "d": "x"},
        {"c": "A > B", "d": "y"},
        {"c": "A > B", "d": "y"},
    ]))
    .unwrap();
    let output = tree(&data, &["c", "d"], TreeOptions::default());

    let names: Vec<&str> = output.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["c=A > B", "c=A"]);
    assert!(output.children.iter().all(|c| c.node == 1));

    let nested = &output.children[0];
    assert_eq!(nested.value, 3);
    let child_names: Vec<&str> = nested.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(child_names, vec!["d=y", "d=x"]);
    assert_eq!(output.children[1].children.len(), 1);
}
