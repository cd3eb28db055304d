use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dataspot::{
    records_from_json, Dataspot, DiscoverInput, DiscoverOptions, FindInput, FindOptions, Query,
    Record, TreeInput, TreeOptions,
};
use serde_json::{json, Value};

fn create_test_data(rows: usize) -> Vec<Record> {
    let countries = ["US", "EU", "CA", "BR", "JP", "IN"];
    let devices = ["mobile", "desktop", "tablet"];
    let channels = ["web", "app", "store", "partner"];

    let rows: Vec<Value> = (0..rows)
        .map(|i| {
            json!({
                "country": countries[i % countries.len()],
                "device": devices[(i / 7) % devices.len()],
                "channel": channels[(i / 3) % channels.len()],
                "amount": (i % 50) * 10,
                "status": format!("STATUS_{}", i % 5),
            })
        })
        .collect();
    records_from_json(Value::Array(rows)).unwrap()
}

fn benchmark_find(c: &mut Criterion) {
    let data_10k = create_test_data(10_000);
    let data_50k = create_test_data(50_000);
    let dataspot = Dataspot::new();
    let fields = ["country", "device", "channel"];

    let mut group = c.benchmark_group("find");

    group.bench_function("10k_rows", |b| {
        let input = FindInput::new(&data_10k, &fields);
        b.iter(|| {
            let result = dataspot.find(black_box(&input), &FindOptions::default());
            assert!(result.is_ok());
        });
    });

    group.bench_function("50k_rows", |b| {
        let input = FindInput::new(&data_50k, &fields);
        b.iter(|| {
            let result = dataspot.find(black_box(&input), &FindOptions::default());
            assert!(result.is_ok());
        });
    });

    // Query filter plus pattern filters
    group.bench_function("50k_rows_filtered", |b| {
        let input = FindInput::new(&data_50k, &fields).with_query(Query::new().field("device", "mobile"));
        let options = FindOptions {
            min_percentage: Some(5.0),
            contains: Some("channel".to_string()),
            ..Default::default()
        };
        b.iter(|| {
            let result = dataspot.find(black_box(&input), &options);
            assert!(result.is_ok());
        });
    });

    group.finish();
}

fn benchmark_tree_and_discover(c: &mut Criterion) {
    let data_10k = create_test_data(10_000);
    let dataspot = Dataspot::new();

    let mut group = c.benchmark_group("hierarchy");

    group.bench_function("tree", |b| {
        let input = TreeInput::new(&data_10k, &["country", "device", "channel"]);
        b.iter(|| {
            let result = dataspot.tree(black_box(&input), &TreeOptions::default());
            assert!(result.is_ok());
        });
    });

    group.bench_function("discover", |b| {
        let input = DiscoverInput::new(&data_10k);
        b.iter(|| {
            let result = dataspot.discover(black_box(&input), &DiscoverOptions::default());
            assert!(result.is_ok());
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_find, benchmark_tree_and_discover);
criterion_main!(benches);
