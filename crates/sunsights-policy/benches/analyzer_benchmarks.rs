//! End-to-end analyzer latency over the lexicon classifiers
//!
//! Run with: cargo bench -p sunsights-policy

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sunsights_classifiers::MlClassifierAdapter;
use sunsights_policy::SentimentAnalyzer;
use tokio::runtime::Runtime;

fn benchmark_analyze(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let analyzer = SentimentAnalyzer::new(MlClassifierAdapter::lexicon().unwrap()).unwrap();

    let cases = [
        ("guarded", "12345 !!!"),
        ("double_negative", "The service wasn't bad at all"),
        ("contrastive_but", "I love the design but the price is too high"),
        ("functionality", "The app doesn't work since the last update, useless"),
    ];

    let mut group = c.benchmark_group("Analyzer");
    for (name, text) in cases {
        group.bench_with_input(BenchmarkId::new("analyze", name), &text, |b, text| {
            b.iter(|| rt.block_on(analyzer.analyze(black_box(text))));
        });
    }
    group.finish();
}

fn benchmark_analyze_many(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let analyzer = SentimentAnalyzer::new(MlClassifierAdapter::lexicon().unwrap()).unwrap();

    let comments: Vec<String> = (0..200)
        .map(|i| match i % 4 {
            0 => format!("Order {i} arrived late and the box was damaged"),
            1 => format!("Great support on ticket {i}, thank you!"),
            2 => String::new(),
            _ => format!("Somewhat happy with item {i} however setup was confusing"),
        })
        .collect();

    c.bench_function("analyze_many_200", |b| {
        b.iter(|| rt.block_on(analyzer.analyze_many(black_box(&comments))));
    });
}

criterion_group!(benches, benchmark_analyze, benchmark_analyze_many);
criterion_main!(benches);
