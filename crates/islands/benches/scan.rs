// Copyright (c) 2025 r-sql-islands contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Whole-document scan and per-keystroke classification benchmarks.
//!
//! The detector runs on every keystroke, so both the cold scan and the
//! cached classify path matter.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use r_sql_islands::{DetectorConfig, Position, SqlIslandDetector, scan_regions};

/// A realistic analysis script: queries mixed with plain R
fn synthetic_document(blocks: usize) -> String {
    let mut doc = String::new();
    for i in 0..blocks {
        doc.push_str(&format!(
            "con{i} <- connect()\n\
             res{i} <- dbGetQuery(con{i}, \"SELECT id, name FROM users WHERE org = {i}\")\n\
             q{i} <- glue_sql(\"SELECT * FROM orders WHERE user_id IN ({{ids{i}}})\", .con = con{i})\n\
             # summarise results\n\
             summary(res{i})\n\n"
        ));
    }
    doc
}

fn bench_scan_regions(c: &mut Criterion) {
    let config = DetectorConfig::default();
    let small = synthetic_document(10);
    let large = synthetic_document(200);

    c.bench_function("scan_regions/10_blocks", |b| {
        b.iter(|| scan_regions(black_box(&small), &config))
    });
    c.bench_function("scan_regions/200_blocks", |b| {
        b.iter(|| scan_regions(black_box(&large), &config))
    });
}

fn bench_classify_cached(c: &mut Criterion) {
    let text = synthetic_document(50);
    let mut detector = SqlIslandDetector::default();
    // Warm the cache so the bench measures the lookup path
    detector.regions("file:///bench.R", 1, &text);

    c.bench_function("classify/cached", |b| {
        b.iter(|| {
            detector.classify(
                black_box("file:///bench.R"),
                1,
                black_box(&text),
                Position::new(1, 40),
            )
        })
    });
}

criterion_group!(benches, bench_scan_regions, bench_classify_cached);
criterion_main!(benches);
