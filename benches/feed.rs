// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tidemark::server::{FeedFilter, FixtureStore};

mod profiler;

// Benchmark identity (keep stable):
// - Group name in this file: `feed.page`
// - Case IDs: `first_page`, `branch_filtered`, `deep_page`
fn deep_page_filter(store: &FixtureStore) -> FeedFilter {
    let mut filter = FeedFilter::default();
    loop {
        let envelope = store.page(&filter).expect("page");
        match envelope.pagination.next {
            Some(next) => filter.cursor = Some(next),
            None => return filter,
        }
    }
}

fn benches_feed(c: &mut Criterion) {
    let store = FixtureStore::demo();

    let branch_filter = FeedFilter { branch: Some("main".to_owned()), cursor: None };
    let deep_filter = deep_page_filter(&store);

    let cases = [
        ("first_page", FeedFilter::default()),
        ("branch_filtered", branch_filter),
        ("deep_page", deep_filter),
    ];

    let mut group = c.benchmark_group("feed.page");
    for (case_id, filter) in &cases {
        let rows = store.page(filter).expect("page").data.len() as u64;
        group.throughput(Throughput::Elements(rows.max(1)));
        group.bench_function(*case_id, |b| {
            b.iter(|| store.page(black_box(filter)).expect("page"))
        });
    }
    group.finish();

    let mut branches_group = c.benchmark_group("feed.branches");
    branches_group.bench_function("demo", |b| b.iter(|| black_box(&store).branches()));
    branches_group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_feed
}
criterion_main!(benches);
