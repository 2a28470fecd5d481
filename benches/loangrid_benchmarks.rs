use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use loangrid::*;
use std::num::NonZeroUsize;

fn build_store(total: u64) -> RecordStore {
    let records = (1..=total)
        .map(|i| {
            Loan::new(
                i,
                format!("Name {:05}", i),
                (i * 7919) % 100_000 + 1000,
                LoanStatus::ALL[((i - 1) % 3) as usize],
                format!("2025-01-{:02}", (i - 1) % 30 + 1),
            )
        })
        .collect();
    RecordStore::new("bench", records).unwrap()
}

fn bench_derive_unfiltered(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_unfiltered");

    for size in [1_000u64, 10_000, 50_000].iter() {
        let store = build_store(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| derive_view(black_box(&store), &FilterCriteria::new(), &SortState::unsorted()));
        });
    }
    group.finish();
}

fn bench_derive_filtered(c: &mut Criterion) {
    let store = build_store(50_000);
    let criteria = FilterCriteria::new()
        .with_search_text("name 1")
        .with_status(LoanStatus::Approved)
        .with_amount_range(Some(20_000), Some(80_000))
        .with_date_range(Some("2025-01-05"), Some("2025-01-25"));

    c.bench_function("derive_filtered_50k", |b| {
        b.iter(|| derive_view(black_box(&store), black_box(&criteria), &SortState::unsorted()));
    });
}

fn bench_derive_sorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive_sorted_50k");
    let store = build_store(50_000);

    for column in [LoanField::Amount, LoanField::BorrowerName, LoanField::CloseDate] {
        let sort = SortState::by(SortKey::descending(column));
        group.bench_with_input(BenchmarkId::from_parameter(column), &sort, |b, sort| {
            b.iter(|| derive_view(black_box(&store), &FilterCriteria::new(), sort));
        });
    }
    group.finish();
}

fn bench_paginate_full_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("paginate_full_view_50k");
    let store = build_store(50_000);
    let view = derive_view(&store, &FilterCriteria::new(), &SortState::unsorted());

    for page_size in [25usize, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(page_size), page_size, |b, &page_size| {
            b.iter(|| {
                let mut paginator = Paginator::new(NonZeroUsize::new(page_size).unwrap());
                while let Some(ticket) = paginator.begin_load() {
                    paginator.complete_load(ticket, black_box(&view));
                }
                paginator.len()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_derive_unfiltered,
    bench_derive_filtered,
    bench_derive_sorted,
    bench_paginate_full_view
);
criterion_main!(benches);
