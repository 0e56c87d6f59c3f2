//! Benchmarks for the filter, sort and paginate pipeline

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use erp_core::types::Invoice;
use erp_records::{
    FilterBar, PageRequest, SortDirection, aggregate::stat_cards, pages, paginate, sample,
};
use std::{hint::black_box, sync::Arc};

/// Sample invoices repeated to `size` rows with unique ids
fn invoices(size: usize) -> Vec<Invoice> {
    let template = sample::invoices();
    (0..size)
        .zip(template.iter().cycle())
        .map(|(index, invoice)| {
            let mut invoice = invoice.clone();
            invoice.id = i64::try_from(index).unwrap_or(i64::MAX) + 1;
            invoice.invoice_number = format!("INV-{:06}", index + 1);
            invoice
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let definition = pages::invoices::definition();

    for size in [100, 1_000, 10_000] {
        let records = invoices(size);
        let mut bar = FilterBar::new(Arc::clone(&definition.schema));
        bar.set_search("상사");
        bar.select("status", "paid").ok();
        let filters = bar.filter_set();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("search_and_status", size), &records, |b, records| {
            b.iter(|| filters.apply(black_box(records)).len());
        });
    }

    group.finish();
}

fn bench_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("page");
    let definition = pages::invoices::definition();
    let records = invoices(10_000);
    let mut sort = definition.sort("total_amount").cloned();
    if let Some(sort) = sort.as_mut() {
        sort.direction = SortDirection::Desc;
    }

    group.bench_function("sort_and_paginate", |b| {
        b.iter(|| {
            let mut rows: Vec<&Invoice> = records.iter().collect();
            if let Some(sort) = &sort {
                sort.sort(&mut rows);
            }
            paginate(rows, PageRequest::new(black_box(37), 10)).items.len()
        });
    });

    group.bench_function("stat_cards", |b| {
        b.iter(|| stat_cards(&definition.stats, black_box(&records)));
    });

    group.finish();
}

criterion_group!(benches, bench_filter, bench_page);
criterion_main!(benches);
