use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hexledger_core::{encoding, Clock, ExportContext, ExportService, HistoryView, LedgerStore, SummaryService};
use hexledger_domain::{Category, DateRange, ExportPeriod, FinancialRecord, NewRecord};
use hexledger_storage_json::JsonRecordStorage;
use tempfile::tempdir;

const CATEGORIES: [Category; 5] = [
    Category::Asset,
    Category::Liability,
    Category::Income,
    Category::Expense,
    Category::Equity,
];

struct BenchClock;

impl Clock for BenchClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }
}

fn sample_record(idx: usize) -> NewRecord {
    let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let mut record = NewRecord::new(
        format!("Entry {}", idx),
        format!("{}.{:02}", 50 + idx % 900, idx % 100).parse().unwrap(),
        CATEGORIES[idx % CATEGORIES.len()],
        start + Duration::days((idx % 365) as i64),
    );
    let data = encoding::encode(&record.canonical()).unwrap();
    record.attach_payload(data);
    record.confirm(format!("0x{:064x}", idx), Some(idx as u64), 1_700_000_000_000 + idx as i64);
    record
}

fn sample_records(count: usize) -> Vec<FinancialRecord> {
    (0..count)
        .map(|idx| FinancialRecord::assign(format!("r-{}", idx), sample_record(idx)))
        .collect()
}

fn bench_summaries(c: &mut Criterion) {
    let records = sample_records(black_box(10_000));
    let current = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    );
    let previous = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
    );

    c.bench_function("totals_by_category_10k", |b| {
        b.iter(|| black_box(SummaryService::totals_by_category(&records)))
    });
    c.bench_function("balance_10k", |b| {
        b.iter(|| black_box(SummaryService::balance(&records)))
    });
    c.bench_function("compare_quarters_10k", |b| {
        b.iter(|| black_box(SummaryService::compare(&records, &current, &previous)))
    });
    c.bench_function("history_page_10k", |b| {
        b.iter(|| black_box(HistoryView::page(&records, 3, 10)))
    });
}

fn bench_encoding_and_export(c: &mut Criterion) {
    let payload = sample_record(42).canonical();
    c.bench_function("encode_payload", |b| {
        b.iter(|| black_box(encoding::encode(&payload).unwrap()))
    });

    let records = sample_records(10_000);
    let context = ExportContext {
        exported_at: BenchClock.now(),
        network: "Ethereum Sepolia Testnet".into(),
        application: "HEXLEDGER".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    };
    c.bench_function("export_fy_10k", |b| {
        b.iter(|| {
            black_box(ExportService::build(&records, &ExportPeriod::FinancialYear(2024), &context))
        })
    });
}

fn bench_store_append(c: &mut Criterion) {
    c.bench_function("store_append_1k_json", |b| {
        b.iter_batched(
            || {
                let dir = tempdir().expect("tempdir");
                let storage = JsonRecordStorage::new(dir.path()).expect("storage");
                (dir, LedgerStore::open(Box::new(storage), Arc::new(BenchClock)))
            },
            |(_dir, mut store)| {
                for idx in 0..1_000 {
                    store.append(sample_record(idx));
                }
                black_box(store.len())
            },
            BatchSize::PerIteration,
        )
    });
}

criterion_group!(
    benches,
    bench_summaries,
    bench_encoding_and_export,
    bench_store_append
);
criterion_main!(benches);
