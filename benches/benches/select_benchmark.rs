//! Snapshot selection benchmarks.
//!
//! Run with: `cargo bench --package pricrpt-bench`

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pricrpt_bench::{synthetic_archive, synthetic_document};
use pricrpt_lib::{CandidateDocument, NestedArchive, QuoteContext, QuoteReader, SnapshotSelector};
use std::hint::black_box;

fn extract_benchmark(c: &mut Criterion) {
    let ts = Utc.with_ymd_and_hms(2021, 1, 4, 23, 30, 0).unwrap();
    let mut group = c.benchmark_group("extract");

    for entries in [100, 1_000, 10_000] {
        let doc = synthetic_document(entries, "2021-01-04T18:00:00Z");
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(entries), &doc, |b, doc| {
            b.iter(|| {
                let context = QuoteContext::new(ts, "bench", ts);
                QuoteReader::new(doc.as_bytes(), context)
                    .filter_map(Result::ok)
                    .count()
            });
        });
    }

    group.finish();
}

fn rank_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for count in [10, 100, 1_000] {
        let candidates: Vec<_> = (0..count)
            .map(|idx| {
                let declared = (idx % 2 == 0)
                    .then(|| Utc.with_ymd_and_hms(2021, 1, 4, 10, 0, 0).unwrap())
                    .map(|ts| ts + chrono::Duration::seconds(idx));
                CandidateDocument::new(format!("BVBG_{idx}.xml"), declared)
            })
            .collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &candidates,
            |b, candidates| b.iter(|| pricrpt_lib::rank_candidates(black_box(candidates.clone()))),
        );
    }

    group.finish();
}

fn select_benchmark(c: &mut Criterion) {
    let ingestion = Utc.with_ymd_and_hms(2021, 2, 1, 8, 0, 0).unwrap();
    let selector = SnapshotSelector::new(Default::default());
    let mut group = c.benchmark_group("select");
    group.sample_size(20);

    for documents in [2, 8] {
        let bytes = synthetic_archive(documents, 2_000).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(documents), &bytes, |b, bytes| {
            b.iter(|| {
                let mut archive =
                    NestedArchive::from_bytes("PR210104_20210104.zip", bytes.clone()).unwrap();
                selector.select(&mut archive, ingestion).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, extract_benchmark, rank_benchmark, select_benchmark);
criterion_main!(benches);
