use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fstore_storage::{NamePattern, Storage};
use std::hint::black_box;
use std::time::Duration;
use tempfile::TempDir;

// ============================================================================
// Benchmark: Name Validation & Path Resolution
// ============================================================================

fn bench_path_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_resolution");

    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();

    for level in [1, 3, 8] {
        let storage = rt.block_on(async {
            Storage::builder().root(temp.path()).imbrication_level(level).connect().await.unwrap()
        });

        group.bench_with_input(BenchmarkId::new("resolve", level), &storage, |b, storage| {
            b.iter(|| {
                black_box(storage.resolve("test_file_with_a_longer_name_1").unwrap());
            });
        });
    }

    group.bench_function("compile_pattern", |b| {
        b.iter(|| {
            black_box(NamePattern::new("test_.*_[0-9]+").unwrap());
        });
    });

    group.finish();
}

// ============================================================================
// Benchmark: Item Operations
// ============================================================================

fn bench_item_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("item_operations");
    group.measurement_time(Duration::from_secs(10));

    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let storage =
        rt.block_on(async { Storage::builder().root(temp.path()).connect().await.unwrap() });

    let sizes = [("1KB", 1024), ("10KB", 10 * 1024), ("100KB", 100 * 1024)];

    for (label, size) in sizes {
        let data: Vec<u8> = (0..size).map(|i| u8::try_from(i % 256).unwrap()).collect();
        group.throughput(Throughput::Bytes(u64::try_from(size).unwrap_or(u64::MAX)));

        let name = format!("bench_{label}");
        rt.block_on(async { storage.create(name.as_str(), &data).await.unwrap() });

        group.bench_with_input(BenchmarkId::new("update", label), &data, |b, data| {
            b.to_async(&rt).iter(|| async {
                storage.update(name.as_str(), data).await.unwrap();
            });
        });

        group.bench_function(BenchmarkId::new("read", label), |b| {
            b.to_async(&rt).iter(|| async {
                black_box(storage.read_bytes(name.as_str()).await.unwrap());
            });
        });
    }

    group.bench_function("create_delete", |b| {
        b.to_async(&rt).iter(|| async {
            storage.create("churn", b"x").await.unwrap();
            storage.delete("churn").await.unwrap();
        });
    });

    group.finish();
}

// ============================================================================
// Benchmark: Pattern Scan
// ============================================================================

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    let temp = TempDir::new().unwrap();
    let rt = tokio::runtime::Runtime::new().unwrap();
    let storage = rt.block_on(async {
        let storage = Storage::builder().root(temp.path()).connect().await.unwrap();
        for i in 0..1000 {
            storage.create(format!("item_{i:04}"), b"").await.unwrap();
        }
        storage
    });

    group.bench_function("scan_1000_items", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(storage.scan("item_0[0-4].*").await.unwrap());
        });
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(benches, bench_path_resolution, bench_item_operations, bench_scan);

criterion_main!(benches);
