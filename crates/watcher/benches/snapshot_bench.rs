//! Snapshot capture and diff benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pollwatch_watcher::{diff, Snapshot};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Build a tree of `dirs` directories holding `files_per_dir` files each
fn populate(dirs: usize, files_per_dir: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for d in 0..dirs {
        let dir = temp_dir.path().join(format!("dir{d}"));
        fs::create_dir(&dir).unwrap();
        for f in 0..files_per_dir {
            fs::write(dir.join(format!("file{f}.txt")), b"x").unwrap();
        }
    }
    temp_dir
}

fn synthetic(count: usize, offset_secs: u64) -> Snapshot {
    (0..count)
        .map(|i| {
            let time = SystemTime::UNIX_EPOCH + Duration::from_secs(i as u64 + offset_secs);
            (PathBuf::from(format!("dir{}/file{}.txt", i / 100, i % 100)), time)
        })
        .collect()
}

fn bench_capture(c: &mut Criterion) {
    let tree = populate(10, 100);

    c.bench_function("capture_recursive_1k", |b| {
        b.iter(|| black_box(Snapshot::capture(tree.path(), true).unwrap()));
    });

    c.bench_function("capture_flat_1k", |b| {
        b.iter(|| black_box(Snapshot::capture(tree.path(), false).unwrap()));
    });
}

fn bench_diff(c: &mut Criterion) {
    let old = synthetic(10_000, 0);
    let unchanged = old.clone();
    let all_updated = synthetic(10_000, 1);

    c.bench_function("diff_10k_unchanged", |b| {
        b.iter(|| black_box(diff(&old, &unchanged)));
    });

    c.bench_function("diff_10k_all_updated", |b| {
        b.iter(|| black_box(diff(&old, &all_updated)));
    });
}

criterion_group!(benches, bench_capture, bench_diff);
criterion_main!(benches);
