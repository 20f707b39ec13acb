//! Throughput Benchmark for FlashFS
//!
//! This benchmark measures request parsing and the full dispatch path
//! (parse, lock, filesystem action) under various workloads.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use flashfs::commands::CommandHandler;
use flashfs::protocol::{parse_command, trim_request};
use flashfs::storage::{FileStore, PathLocks};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn create_handler() -> CommandHandler {
    CommandHandler::new(Arc::new(FileStore::new()), Arc::new(PathLocks::new()))
}

/// Benchmark trimming and parsing request lines
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get", |b| {
        b.iter(|| black_box(parse_command(trim_request(black_box(b"GET notes.txt\r\n")))));
    });

    group.bench_function("append_long_text", |b| {
        let line = format!("APPEND notes.txt {}\n", "word ".repeat(300));
        b.iter(|| black_box(parse_command(trim_request(black_box(line.as_bytes())))));
    });

    group.bench_function("unknown", |b| {
        b.iter(|| black_box(parse_command(trim_request(black_box(b"PUT notes.txt\n")))));
    });

    group.finish();
}

/// Benchmark GET through the dispatcher
fn bench_get(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let handler = create_handler();

    let small = dir.path().join("small.txt");
    fs::write(&small, b"small file").unwrap();
    let large = dir.path().join("large.bin");
    fs::write(&large, vec![b'x'; 1024 * 1024]).unwrap();

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    let request = format!("GET {}\n", small.display());
    group.bench_function("get_small", |b| {
        b.iter(|| black_box(handler.process_request(request.as_bytes())));
    });

    let request = format!("GET {}\n", large.display());
    group.bench_function("get_1mb", |b| {
        b.iter(|| black_box(handler.process_request(request.as_bytes())));
    });

    let request = format!("GET {}\n", dir.path().join("missing").display());
    group.bench_function("get_missing", |b| {
        b.iter(|| black_box(handler.process_request(request.as_bytes())));
    });

    group.finish();
}

/// Benchmark mixed workload (80% reads, 20% appends)
fn bench_mixed(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let handler = create_handler();

    let paths: Vec<String> = (0..16)
        .map(|i| dir.path().join(format!("file{}", i)).display().to_string())
        .collect();
    for path in &paths {
        handler.process_request(format!("CREATE {}", path).as_bytes());
    }

    let mut group = c.benchmark_group("mixed");
    group.throughput(Throughput::Elements(1));

    group.bench_function("80_read_20_append", |b| {
        let mut i = 0usize;
        b.iter(|| {
            let path = &paths[i % paths.len()];
            let request = if i % 5 == 0 {
                format!("APPEND {} line {}", path, i)
            } else {
                format!("GET {}", path)
            };
            black_box(handler.process_request(request.as_bytes()));
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark concurrent appends to distinct and shared paths
fn bench_concurrent(c: &mut Criterion) {
    use std::thread;

    let mut group = c.benchmark_group("concurrent");
    group.measurement_time(Duration::from_secs(10));

    for shared in [false, true] {
        let name = if shared { "4_threads_same_path" } else { "4_threads_own_path" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let dir = tempdir().unwrap();
                let handler = create_handler();
                let handles: Vec<_> = (0..4)
                    .map(|t| {
                        let handler = handler.clone();
                        let file = if shared { 0 } else { t };
                        let path = dir.path().join(format!("f{}", file)).display().to_string();
                        handler.process_request(format!("CREATE {}", path).as_bytes());
                        thread::spawn(move || {
                            for i in 0..1_000 {
                                let request = format!("APPEND {} {}:{}", path, t, i);
                                handler.process_request(request.as_bytes());
                            }
                        })
                    })
                    .collect();

                for handle in handles {
                    handle.join().unwrap();
                }

                black_box(handler.store().stats());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_get, bench_mixed, bench_concurrent);

criterion_main!(benches);
