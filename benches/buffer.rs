//! Buffer operations benchmarks
//!
//! Measures push/drain performance of the event buffer.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use keruu::EventBuffer;

fn make_payloads(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("occupancy-{i}: benchmark payload data"))
        .collect()
}

fn bench_buffer_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_push");

    for batch_size in [1, 10, 100, 1000] {
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_function(format!("batch_{}", batch_size), |b| {
            b.iter_batched(
                || (EventBuffer::new(), make_payloads(batch_size)),
                |(buffer, payloads)| {
                    for payload in payloads {
                        buffer.push(payload);
                    }
                    buffer
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_buffer_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_drain");

    for backlog in [10, 100, 1000, 10_000] {
        group.throughput(Throughput::Elements(backlog as u64));
        group.bench_function(format!("backlog_{}", backlog), |b| {
            b.iter_batched(
                || {
                    let buffer = EventBuffer::new();
                    for payload in make_payloads(backlog) {
                        buffer.push(payload);
                    }
                    buffer
                },
                |buffer| buffer.drain(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_buffer_push, bench_buffer_drain);
criterion_main!(benches);
