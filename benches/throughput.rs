//! Pipeline throughput benchmark: blocks per second through a chain of
//! pass-through stages with a closed recycling loop.

use blockflow::{Chain, ChainConfig, ChainPosition, Link};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn passthrough(position: ChainPosition) {
    let mut link = Link::new(position);
    while link.is_valid() {
        link.advance();
    }
}

/// Drain every block and count entries so the work is not optimized away.
fn drain(position: ChainPosition) {
    let mut link = Link::new(position);
    let mut total = 0usize;
    while link.is_valid() {
        total += link.block().len();
        link.advance();
    }
    criterion::black_box(total);
}

fn run_pipeline(stages: usize, blocks: usize, config: ChainConfig) {
    let mut chain = Chain::new(config).expect("valid config");
    let feeder_pos = chain.add();
    for _ in 0..stages {
        chain = chain.add_worker(passthrough);
    }
    let mut chain = chain.add_worker(drain);
    chain.complete_loop();

    let block_size = chain.block_size();
    let mut feeder = Link::new(feeder_pos);
    for _ in 0..blocks {
        feeder.block_mut().set_len(block_size);
        feeder.advance();
    }
    feeder.poison();
    drop(chain);
}

fn bench_passthrough_chain(c: &mut Criterion) {
    let config = ChainConfig {
        entry_size: 8,
        block_size: 64 * 1024,
        block_count: 8,
        queue_length: 4,
    };

    let mut group = c.benchmark_group("passthrough_chain");
    const BLOCKS: usize = 256;
    group.throughput(Throughput::Bytes(
        (BLOCKS * config.block_size_effective()) as u64,
    ));
    for stages in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(stages), &stages, |b, &stages| {
            b.iter(|| run_pipeline(stages, BLOCKS, config));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_passthrough_chain);
criterion_main!(benches);
