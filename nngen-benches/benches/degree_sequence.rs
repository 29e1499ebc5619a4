//! Degree-sequence (configuration model) benchmarks.
//!
//! Measures a full generation call, including worker pool setup, for fixed
//! out-degrees across node counts and pool sizes.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use nngen_benches::{error::BenchSetupError, params::DegreeBenchParams};
use nngen_core::{DegreeSequence, DegreeSequenceRequest, EdgeBuffer, GeneratorBuilder};

/// Master seed for every run.
const SEED: u64 = 42;

/// Node counts to benchmark.
const NODE_COUNTS: &[usize] = &[1_000, 10_000, 100_000];

/// Out-degree given to every node.
const DEGREE: usize = 10;

/// Worker pool sizes to benchmark.
const WORKERS: &[usize] = &[1, 4];

fn degree_sequence_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("degree_sequence");
    group.sample_size(20);

    for &node_count in NODE_COUNTS {
        let nodes: Vec<usize> = (0..node_count).collect();
        let degrees = DegreeSequence::fixed(node_count, DEGREE);
        let request = DegreeSequenceRequest::new(&nodes, &nodes, degrees.as_slice())?;
        let mut buffer = EdgeBuffer::zeroed(request.total_edges()?);

        for &workers in WORKERS {
            let generator = GeneratorBuilder::new()
                .with_master_seed(SEED)
                .with_worker_count(workers)
                .build()?;
            let params = DegreeBenchParams {
                node_count,
                degree: DEGREE,
                workers,
            };
            group.bench_with_input(
                BenchmarkId::from_parameter(&params),
                &request,
                |b, request| {
                    b.iter(|| generator.degree_sequence(request, buffer.as_mut_slice()));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn degree_sequence(c: &mut Criterion) {
    if let Err(err) = degree_sequence_impl(c) {
        panic!("degree_sequence benchmark setup failed: {err}");
    }
}

criterion_group!(benches, degree_sequence);
criterion_main!(benches);
