//! Scaling benchmark for the decomposition step: full Jacobi vs subspace iteration.
//!
//! The chooser caps selection at 10% of n, so the subspace solver only
//! iterates a small block while Jacobi always decomposes everything.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use speclust::{
    EigenChooser, JacobiSolver, Kmeans, SimilarityMatrix, Solver, SpectralClustering,
    SpectralClusteringConfig, SubspaceSolver,
};

/// Ring of `blocks` cliques of size `size`, consecutive cliques joined by one weak edge.
fn ring_of_cliques(blocks: usize, size: usize) -> SimilarityMatrix {
    let n = blocks * size;
    let mut edges = Vec::new();
    for b in 0..blocks {
        let lo = b * size;
        for i in lo..lo + size {
            for j in (i + 1)..lo + size {
                edges.push((i, j, 1.0));
            }
        }
        edges.push((lo + size - 1, (lo + size) % n, 0.01));
    }
    SimilarityMatrix::from_undirected_edges(n, &edges).unwrap()
}

fn driver(solver: Solver) -> SpectralClustering<Kmeans> {
    SpectralClustering::new(
        SpectralClusteringConfig::new(Kmeans::new(4))
            .with_chooser(EigenChooser::RelativeGap {
                multiplier: 30.0,
                max_select: 0.1,
            })
            .with_solver(solver),
    )
}

fn bench_decompose_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose_scaling");
    group.sample_size(10);

    for n in [64usize, 128, 256] {
        let similarity = ring_of_cliques(4, n / 4);

        let jacobi = driver(Solver::Jacobi(JacobiSolver::default()));
        group.bench_with_input(BenchmarkId::new("jacobi", n), &n, |b, _| {
            b.iter(|| black_box(jacobi.decompose(black_box(&similarity))).unwrap())
        });

        let subspace = driver(Solver::Subspace(SubspaceSolver::default()));
        group.bench_with_input(BenchmarkId::new("subspace", n), &n, |b, _| {
            b.iter(|| black_box(subspace.decompose(black_box(&similarity))).unwrap())
        });
    }
    group.finish();
}

fn bench_cluster(c: &mut Criterion) {
    let similarity = ring_of_cliques(4, 32);
    let subspace = driver(Solver::Subspace(SubspaceSolver::default()));
    c.bench_function("cluster_ring_128", |b| {
        b.iter(|| black_box(subspace.cluster(black_box(&similarity))).unwrap())
    });
}

criterion_group!(benches, bench_decompose_scaling, bench_cluster);
criterion_main!(benches);
