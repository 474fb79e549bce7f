use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use presence_core::{CandidateSet, Point2D, PointSet};
use presence_metrics::{ClassifierBuilder, Sorter, ThresholdStrategy};

/// Deterministic corner layout, shifted per candidate
fn create_point_set(n: usize, shift: f64) -> PointSet {
    (0..n)
        .map(|i| {
            let t = i as f64;
            Point2D::new((t * 37.0) % 211.0 + shift, (t * 53.0) % 157.0 + shift * 0.5)
        })
        .collect::<Vec<_>>()
        .into()
}

fn create_candidates(k: usize, n: usize) -> CandidateSet {
    let mut set = CandidateSet::new();
    for c in 0..k {
        set = set
            .with(format!("C{}", c), create_point_set(n, c as f64 * 3.0))
            .expect("unique labels");
    }
    set
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    for &n in &[28usize, 256, 1024] {
        let reference = create_point_set(n, 0.0);
        let candidates = create_candidates(4, n);

        for parallel in [false, true] {
            let classifier = ClassifierBuilder::new()
                .parallel(parallel)
                .build()
                .unwrap();
            let label = if parallel { "parallel" } else { "sequential" };

            group.bench_with_input(
                BenchmarkId::new(label, n),
                &(reference.clone(), candidates.clone()),
                |b, (reference, candidates)| {
                    b.iter(|| black_box(classifier.classify(black_box(reference), black_box(candidates)).unwrap()))
                },
            );
        }
    }

    group.finish();
}

fn bench_many_candidates(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_candidates");
    let reference = create_point_set(28, 0.0);

    for &k in &[4usize, 32, 128] {
        let candidates = create_candidates(k, 28);
        let classifier = ClassifierBuilder::new()
            .threshold_strategy(ThresholdStrategy::Mean)
            .build()
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(k), &candidates, |b, candidates| {
            b.iter(|| black_box(classifier.classify(&reference, black_box(candidates)).unwrap()))
        });
    }

    group.finish();
}

fn bench_insertion_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion_sort");

    for &n in &[28usize, 256] {
        let values: Vec<f64> = (0..n).map(|i| ((i * 7919) % 1000) as f64).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let mut v = values.clone();
                Sorter::sort(&mut v);
                black_box(v)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_many_candidates, bench_insertion_sort);
criterion_main!(benches);
