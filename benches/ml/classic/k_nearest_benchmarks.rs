use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use knn_baseline::{pairwise_distance, predict};
use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

// Digit-sized feature vectors (16x16 grayscale).
const FEATURES: usize = 256;

fn random_points(rng: &mut ChaCha20Rng, rows: usize) -> Array2<f64> {
    Array2::from_shape_fn((rows, FEATURES), |_| rng.gen_range(-1.0..1.0))
}

fn bench_pairwise_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise_distance");
    let mut rng = ChaCha20Rng::seed_from_u64(42);

    for &n in &[100, 500, 1000] {
        let queries = random_points(&mut rng, n / 4);
        let references = random_points(&mut rng, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| pairwise_distance(black_box(queries.view()), black_box(references.view())))
        });
    }
    group.finish();
}

fn bench_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn_predict");
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let x_train = random_points(&mut rng, 1000);
    let y_train: Vec<u8> = (0..1000).map(|_| rng.gen_range(0..10)).collect();
    let x_query = random_points(&mut rng, 250);

    for &k in &[1, 5, 25] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            let mut vote_rng = ChaCha20Rng::seed_from_u64(13290);
            b.iter(|| {
                predict(
                    black_box(x_train.view()),
                    &y_train,
                    black_box(x_query.view()),
                    k,
                    &mut vote_rng,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pairwise_distance, bench_predict);
criterion_main!(benches);
