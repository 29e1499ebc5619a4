use nngen_test_support::tracing::RecordingLayer;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing_subscriber::layer::SubscriberExt;

/// Uniform points on the unit square.
#[must_use]
pub fn unit_square(count: usize, seed: u64) -> (Vec<f32>, Vec<f32>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count).map(|_| (rng.r#gen::<f32>(), rng.r#gen::<f32>())).unzip()
}

/// Ordered pairs of distinct points closer than `reach`.
#[must_use]
pub fn pairs_within(x: &[f32], y: &[f32], reach: f32) -> usize {
    let count = x.len();
    (0..count)
        .flat_map(|i| (0..count).map(move |j| (i, j)))
        .filter(|&(i, j)| i != j && (x[i] - x[j]).hypot(y[i] - y[j]) < reach)
        .count()
}

/// Runs `f` with a recording subscriber installed.
pub fn recorded<T>(f: impl FnOnce() -> T) -> (T, RecordingLayer) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, layer)
}
