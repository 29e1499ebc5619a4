//! Strategy builders for generator property tests.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::types::{
    DecayChoice, DegreeFixture, PointLayout, ReachFixture, SideChoice, SpatialFixture,
    StrategyChoice,
};

const MIN_NODES: usize = 4;
const MAX_NODES: usize = 40;
const MAX_DEGREE: usize = 6;
const MAX_WORKERS: usize = 4;
const CLUSTER_COUNT: usize = 3;
const CLUSTER_JITTER: f32 = 0.05;

/// Generates node sets with per-node degrees that always fit in the
/// complement of the node itself.
pub(super) fn degree_fixture_strategy() -> impl Strategy<Value = DegreeFixture> {
    (MIN_NODES..=MAX_NODES).prop_flat_map(|count| {
        let cap = MAX_DEGREE.min(count - 1);
        (
            prop::collection::vec(0..=cap, count),
            any::<SideChoice>(),
            1..=MAX_WORKERS,
            any::<u64>(),
        )
            .prop_map(move |(degrees, side, workers, seed)| DegreeFixture {
                nodes: (0..count).collect(),
                degrees,
                side,
                workers,
                seed,
            })
    })
}

/// Generates point layouts with an exponential rule and an edge request
/// that fits comfortably inside the reachable pairs.
pub(super) fn spatial_fixture_strategy() -> impl Strategy<Value = SpatialFixture> {
    (
        MIN_NODES..=MAX_NODES,
        any::<PointLayout>(),
        0.5_f32..2.0,
        0.0_f64..0.5,
        any::<StrategyChoice>(),
        1..=MAX_WORKERS,
        any::<u64>(),
    )
        .prop_map(|(count, layout, scale, fill, strategy, workers, seed)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let (x, y) = generate_points(layout, count, &mut rng);
            let pairs = count * (count - 1);
            SpatialFixture {
                x,
                y,
                layout,
                scale,
                num_edges: (pairs as f64 * fill).floor() as usize,
                strategy,
                workers,
                seed,
            }
        })
}

/// Generates layouts under either decay rule, optionally restricted to
/// candidate lists; the edge count is derived from the layout by the test.
pub(super) fn reach_fixture_strategy() -> impl Strategy<Value = ReachFixture> {
    (
        MIN_NODES..=MAX_NODES,
        any::<PointLayout>(),
        any::<DecayChoice>(),
        0.0_f32..1.0,
        0.0_f64..=0.5,
        any::<StrategyChoice>(),
        any::<bool>(),
        1..=MAX_WORKERS,
        any::<u64>(),
    )
        .prop_map(
            |(count, layout, decay, unit, fill, strategy, candidates, workers, seed)| {
                let mut rng = SmallRng::seed_from_u64(seed);
                let (x, y) = generate_points(layout, count, &mut rng);
                ReachFixture {
                    x,
                    y,
                    layout,
                    decay,
                    scale: decay.scale(unit),
                    fill,
                    strategy,
                    candidates,
                    workers,
                    seed,
                }
            },
        )
}

fn generate_points(layout: PointLayout, count: usize, rng: &mut SmallRng) -> (Vec<f32>, Vec<f32>) {
    match layout {
        PointLayout::Uniform => (0..count)
            .map(|_| (rng.r#gen::<f32>(), rng.r#gen::<f32>()))
            .unzip(),
        PointLayout::Clustered => {
            let centres: Vec<(f32, f32)> = (0..CLUSTER_COUNT)
                .map(|_| (rng.r#gen(), rng.r#gen()))
                .collect();
            (0..count)
                .map(|index| {
                    let (cx, cy) = centres[index % CLUSTER_COUNT];
                    let dx = rng.gen_range(-CLUSTER_JITTER..=CLUSTER_JITTER);
                    let dy = rng.gen_range(-CLUSTER_JITTER..=CLUSTER_JITTER);
                    ((cx + dx).clamp(0.0, 1.0), (cy + dy).clamp(0.0, 1.0))
                })
                .unzip()
        }
    }
}
