//! Uniform cell grid over node positions for bounded-reach queries.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::{
    nodes::{IdRange, Positions},
    rule::{ConnectionRule, DecayRule},
    workers::WorkerPool,
};

/// Widens cells so pairs at exactly the reach still share a neighbourhood
/// after rounding.
const CELL_SLACK: f64 = 1.001;

type CellKey = (i64, i64);

/// Ids bucketed into square cells at least `side` wide.
///
/// Any two points closer than `side` on both axes fall in the same or
/// adjacent cells.
#[derive(Debug)]
pub(crate) struct CellGrid {
    side: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl CellGrid {
    pub(crate) fn new(ids: IdRange, positions: &Positions<'_>, side: f32) -> Self {
        let side = f64::from(side) * CELL_SLACK;
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for id in ids.min()..=ids.max() {
            cells.entry(cell_of(positions.point(id), side)).or_default().push(id);
        }
        Self { side, cells }
    }

    /// Ids in the 3x3 block of cells around `point`, cell by cell.
    pub(crate) fn neighbours(&self, point: (f32, f32)) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = cell_of(point, self.side);
        (cx.saturating_sub(1)..=cx.saturating_add(1))
            .flat_map(move |x| (cy.saturating_sub(1)..=cy.saturating_add(1)).map(move |y| (x, y)))
            .filter_map(|key| self.cells.get(&key))
            .flat_map(|ids| ids.iter().copied())
    }
}

fn cell_of((x, y): (f32, f32), side: f64) -> CellKey {
    (
        (f64::from(x) / side).floor() as i64,
        (f64::from(y) / side).floor() as i64,
    )
}

/// Counts ordered pairs in `sources × targets` with a non-zero acceptance
/// probability.
///
/// Linear rules vanish at the scale, so only grid neighbours are tested.
/// Exponential rules stay positive over the whole pair space.
pub(crate) fn reachable_pairs(
    pool: &WorkerPool,
    sources: IdRange,
    targets: IdRange,
    positions: &Positions<'_>,
    rule: &ConnectionRule,
) -> usize {
    match rule.decay() {
        DecayRule::Exponential => sources.pair_space(&targets),
        DecayRule::Linear => {
            let grid = CellGrid::new(targets, positions, rule.scale());
            pool.install(|| {
                (sources.min()..=sources.max())
                    .into_par_iter()
                    .map(|source| {
                        grid.neighbours(positions.point(source))
                            .filter(|&target| {
                                target != source
                                    && rule.probability(positions.distance(source, target)) > 0.0
                            })
                            .count()
                    })
                    .sum()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedManager;
    use rand::{Rng, SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    fn scattered(count: usize, seed: u64) -> (Vec<f32>, Vec<f32>) {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..count)
            .map(|_| (rng.gen_range(-3.0_f32..3.0), rng.gen_range(-3.0_f32..3.0)))
            .unzip()
    }

    fn pool() -> WorkerPool {
        WorkerPool::new(SeedManager::new(0), 3).expect("pool builds")
    }

    #[rstest]
    #[case(0.2, (0, 119), (0, 119))]
    #[case(0.7, (0, 59), (40, 119))]
    #[case(2.5, (10, 20), (0, 119))]
    fn linear_counts_match_every_pair(
        #[case] scale: f32,
        #[case] sources: (usize, usize),
        #[case] targets: (usize, usize),
    ) {
        let (x, y) = scattered(120, 17);
        let positions = Positions::new(&x, &y).expect("positions");
        let rule = ConnectionRule::new(DecayRule::Linear, scale, 36.0, 120).expect("rule");
        let sources = IdRange::new(sources.0, sources.1).expect("range");
        let targets = IdRange::new(targets.0, targets.1).expect("range");
        let expected = (sources.min()..=sources.max())
            .flat_map(|s| (targets.min()..=targets.max()).map(move |t| (s, t)))
            .filter(|&(s, t)| s != t && rule.probability(positions.distance(s, t)) > 0.0)
            .count();
        assert_eq!(
            reachable_pairs(&pool(), sources, targets, &positions, &rule),
            expected
        );
    }

    #[test]
    fn distant_nodes_have_no_linear_pairs() {
        let x = [0.0, 10.0, 20.0];
        let y = [0.0; 3];
        let positions = Positions::new(&x, &y).expect("positions");
        let rule = ConnectionRule::new(DecayRule::Linear, 1.0, 1.0, 3).expect("rule");
        let range = IdRange::new(0, 2).expect("range");
        assert_eq!(reachable_pairs(&pool(), range, range, &positions, &rule), 0);
    }

    #[test]
    fn exponential_pairs_span_the_id_ranges() {
        let x = [0.0, 10.0, 20.0];
        let y = [0.0; 3];
        let positions = Positions::new(&x, &y).expect("positions");
        let rule = ConnectionRule::new(DecayRule::Exponential, 1.0, 1.0, 3).expect("rule");
        let range = IdRange::new(0, 2).expect("range");
        assert_eq!(reachable_pairs(&pool(), range, range, &positions, &rule), 6);
    }

    #[test]
    fn neighbours_cover_points_just_inside_the_side() {
        let x = [0.0, 0.999, -0.999, 1.5];
        let y = [0.0, 0.999, 0.5, 0.0];
        let positions = Positions::new(&x, &y).expect("positions");
        let grid = CellGrid::new(IdRange::new(0, 3).expect("range"), &positions, 1.0);
        let mut near: Vec<usize> = grid.neighbours(positions.point(0)).collect();
        near.sort_unstable();
        assert!(near.starts_with(&[0, 1, 2]));
    }
}
