use crate::{CellId, GainModel, Graph, InitialPartitioningMethod, Partition};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Ordering;

pub struct BisectionPartitioningConfig {
    /// The seed for the random number generator.
    pub rng_seed: u64,
    /// What initial partitioning method to use.
    pub initial_partitioning: InitialPartitioningMethod,
    /// How many Kernighan-Lin passes to run. Every pass restarts from the best cut found so far.
    pub passes: u32,
    /// How the gain of flipping a vertex is scored.
    pub gain_model: GainModel,
}

impl Default for BisectionPartitioningConfig {
    fn default() -> Self {
        Self {
            rng_seed: 1234,
            initial_partitioning: InitialPartitioningMethod::Modulo,
            passes: 6,
            gain_model: GainModel::Global,
        }
    }
}

/// Best partition found by cut size.
#[derive(Clone, Debug)]
pub struct BestCut {
    pub cut_size: u32,
    pub partition: Partition,
}

/// Best partition found by net crossings, with the cut size it had when it was found.
#[derive(Clone, Debug)]
pub struct BestCrossing {
    pub net_crossings: u32,
    pub cut_size: u32,
    pub partition: Partition,
}

#[derive(Clone, Debug)]
pub struct BisectionResult {
    pub best_cut: BestCut,
    pub best_crossing: BestCrossing,
    /// Flips performed over all passes.
    pub flips: u32,
}

/// Progress notifications emitted while partitioning.
#[derive(Clone, Debug)]
pub enum PassEvent {
    /// A vertex was flipped and locked.
    Flip {
        pass: u32,
        cell: CellId,
        cut_size: u32,
        net_crossings: u32,
        locked: usize,
    },
    /// A pass ran out of legal moves.
    PassFinished {
        pass: u32,
        flips: u32,
        best_cut_size: u32,
        best_net_crossings: u32,
    },
}

/// Mutable state of a single pass.
struct PassState {
    partition: Partition,
    counts: [usize; 2],
    locked: Vec<bool>,
    locked_count: usize,
}

impl PassState {
    fn new(partition: Partition) -> Self {
        let counts = partition.counts();
        let locked = vec![false; partition.len()];
        Self {
            partition,
            counts,
            locked,
            locked_count: 0,
        }
    }

    /// Picks the unlocked vertex with the highest gain that moves out of the larger part.
    /// Ties go to the first vertex in traversal order.
    fn select(&self, gains: &[i64]) -> Option<u32> {
        let required = match self.counts[0].cmp(&self.counts[1]) {
            Ordering::Equal => None,
            Ordering::Greater => Some(0),
            Ordering::Less => Some(1),
        };

        let mut best: Option<(u32, i64)> = None;
        for (vx, &gain) in gains.iter().enumerate() {
            let vx = vx as u32;
            if self.locked[vx as usize] {
                continue;
            }
            if required.is_some_and(|color| self.partition.color(vx) != color) {
                continue;
            }
            if best.map_or(true, |(_, best_gain)| gain > best_gain) {
                best = Some((vx, gain));
            }
        }
        best.map(|(vx, _)| vx)
    }

    fn lock_and_flip(&mut self, vx: u32) {
        let from = self.partition.color(vx) as usize;
        self.locked[vx as usize] = true;
        self.locked_count += 1;
        self.counts[from] -= 1;
        self.counts[1 - from] += 1;
        self.partition.flip(vx);
    }

    fn all_locked(&self) -> bool {
        self.locked_count == self.locked.len()
    }
}

impl Graph {
    /// Splits the graph into two parts while minimizing the edge cut cost.
    pub fn partition_bisection(&self, config: &BisectionPartitioningConfig) -> BisectionResult {
        self.partition_bisection_observed(config, |_| {})
    }

    /// Like [`Graph::partition_bisection`], reporting every flip and pass end to `observer`.
    pub fn partition_bisection_observed<F>(
        &self,
        config: &BisectionPartitioningConfig,
        mut observer: F,
    ) -> BisectionResult
    where
        F: FnMut(&PassEvent),
    {
        let mut rng = StdRng::seed_from_u64(config.rng_seed);
        let initial = self.partition_initial(config.initial_partitioning, &mut rng);

        let cut_size = self.calculate_cut_size(&initial);
        let net_crossings = self.count_net_crossings(&initial);
        log::trace!("initial cut size: {cut_size}, net crossings: {net_crossings}");

        let mut result = BisectionResult {
            best_cut: BestCut {
                cut_size,
                partition: initial.clone(),
            },
            best_crossing: BestCrossing {
                net_crossings,
                cut_size,
                partition: initial,
            },
            flips: 0,
        };

        for pass in 0..config.passes {
            let flips = self.run_pass(pass, config.gain_model, &mut result, &mut observer);
            result.flips += flips;

            log::debug!(
                "pass: {pass}, flips: {flips}, best cut size: {}, best net crossings: {} (cut size {})",
                result.best_cut.cut_size,
                result.best_crossing.net_crossings,
                result.best_crossing.cut_size
            );
            observer(&PassEvent::PassFinished {
                pass,
                flips,
                best_cut_size: result.best_cut.cut_size,
                best_net_crossings: result.best_crossing.net_crossings,
            });
        }
        result
    }

    /// Runs one pass starting from the best cut recorded so far. Returns the number of flips.
    fn run_pass<F>(
        &self,
        pass: u32,
        gain_model: GainModel,
        result: &mut BisectionResult,
        observer: &mut F,
    ) -> u32
    where
        F: FnMut(&PassEvent),
    {
        let mut state = PassState::new(result.best_cut.partition.clone());
        let mut flips = 0;

        while !state.all_locked() {
            let gains = self.compute_gains(&mut state.partition, gain_model);
            let Some(vx) = state.select(&gains) else {
                break;
            };
            state.lock_and_flip(vx);
            flips += 1;

            let cut_size = self.calculate_cut_size(&state.partition);
            let net_crossings = self.count_net_crossings(&state.partition);
            if cut_size < result.best_cut.cut_size {
                result.best_cut = BestCut {
                    cut_size,
                    partition: state.partition.clone(),
                };
            }
            if net_crossings < result.best_crossing.net_crossings {
                result.best_crossing = BestCrossing {
                    net_crossings,
                    cut_size,
                    partition: state.partition.clone(),
                };
            }

            let cell = self.cell_id(vx);
            log::trace!(
                "flipped cell {cell} (gain {}), cut size: {cut_size}, net crossings: {net_crossings}, locked: {}/{}",
                gains[vx as usize],
                state.locked_count,
                state.locked.len()
            );
            observer(&PassEvent::Flip {
                pass,
                cell,
                cut_size,
                net_crossings,
                locked: state.locked_count,
            });
        }
        flips
    }
}
