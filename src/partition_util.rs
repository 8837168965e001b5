use crate::{divide_round_up, CellId, Graph};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::{HashMap, VecDeque};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum InitialPartitioningMethod {
    /// Vertices alternate between the two parts in traversal order (idx % 2).
    Modulo,
    /// Vertices alternate between the two parts in a randomly shuffled order.
    Random,
    /// Part 0 grows breadth first from the first vertex until it holds half the vertices.
    Bfs,
}

/// Two-way assignment of every vertex of a [`Graph`], indexed like `Graph::vertices`.
///
/// Clones are deep copies, so a recorded snapshot never follows later flips.
/// Cost and gain evaluation expect exactly one colour per vertex of the graph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    colors: Vec<u32>,
}

impl Partition {
    pub fn from_colors(colors: Vec<u32>) -> Self {
        debug_assert!(colors.iter().all(|&c| c < 2));
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn color(&self, vx: u32) -> u32 {
        self.colors[vx as usize]
    }

    #[inline]
    pub fn flip(&mut self, vx: u32) {
        let c = &mut self.colors[vx as usize];
        *c = 1 - *c;
    }

    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    /// Number of vertices in part 0 and part 1.
    pub fn counts(&self) -> [usize; 2] {
        let ones = self.colors.iter().filter(|&&c| c == 1).count();
        [self.colors.len() - ones, ones]
    }

    /// Maps every cell of `graph` to its part.
    pub fn assignment(&self, graph: &Graph) -> HashMap<CellId, u32> {
        graph
            .vertices
            .iter()
            .zip(self.colors.iter())
            .map(|(v, &c)| (v.cell, c))
            .collect()
    }
}

impl Graph {
    pub fn partition_initial(
        &self,
        method: InitialPartitioningMethod,
        rng: &mut StdRng,
    ) -> Partition {
        let n = self.vertices.len();
        let mut colors = vec![u32::MAX; n];

        match method {
            InitialPartitioningMethod::Modulo => {
                for (i, c) in colors.iter_mut().enumerate() {
                    *c = i as u32 % 2;
                }
            }
            InitialPartitioningMethod::Random => {
                let mut order: Vec<usize> = (0..n).collect();
                order.shuffle(rng);
                for (i, vx) in order.into_iter().enumerate() {
                    colors[vx] = i as u32 % 2;
                }
            }
            InitialPartitioningMethod::Bfs => {
                let target_size = divide_round_up(n as u32, 2) as usize;

                let mut queue = VecDeque::new();
                let mut visited = 0;
                while visited < target_size {
                    let Some(start) = colors.iter().position(|&c| c == u32::MAX) else {
                        break;
                    };
                    queue.clear();
                    queue.push_back(start as u32);

                    while let Some(vx) = queue.pop_front() {
                        if colors[vx as usize] != u32::MAX {
                            continue;
                        }
                        colors[vx as usize] = 0;
                        visited += 1;
                        if visited >= target_size {
                            break;
                        }
                        for e in self.vertices[vx as usize].edges.iter() {
                            if colors[e.dst as usize] == u32::MAX {
                                queue.push_back(e.dst);
                            }
                        }
                    }
                }
                for c in colors.iter_mut().filter(|c| **c == u32::MAX) {
                    *c = 1;
                }
                log::trace!("bfs grew part 0 to {visited} of {n} vertices");
            }
        }

        Partition::from_colors(colors)
    }
}
