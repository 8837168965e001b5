use crate::{Graph, Partition};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GainModel {
    /// Scores a flip by its effect on the running crossing tally of the whole graph.
    /// Every vertex is tried against a full re-evaluation, O(V * E) per call.
    Global,
    /// Textbook Kernighan-Lin gain: external minus internal edge weight of the vertex.
    Local,
}

impl Graph {
    /// Computes the gain of flipping every vertex under `partition`.
    ///
    /// `partition` is only borrowed mutably to try flips; it is returned unchanged.
    pub fn compute_gains(&self, partition: &mut Partition, model: GainModel) -> Vec<i64> {
        self.debug_assert_covers(partition);
        match model {
            GainModel::Global => self.global_gains(partition),
            GainModel::Local => self.local_gains(partition),
        }
    }

    fn global_gains(&self, partition: &mut Partition) -> Vec<i64> {
        let old: Vec<i64> = self.running_tally(partition).collect();
        let n = old.len() as i64;

        let mut gains = Vec::with_capacity(old.len());
        for (vx, &old_tally) in old.iter().enumerate() {
            partition.flip(vx as u32);
            let new_sum: i64 = self.running_tally(partition).sum();
            partition.flip(vx as u32);

            // sum over all k of (old[vx] - new[k])
            gains.push(n * old_tally - new_sum);
        }
        gains
    }

    fn local_gains(&self, partition: &Partition) -> Vec<i64> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(vx, v)| {
                let color = partition.color(vx as u32);
                v.edges
                    .iter()
                    .map(|e| {
                        if partition.color(e.dst) != color {
                            e.weight as i64
                        } else {
                            -(e.weight as i64)
                        }
                    })
                    .sum()
            })
            .collect()
    }

    /// Walks the vertices in order keeping one `diff - same` edge tally across the whole
    /// walk, yielding its value after each vertex. The tally is never reset between vertices.
    fn running_tally<'a>(&'a self, partition: &'a Partition) -> impl Iterator<Item = i64> + 'a {
        self.vertices
            .iter()
            .enumerate()
            .scan(0i64, move |tally, (vx, v)| {
                let color = partition.color(vx as u32);
                for e in v.edges.iter() {
                    if partition.color(e.dst) == color {
                        *tally -= e.weight as i64;
                    } else {
                        *tally += e.weight as i64;
                    }
                }
                Some(*tally)
            })
    }
}
