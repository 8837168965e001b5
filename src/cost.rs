use crate::{Graph, Partition};

impl Graph {
    /// Returns the number of edges whose endpoints lie in different parts.
    ///
    /// Every edge is stored once per direction, so the directed count is halved. The
    /// adjacency is symmetric, which keeps the directed count even and the halving exact.
    pub fn calculate_cut_size(&self, partition: &Partition) -> u32 {
        self.debug_assert_covers(partition);
        let mut cut = 0;
        for (vx, v) in self.vertices.iter().enumerate() {
            let color = partition.color(vx as u32);
            for e in v.edges.iter() {
                if partition.color(e.dst) != color {
                    cut += e.weight;
                }
            }
        }
        cut / 2
    }

    /// Returns the number of nets with at least one sink outside the driver's part.
    pub fn count_net_crossings(&self, partition: &Partition) -> u32 {
        self.debug_assert_covers(partition);
        self.nets
            .iter()
            .filter(|net| {
                let color = partition.color(net.driver);
                net.sinks.iter().any(|&s| partition.color(s) != color)
            })
            .count() as u32
    }

    #[inline]
    pub(crate) fn debug_assert_covers(&self, partition: &Partition) {
        debug_assert_eq!(
            partition.len(),
            self.vertex_count(),
            "partition does not cover every vertex of the graph"
        );
    }
}
