// Netlist bisection using the Kernighan-Lin heuristic:
// https://ieeexplore.ieee.org/document/6771089

mod bisection;
mod cost;
mod gain;
mod layout;
mod netlist;
mod partition_util;

pub use bisection::*;
pub use gain::GainModel;
pub use layout::GridLayout;
pub use netlist::Netlist;
pub use partition_util::*;

use std::collections::HashMap;

/// External identifier of a cell as it appears in the netlist.
pub type CellId = u32;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GraphEdge {
    pub dst: u32,
    pub weight: u32,
}

#[derive(Clone, Debug)]
pub struct GraphVertex {
    pub cell: CellId,
    pub edges: Vec<GraphEdge>,
}

/// A net reduced to vertex indices: one driver and its sinks.
#[derive(Clone, Debug)]
pub struct GraphNet {
    pub driver: u32,
    pub sinks: Vec<u32>,
}

/// Pairwise connectivity model of a netlist.
///
/// Vertices are stored in the order their cells first appear in the net list,
/// and that order is the traversal order for every tie-break during partitioning.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub vertices: Vec<GraphVertex>,
    pub nets: Vec<GraphNet>,
    index: HashMap<CellId, u32>,
}

impl Graph {
    /// Builds the connectivity model from raw nets of the form `[tag, driver, sink...]`.
    ///
    /// Every sink gets an edge to the driver and the driver one to every sink, once per
    /// co-occurrence, so cells sharing several nets pull harder on each other.
    /// Sinks of the same net are not connected to each other.
    pub fn from_nets(nets: &[Vec<u32>]) -> Self {
        let mut graph = Graph::default();

        for net in nets {
            let Some((&driver, sinks)) = net.get(1..).and_then(|pins| pins.split_first()) else {
                continue;
            };

            let driver = graph.insert_cell(driver);
            let mut net_sinks = Vec::with_capacity(sinks.len());
            for &sink in sinks {
                let sink = graph.insert_cell(sink);
                graph.vertices[driver as usize]
                    .edges
                    .push(GraphEdge { dst: sink, weight: 1 });
                graph.vertices[sink as usize]
                    .edges
                    .push(GraphEdge { dst: driver, weight: 1 });
                net_sinks.push(sink);
            }
            graph.nets.push(GraphNet {
                driver,
                sinks: net_sinks,
            });
        }
        graph
    }

    /// Builds the connectivity model of a parsed netlist. Cells in `0..num_cells` that no
    /// net references are appended as isolated vertices so they still count towards balance.
    pub fn from_netlist(netlist: &Netlist) -> Self {
        let mut graph = Self::from_nets(&netlist.nets);
        let mut isolated = 0;
        for cell in 0..netlist.num_cells {
            if !graph.index.contains_key(&cell) {
                graph.insert_cell(cell);
                isolated += 1;
            }
        }
        if isolated > 0 {
            log::debug!("registered {isolated} cells without any net");
        }
        graph
    }

    fn insert_cell(&mut self, cell: CellId) -> u32 {
        let next = self.vertices.len() as u32;
        let vx = *self.index.entry(cell).or_insert(next);
        if vx == next {
            self.vertices.push(GraphVertex {
                cell,
                edges: vec![],
            });
        }
        vx
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn cell_id(&self, vx: u32) -> CellId {
        self.vertices[vx as usize].cell
    }

    pub fn vertex_index(&self, cell: CellId) -> Option<u32> {
        self.index.get(&cell).copied()
    }

    /// Returns the neighbouring cells of `cell`, one entry per shared co-occurrence.
    pub fn neighbours(&self, cell: CellId) -> Option<Vec<CellId>> {
        let vx = self.vertex_index(cell)?;
        Some(
            self.vertices[vx as usize]
                .edges
                .iter()
                .map(|e| self.cell_id(e.dst))
                .collect(),
        )
    }
}

pub(crate) fn divide_round_up(dividend: u32, divisor: u32) -> u32 {
    (dividend + divisor - 1) / divisor
}
