use crate::{CellId, Graph, Partition};
use anyhow::{ensure, Result};
use std::fmt;

/// Final placement of a bisection onto a `rows x cols` grid.
///
/// Slots are numbered column by column (`row = index % rows`, `col = index / rows`). Part 0
/// fills slots from the first index upward and part 1 from the last index downward, so the
/// two parts end up on opposite sides of the grid.
#[derive(Clone, Debug)]
pub struct GridLayout {
    rows: usize,
    cols: usize,
    slots: Vec<Option<CellId>>,
}

impl GridLayout {
    pub fn place(graph: &Graph, partition: &Partition, rows: usize, cols: usize) -> Result<Self> {
        ensure!(rows > 0 && cols > 0, "grid must not be empty ({rows}x{cols})");
        ensure!(
            partition.len() == graph.vertex_count(),
            "partition holds {} cells, the graph {}",
            partition.len(),
            graph.vertex_count()
        );
        ensure!(
            graph.vertex_count() <= rows * cols,
            "{} cells do not fit on a {rows}x{cols} grid",
            graph.vertex_count()
        );

        let mut slots = vec![None; rows * cols];
        let mut front = 0;
        let mut back = slots.len();
        for (vx, v) in graph.vertices.iter().enumerate() {
            let index = if partition.color(vx as u32) == 0 {
                front += 1;
                front - 1
            } else {
                back -= 1;
                back
            };
            slots[index] = Some(v.cell);
        }

        Ok(Self { rows, cols, slots })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<CellId> {
        self.slots[col * self.rows + row]
    }

    pub fn position(&self, cell: CellId) -> Option<(usize, usize)> {
        self.slots
            .iter()
            .position(|&s| s == Some(cell))
            .map(|index| (index % self.rows, index / self.rows))
    }
}

impl fmt::Display for GridLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .slots
            .iter()
            .flatten()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);

        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.get(row, col) {
                    Some(cell) => write!(f, "{cell:>width$}")?,
                    None => write!(f, "{:>width$}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
