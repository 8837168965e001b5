use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use netlist_partition::{
    BisectionPartitioningConfig, GainModel, Graph, GridLayout, InitialPartitioningMethod, Netlist,
    PassEvent,
};
use std::path::PathBuf;
use std::sync::mpsc;
use std::{thread, time};

/// Bisects a netlist with the Kernighan-Lin heuristic
#[derive(Parser)]
struct Cli {
    /// Netlist file: `numcells numconn numrows numcols` followed by one net per line
    netlist: PathBuf,

    /// Number of passes, each restarting from the best cut so far
    #[arg(long, default_value_t = 6)]
    passes: u32,

    /// Initial partitioning
    #[arg(long, value_enum, default_value_t = Initial::Modulo)]
    initial: Initial,

    /// Gain model
    #[arg(long, value_enum, default_value_t = Gain::Global)]
    gain: Gain,

    /// Seed for the random initial partitioning
    #[arg(long, default_value_t = 1234)]
    seed: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Initial {
    /// Alternate parts in traversal order
    Modulo,
    /// Alternate parts in a shuffled order
    Random,
    /// Grow part 0 breadth first
    Bfs,
}

impl From<Initial> for InitialPartitioningMethod {
    fn from(initial: Initial) -> Self {
        match initial {
            Initial::Modulo => InitialPartitioningMethod::Modulo,
            Initial::Random => InitialPartitioningMethod::Random,
            Initial::Bfs => InitialPartitioningMethod::Bfs,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Gain {
    /// Running crossing tally over the whole graph
    Global,
    /// External minus internal edges of the vertex
    Local,
}

impl From<Gain> for GainModel {
    fn from(gain: Gain) -> Self {
        match gain {
            Gain::Global => GainModel::Global,
            Gain::Local => GainModel::Local,
        }
    }
}

/// Sends every event over `tx` until the receiving side hangs up.
fn forward_events(tx: mpsc::Sender<PassEvent>) -> impl FnMut(&PassEvent) -> bool {
    let mut listening = true;
    move |event| {
        if listening && tx.send(event.clone()).is_err() {
            log::warn!("progress receiver is gone, no further events are sent");
            listening = false;
        }
        listening
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let netlist = Netlist::open(&cli.netlist)?;
    let graph = Graph::from_netlist(&netlist);
    let config = BisectionPartitioningConfig {
        rng_seed: cli.seed,
        initial_partitioning: cli.initial.into(),
        passes: cli.passes,
        gain_model: cli.gain.into(),
    };
    println!(
        "cells: {}, nets: {}, grid: {}x{}",
        graph.vertex_count(),
        graph.nets.len(),
        netlist.num_rows,
        netlist.num_cols
    );

    // Partition on a worker thread; the main thread only sees owned progress events.
    let (tx, rx) = mpsc::channel();
    let t1 = time::Instant::now();
    let worker = thread::spawn(move || {
        let mut forward = forward_events(tx);
        let result = graph.partition_bisection_observed(&config, |event| {
            forward(event);
        });
        (graph, result)
    });

    for event in rx {
        match event {
            PassEvent::Flip {
                pass,
                cell,
                cut_size,
                net_crossings,
                locked,
            } => log::info!(
                "pass {pass}: flipped {cell}, cut size {cut_size}, net crossings {net_crossings}, locked {locked}"
            ),
            PassEvent::PassFinished {
                pass,
                flips,
                best_cut_size,
                best_net_crossings,
            } => println!(
                "pass {pass}: {flips} flips, best cut size {best_cut_size}, best net crossings {best_net_crossings}"
            ),
        }
    }

    let (graph, result) = match worker.join() {
        Ok(done) => done,
        Err(_) => bail!("partitioning thread panicked"),
    };
    println!("time: {}ms", t1.elapsed().as_millis());
    println!("best cut size: {}", result.best_cut.cut_size);
    println!(
        "best net crossings: {} (cut size {})",
        result.best_crossing.net_crossings, result.best_crossing.cut_size
    );

    let layout = GridLayout::place(
        &graph,
        &result.best_crossing.partition,
        netlist.num_rows as usize,
        netlist.num_cols as usize,
    )
    .context("could not lay out the result")?;
    print!("{layout}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library() {
        let cli = Cli::try_parse_from(["main", "net.txt"]).unwrap();
        let defaults = BisectionPartitioningConfig::default();
        assert_eq!(cli.passes, defaults.passes);
        assert_eq!(cli.seed, defaults.rng_seed);
        assert_eq!(
            InitialPartitioningMethod::from(cli.initial),
            defaults.initial_partitioning
        );
        assert_eq!(GainModel::from(cli.gain), defaults.gain_model);
    }

    #[test]
    fn parses_value_enums() {
        let cli =
            Cli::try_parse_from(["main", "net.txt", "--initial", "bfs", "--gain", "local"]).unwrap();
        assert_eq!(
            InitialPartitioningMethod::from(cli.initial),
            InitialPartitioningMethod::Bfs
        );
        assert_eq!(GainModel::from(cli.gain), GainModel::Local);
    }

    #[test]
    fn forwarding_stops_once_the_receiver_is_dropped() {
        let event = PassEvent::PassFinished {
            pass: 0,
            flips: 2,
            best_cut_size: 1,
            best_net_crossings: 1,
        };
        let (tx, rx) = mpsc::channel();
        let mut forward = forward_events(tx);
        assert!(forward(&event));
        assert!(matches!(rx.recv(), Ok(PassEvent::PassFinished { flips: 2, .. })));

        drop(rx);
        assert!(!forward(&event));
        assert!(!forward(&event));
    }

    #[test]
    fn rejects_unknown_values_while_parsing() {
        let err = Cli::try_parse_from(["main", "net.txt", "--initial", "bogus"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
        assert!(Cli::try_parse_from(["main", "net.txt", "--gain", "exact"]).is_err());
    }
}
